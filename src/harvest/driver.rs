use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::HarvestConfig;
use crate::error::ScraperError;
use crate::pacing::Pacer;
use crate::traits::BrowserSession;
use crate::writer::RecordWriter;

use super::page::PageHarvester;
use super::types::{PageOutcome, PageTarget};

/// 1回のクロールの集計
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub output_path: PathBuf,
    pub pages_harvested: u64,
    pub pages_beyond_last: u64,
    pub pages_without_cards: u64,
    pub pages_skipped: u64,
    pub records_written: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlSummary {
    fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            pages_harvested: 0,
            pages_beyond_last: 0,
            pages_without_cards: 0,
            pages_skipped: 0,
            records_written: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// 1つのブラウザセッションでクロール範囲を巡回する。
///
/// セッションはドライバーが所有し、成功・失敗に関わらず `run` の終了時に閉じる。
pub struct CrawlDriver<S: BrowserSession> {
    config: HarvestConfig,
    session: S,
    writer: RecordWriter,
    pacer: Pacer,
}

impl<S: BrowserSession> CrawlDriver<S> {
    pub fn new(config: HarvestConfig, session: S) -> Result<Self, ScraperError> {
        config.validate()?;
        let writer = RecordWriter::new(&config.output_path);
        let pacer = Pacer::new(config.delays.clone());
        Ok(Self {
            config,
            session,
            writer,
            pacer,
        })
    }

    pub async fn run(mut self) -> Result<CrawlSummary, ScraperError> {
        let mut summary = CrawlSummary::new(self.config.output_path.clone());

        let result = self.crawl(&mut summary).await;

        if let Err(e) = self.session.close().await {
            warn!("ブラウザ終了に失敗: {}", e);
        }
        summary.finished_at = Some(Utc::now());

        match result {
            Ok(()) => {
                info!(
                    "クロール完了: {}ページ取得, {}ページスキップ, {}行を {} に書き込み",
                    summary.pages_harvested,
                    summary.pages_skipped,
                    summary.records_written,
                    summary.output_path.display()
                );
                match serde_json::to_string(&summary) {
                    Ok(json) => debug!("クロール集計: {}", json),
                    Err(e) => warn!("クロール集計のシリアライズに失敗: {}", e),
                }
                Ok(summary)
            }
            Err(e) => {
                error!(
                    "クロール中断 ({}行書き込み済み): {}",
                    summary.records_written, e
                );
                Err(e)
            }
        }
    }

    async fn crawl(&self, summary: &mut CrawlSummary) -> Result<(), ScraperError> {
        let harvester = PageHarvester::new(&self.session, &self.config, &self.pacer);

        for i in self.config.start_index..self.config.end_index {
            let Some(target) = PageTarget::from_index(i, &self.config.categories) else {
                break;
            };
            let list_url = target.list_url(self.config.sort_value);
            info!(
                "=== i={} | type={} | page={} ===",
                i, target.category.name, target.page
            );

            self.session.goto(&list_url).await?;
            self.pacer.after_page_load().await;

            match harvester.harvest(&target).await {
                Ok(PageOutcome::Harvested(records)) => {
                    summary.pages_harvested += 1;
                    if !records.is_empty() {
                        let written = self.writer.append(&records)?;
                        summary.records_written += written as u64;
                    }
                }
                Ok(PageOutcome::BeyondLastPage { .. }) => summary.pages_beyond_last += 1,
                Ok(PageOutcome::NoCards) => summary.pages_without_cards += 1,
                Ok(PageOutcome::Redirected { .. }) => summary.pages_skipped += 1,
                Err(e) if e.is_page_level() => {
                    warn!("件数を読み取れないためページをスキップ: {}", e);
                    summary.pages_skipped += 1;
                }
                Err(e) => return Err(e),
            }

            self.pacer.between_pages().await;
        }
        Ok(())
    }
}
