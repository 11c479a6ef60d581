//! 一覧ページの処理: 件数チェックとカードごとのループ

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::browser::Locator;
use crate::config::HarvestConfig;
use crate::error::ScraperError;
use crate::extract::extract_numeric;
use crate::pacing::Pacer;
use crate::traits::BrowserSession;

use super::listing::ListingExtractor;
use super::selectors;
use super::types::{ListingRecord, PageOutcome, PageTarget};

/// 検索件数から算出できるページ数
pub fn pages_available(total_results: u64, page_size: usize) -> u64 {
    total_results.div_ceil(page_size.max(1) as u64)
}

/// 戻り操作の後にカードを見つけ直すための識別子
#[derive(Debug, Clone, PartialEq, Eq)]
enum CardKey {
    /// タイトルリンクの href（一意）
    Link(String),
    /// href が読めない場合のタイトル文字列（重複しうる）
    Title(String),
}

pub struct PageHarvester<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
    config: &'a HarvestConfig,
    pacer: &'a Pacer,
}

impl<'a, S: BrowserSession + ?Sized> PageHarvester<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig, pacer: &'a Pacer) -> Self {
        Self {
            session,
            config,
            pacer,
        }
    }

    /// 直前に遷移した一覧ページを処理する。
    ///
    /// `Timeout`/`ElementNotFound` は件数が表示されなかったことを意味し、
    /// 呼び出し側はそのページをスキップする。
    pub async fn harvest(&self, target: &PageTarget) -> Result<PageOutcome, ScraperError> {
        let list_url = target.list_url(self.config.sort_value);

        let landed = self.session.current_url().await?;
        if !landed.contains(&target.category.url) {
            warn!("リダイレクトを検出 ({})、一覧ページを再読み込み", landed);
            self.session.goto(&list_url).await?;
            self.pacer.after_page_load().await;

            // 再読み込みは一度だけ
            let landed = self.session.current_url().await?;
            if !landed.contains(&target.category.url) {
                warn!("再読み込み後もカテゴリ外 ({})、ページをスキップ", landed);
                return Ok(PageOutcome::Redirected { landed });
            }
        }

        self.session
            .wait_for(selectors::TOTAL_COUNT, self.config.wait_timeout)
            .await?;

        let count_text = self
            .session
            .text(&Locator::css(selectors::COUNT_NUMBER))
            .await?;
        let total_results = extract_numeric(Some(&count_text));

        if pages_available(total_results, self.config.page_size) < target.page {
            info!(
                "{} はこれ以上ページなし ({}件, {}ページ目)",
                target.category.name, total_results, target.page
            );
            return Ok(PageOutcome::BeyondLastPage { total_results });
        }

        let cards = Locator::css(selectors::CARD);
        let card_count = self.session.count(&cards).await?;
        if card_count == 0 {
            warn!("カードが見つかりません: {}", list_url);
            return Ok(PageOutcome::NoCards);
        }

        let limit = self.config.page_size.min(card_count);
        let keys = self.card_keys(limit).await;

        let mut visited_links = HashSet::new();
        let mut visited_urls = HashSet::new();
        let mut batch = Vec::new();
        for j in 0..limit {
            // 遷移でハンドルは無効になるため毎回読み直す
            let live = self.session.count(&cards).await?;
            if j >= live {
                debug!("カード {} が消えた (残り {} 件)", j, live);
                break;
            }

            let Some(slot) = self.resolve_card(j, keys[j].as_ref(), live).await else {
                warn!("カード {} がページ上に見つからないためスキップ", j + 1);
                continue;
            };

            if let Some(CardKey::Link(link)) = self.card_key(slot).await {
                if !visited_links.insert(link) {
                    debug!("カード {} は訪問済み、スキップ", j + 1);
                    continue;
                }
            }

            let Some(record) = self.visit_card(target, slot).await? else {
                continue;
            };
            if let Some(url) = &record.url {
                if !visited_urls.insert(url.clone()) {
                    warn!("同じ物件に再到達したため破棄: {}", url);
                    continue;
                }
            }
            batch.push(record);
            info!("  - 取得 {}/{}", j + 1, self.config.page_size);
        }

        Ok(PageOutcome::Harvested(batch))
    }

    /// 先頭 `limit` 件のカード識別子
    async fn card_keys(&self, limit: usize) -> Vec<Option<CardKey>> {
        let mut keys = Vec::with_capacity(limit);
        for j in 0..limit {
            keys.push(self.card_key(j).await);
        }
        keys
    }

    async fn card_key(&self, j: usize) -> Option<CardKey> {
        let title = card(j).child(selectors::CARD_TITLE);

        let link = self.session.attribute(&title, "href").await.ok().flatten();
        if let Some(link) = link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()) {
            return Some(CardKey::Link(link));
        }

        self.session
            .text(&title)
            .await
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(CardKey::Title)
    }

    /// 最初に `j` 番目にあったカードの現在位置
    async fn resolve_card(
        &self,
        j: usize,
        expected: Option<&CardKey>,
        live: usize,
    ) -> Option<usize> {
        let Some(expected) = expected else {
            return Some(j);
        };
        if self.card_key(j).await.as_ref() == Some(expected) {
            return Some(j);
        }
        for k in (0..live).filter(|k| *k != j) {
            if self.card_key(k).await.as_ref() == Some(expected) {
                debug!("カード {} は {} 番目に移動", j, k);
                return Some(k);
            }
        }
        None
    }

    /// カードを開いて抽出し、一覧に戻る。
    /// 開けなかった場合やカテゴリ外に遷移した場合は `Ok(None)`。
    async fn visit_card(
        &self,
        target: &PageTarget,
        slot: usize,
    ) -> Result<Option<ListingRecord>, ScraperError> {
        let location_part = card(slot).child(selectors::CARD_LOCATION_PARTS).nth(1);
        let location = self
            .session
            .text(&location_part)
            .await
            .ok()
            .map(|t| t.trim().to_string());

        let title = card(slot).child(selectors::CARD_TITLE);
        if let Err(e) = self.session.scroll_into_view(&title).await {
            debug!("カード {} をクリックできません: {}", slot, e);
            return Ok(None);
        }
        self.pacer.after_scroll_into_view().await;
        if let Err(e) = self.session.click(&title).await {
            debug!("カード {} のクリック失敗: {}", slot, e);
            return Ok(None);
        }
        self.pacer.after_detail().await;

        let extractor = ListingExtractor::new(
            self.session,
            self.pacer,
            self.config.map_scroll_attempts,
            self.config.map_scroll_step,
        );
        let record = extractor.extract(&target.category, location).await?;

        self.session.back().await?;
        match record {
            Some(_) => self.pacer.after_back().await,
            None => self.pacer.after_invalid_back().await,
        }
        Ok(record)
    }
}

fn card(j: usize) -> Locator {
    Locator::css(selectors::CARD).nth(j)
}
