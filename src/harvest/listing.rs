//! 詳細ページの抽出
//!
//! 各項目は独立して `Option` を返す。要素がなくてもその項目が空になるだけ。

use tracing::{debug, warn};

use crate::browser::Locator;
use crate::config::Category;
use crate::error::ScraperError;
use crate::extract::extract_coordinates;
use crate::pacing::Pacer;
use crate::traits::BrowserSession;

use super::selectors;
use super::types::{ListingRecord, SpecField};

/// 詳細ページから物件レコードを1件読み取る
pub struct ListingExtractor<'a, S: BrowserSession + ?Sized> {
    session: &'a S,
    pacer: &'a Pacer,
    map_scroll_attempts: usize,
    map_scroll_step: i64,
}

impl<'a, S: BrowserSession + ?Sized> ListingExtractor<'a, S> {
    pub fn new(
        session: &'a S,
        pacer: &'a Pacer,
        map_scroll_attempts: usize,
        map_scroll_step: i64,
    ) -> Self {
        Self {
            session,
            pacer,
            map_scroll_attempts,
            map_scroll_step,
        }
    }

    /// カテゴリ外のページに遷移していた場合は `Ok(None)`。
    /// 呼び出し側はレコードなしで戻る。
    pub async fn extract(
        &self,
        category: &Category,
        location: Option<String>,
    ) -> Result<Option<ListingRecord>, ScraperError> {
        let url = self.session.current_url().await?;
        if !url.contains(&category.url) {
            warn!("対象外の物件URLのためスキップ: {}", url);
            return Ok(None);
        }

        let mut record = ListingRecord::for_category(category);
        record.url = Some(url);
        record.location = location;

        record.title = self.probe_text(&Locator::css(selectors::TITLE)).await;
        record.location_details = self.probe_text(&Locator::css(selectors::ADDRESS)).await;

        for (field, value) in self.probe_specs().await {
            record.set_spec(field, value);
        }

        record.verified = Some(self.probe_verified().await);

        let (latitude, longitude) = self.probe_coordinates().await;
        record.latitude = latitude;
        record.longitude = longitude;

        record.date_of_posting = self.probe_text(&Locator::css(selectors::POSTING_DATE)).await;

        Ok(Some(record))
    }

    async fn probe_text(&self, locator: &Locator) -> Option<String> {
        match self.session.text(locator).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                debug!("項目なし: {}", e);
                None
            }
        }
    }

    async fn probe_specs(&self) -> Vec<(SpecField, String)> {
        let item = Locator::css(selectors::SPEC_ITEM);
        let total = self.session.count(&item).await.unwrap_or(0);

        let mut specs = Vec::new();
        for k in 0..total {
            let entry = item.clone().nth(k);
            let Some(label) = self
                .probe_text(&entry.clone().child(selectors::SPEC_ITEM_TITLE))
                .await
            else {
                continue;
            };
            let Some(field) = SpecField::from_label(&label) else {
                debug!("未対応の項目ラベル: {}", label);
                continue;
            };
            if let Some(value) = self
                .probe_text(&entry.child(selectors::SPEC_ITEM_VALUE))
                .await
            {
                specs.push((field, value));
            }
        }
        specs
    }

    async fn probe_verified(&self) -> u8 {
        let badge = Locator::css(selectors::VERIFIED_BADGE);
        match self.session.count(&badge).await {
            Ok(n) if n > 0 => 1,
            _ => 0,
        }
    }

    /// 地図iframeは遅延読み込みのため、上限回数までスクロールして再試行
    async fn probe_coordinates(&self) -> (Option<f64>, Option<f64>) {
        let iframe = Locator::css(selectors::MAP_BODY).child(selectors::MAP_IFRAME);

        let mut attempt = 0;
        while attempt < self.map_scroll_attempts {
            match self.session.attribute(&iframe, "data-src").await {
                Ok(data_src) => {
                    let src = match data_src.filter(|s| !s.is_empty()) {
                        Some(src) => Some(src),
                        None => self.session.attribute(&iframe, "src").await.ok().flatten(),
                    };
                    return extract_coordinates(src.as_deref());
                }
                Err(e) => debug!("地図未読み込み (試行 {}): {}", attempt + 1, e),
            }

            attempt += 1;
            if let Err(e) = self.session.scroll_by(self.map_scroll_step).await {
                debug!("スクロール失敗: {}", e);
            }
            self.pacer.after_scroll().await;
        }

        debug!("{}回試行しても地図が読み込まれず", attempt);
        (None, None)
    }
}
