//! 物件収集パイプライン
//!
//! `CrawlDriver` がクロール範囲を巡回し、`PageHarvester` が一覧ページ1件を、
//! `ListingExtractor` が詳細ページ1件を処理する。

mod driver;
mod listing;
mod page;
pub(crate) mod selectors;
mod types;

pub use driver::{CrawlDriver, CrawlSummary};
pub use listing::ListingExtractor;
pub use page::{pages_available, PageHarvester};
pub use types::{ListingRecord, PageOutcome, PageTarget, SpecField};
