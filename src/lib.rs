//! 不動産物件収集ライブラリ
//!
//! - Chromeでカテゴリ一覧を巡回し、物件ごとに1行をCSVへ書き込む
//! - 複数サイトの物件CSVを1つのデータセットに統合
//!
//! # 収集の使用例
//!
//! ```rust,ignore
//! use listing_harvest::{HarvestRequest, HarvestService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = HarvestService::new();
//!
//!     let request = HarvestRequest::new(0, 8)
//!         .with_output_path("data/raw/batdongsan_com_vn.csv")
//!         .with_headless(false);
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("書き込み行数: {}", summary.records_written);
//! }
//! ```
//!
//! # 統合の使用例
//!
//! ```rust,ignore
//! use listing_harvest::merge::{merge_sources, MergeSource};
//!
//! let summary = merge_sources(
//!     &[
//!         MergeSource::new("data/preprocessed/batdongsancomvn_preprocessed.csv", "batdongsancomvn"),
//!         MergeSource::new("data/preprocessed/muabannet_preprocessed.csv", "muabannet"),
//!     ],
//!     "data/preprocessed/full.csv".as_ref(),
//! )?;
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod merge;
pub mod pacing;
pub mod service;
pub mod traits;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{ChromeSession, Locator};
pub use config::{Category, DelayRange, Delays, HarvestConfig};
pub use error::ScraperError;
pub use extract::{extract_coordinates, extract_numeric};
pub use harvest::{CrawlDriver, CrawlSummary, ListingRecord, PageOutcome, PageTarget};
pub use service::{HarvestRequest, HarvestService};
pub use traits::BrowserSession;
pub use writer::RecordWriter;
