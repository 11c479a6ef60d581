use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// 物件カテゴリと検索URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// ランダム待機の範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn from_secs_f64(min: f64, max: f64) -> Self {
        Self {
            min: Duration::from_secs_f64(min),
            max: Duration::from_secs_f64(max),
        }
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// 操作ごとの待機範囲
#[derive(Debug, Clone)]
pub struct Delays {
    pub page_load: DelayRange,
    pub detail: DelayRange,
    pub scroll: DelayRange,
    pub scroll_into_view: DelayRange,
    pub back: DelayRange,
    pub invalid_back: DelayRange,
    pub between_pages: DelayRange,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page_load: DelayRange::from_secs_f64(2.0, 5.0),
            detail: DelayRange::from_secs_f64(1.5, 4.0),
            scroll: DelayRange::from_secs_f64(0.2, 0.6),
            scroll_into_view: DelayRange::from_secs_f64(0.3, 0.8),
            back: DelayRange::from_secs_f64(1.2, 2.5),
            invalid_back: DelayRange::from_secs_f64(1.0, 2.0),
            between_pages: DelayRange::from_secs_f64(3.0, 8.0),
        }
    }
}

impl Delays {
    /// 待機なし（テスト用）
    pub fn none() -> Self {
        Self {
            page_load: DelayRange::ZERO,
            detail: DelayRange::ZERO,
            scroll: DelayRange::ZERO,
            scroll_into_view: DelayRange::ZERO,
            back: DelayRange::ZERO,
            invalid_back: DelayRange::ZERO,
            between_pages: DelayRange::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub output_path: PathBuf,
    pub start_index: u64,
    pub end_index: u64,
    pub page_size: usize,
    pub sort_value: u32,
    pub categories: Vec<Category>,
    pub delays: Delays,
    pub wait_timeout: Duration,
    pub map_scroll_attempts: usize,
    pub map_scroll_step: i64,
    pub headless: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data/raw/batdongsan_com_vn.csv"),
            start_index: 439,
            end_index: 500,
            page_size: 20,
            sort_value: 8,
            categories: default_categories(),
            delays: Delays::default(),
            wait_timeout: Duration::from_secs(60),
            map_scroll_attempts: 8,
            map_scroll_step: 550,
            headless: true,
        }
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Căn hộ chung cư",
            "https://batdongsan.com.vn/ban-can-ho-chung-cu",
        ),
        Category::new("Nhà riêng", "https://batdongsan.com.vn/ban-nha-rieng"),
        Category::new(
            "Nhà biệt thự, liền kề",
            "https://batdongsan.com.vn/ban-nha-biet-thu-lien-ke",
        ),
        Category::new("Nhà mặt phố", "https://batdongsan.com.vn/ban-nha-mat-pho"),
    ]
}

impl HarvestConfig {
    pub fn new(start_index: u64, end_index: u64) -> Self {
        Self {
            start_index,
            end_index,
            ..Default::default()
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn validate(&self) -> Result<(), ScraperError> {
        if self.categories.is_empty() {
            return Err(ScraperError::Config("カテゴリが設定されていません".into()));
        }
        if self.page_size == 0 {
            return Err(ScraperError::Config("ページサイズは1以上が必要です".into()));
        }
        if self.start_index > self.end_index {
            return Err(ScraperError::Config(format!(
                "開始インデックス {} が終了インデックス {} より後です",
                self.start_index, self.end_index
            )));
        }
        if self.map_scroll_attempts == 0 {
            return Err(ScraperError::Config(
                "地図スクロール回数は1以上が必要です".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarvestConfig::default();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.map_scroll_attempts, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = HarvestConfig::new(0, 8)
            .with_output_path("/tmp/out.csv")
            .with_page_size(5)
            .with_headless(false)
            .with_wait_timeout(Duration::from_secs(5));

        assert_eq!(config.start_index, 0);
        assert_eq!(config.end_index, 8);
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.page_size, 5);
        assert!(!config.headless);
        assert_eq!(config.wait_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(HarvestConfig::new(0, 1)
            .with_categories(Vec::new())
            .validate()
            .is_err());
        assert!(HarvestConfig::new(0, 1).with_page_size(0).validate().is_err());
        assert!(HarvestConfig::new(5, 1).validate().is_err());
    }

    #[test]
    fn test_delay_sample_within_range() {
        let range = DelayRange::from_secs_f64(0.2, 0.6);
        for _ in 0..50 {
            let d = range.sample();
            assert!(d >= range.min && d <= range.max);
        }
        assert_eq!(DelayRange::ZERO.sample(), Duration::ZERO);
    }
}
