use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::browser::ChromeSession;
use crate::config::HarvestConfig;
use crate::error::ScraperError;
use crate::harvest::{CrawlDriver, CrawlSummary};

/// `[start_index, end_index)` の範囲を1回クロール
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub start_index: u64,
    pub end_index: u64,
    pub output_path: PathBuf,
    pub headless: bool,
}

impl HarvestRequest {
    pub fn new(start_index: u64, end_index: u64) -> Self {
        Self {
            start_index,
            end_index,
            output_path: HarvestConfig::default().output_path,
            headless: true,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<HarvestRequest> for HarvestConfig {
    fn from(req: HarvestRequest) -> Self {
        HarvestConfig::new(req.start_index, req.end_index)
            .with_output_path(req.output_path)
            .with_headless(req.headless)
    }
}

/// リクエストごとにクロール全体を実行する tower::Service
#[derive(Debug, Clone, Default)]
pub struct HarvestService {
    base: Option<HarvestConfig>,
}

impl HarvestService {
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエストで指定しない項目は `config` を使う
    pub fn with_base_config(config: HarvestConfig) -> Self {
        Self { base: Some(config) }
    }

    fn config_for(&self, req: HarvestRequest) -> HarvestConfig {
        match &self.base {
            Some(base) => {
                let mut config = base.clone();
                config.start_index = req.start_index;
                config.end_index = req.end_index;
                config.output_path = req.output_path;
                config.headless = req.headless;
                config
            }
            None => req.into(),
        }
    }
}

impl Service<HarvestRequest> for HarvestService {
    type Response = CrawlSummary;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: HarvestRequest) -> Self::Future {
        info!(
            "収集リクエスト受信: i={}..{}",
            req.start_index, req.end_index
        );
        let config = self.config_for(req);

        Box::pin(async move {
            config.validate()?;
            let session = ChromeSession::launch(&config).await?;
            let driver = CrawlDriver::new(config, session)?;
            driver.run().await
        })
    }
}
