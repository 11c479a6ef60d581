use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::locator::{Locator, Step};
use crate::config::HarvestConfig;
use crate::error::ScraperError;
use crate::traits::BrowserSession;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const CDP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// CDPで操作するChromeウィンドウ1つ
pub struct ChromeSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Page,
}

impl ChromeSession {
    /// Chromeを起動して空のタブを開く
    pub async fn launch(config: &HarvestConfig) -> Result<Self, ScraperError> {
        info!("ブラウザを初期化中...");

        let mut builder = BrowserConfig::builder()
            .window_size(1366, 900)
            .no_sandbox()
            .request_timeout(CDP_REQUEST_TIMEOUT)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-service-autorun")
            .arg("--password-store=basic");

        if let Ok(path) = std::env::var("CHROME_PATH") {
            builder = builder.chrome_executable(path);
        }
        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("ブラウザ設定: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        info!("ブラウザ初期化完了");
        Ok(Self {
            browser: Some(browser),
            handler: Some(handler),
            page,
        })
    }

    async fn matches_in(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let found = match scope {
            Some(element) => element.find_elements(selector).await,
            None => self.page.find_elements(selector).await,
        };
        found.unwrap_or_else(|e| {
            debug!("一致なし {}: {}", selector, e);
            Vec::new()
        })
    }

    /// ドキュメントルートからステップを辿る。空パスは `None`
    async fn resolve_steps(
        &self,
        steps: &[Step],
        locator: &Locator,
    ) -> Result<Option<Element>, ScraperError> {
        let mut scope: Option<Element> = None;
        for step in steps {
            let mut found = self.matches_in(scope.as_ref(), step.selector()).await;
            if step.index() >= found.len() {
                return Err(ScraperError::ElementNotFound(locator.to_string()));
            }
            scope = Some(found.swap_remove(step.index()));
        }
        Ok(scope)
    }

    async fn resolve(&self, locator: &Locator) -> Result<Element, ScraperError> {
        self.resolve_steps(locator.steps(), locator)
            .await?
            .ok_or_else(|| ScraperError::ElementNotFound(locator.to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        debug!("遷移: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn back(&self) -> Result<(), ScraperError> {
        self.page
            .evaluate("window.history.back()")
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        self.page
            .url()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| ScraperError::Navigation(e.to_string()))
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        let start = Instant::now();
        loop {
            if !self.matches_in(None, selector).await.is_empty() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(ScraperError::Timeout(format!(
                    "{} が{}秒以内に表示されませんでした",
                    selector,
                    timeout.as_secs()
                )));
            }
            sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ScraperError> {
        let parent = match self.resolve_steps(locator.parent_steps(), locator).await {
            Ok(parent) => parent,
            Err(ScraperError::ElementNotFound(_)) => return Ok(0),
            Err(e) => return Err(e),
        };
        let found = self
            .matches_in(parent.as_ref(), locator.last_step().selector())
            .await;
        Ok(found.len())
    }

    async fn text(&self, locator: &Locator) -> Result<String, ScraperError> {
        let element = self.resolve(locator).await?;
        element
            .inner_text()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| ScraperError::JavaScript(format!("{}: {}", locator, e)))
    }

    async fn attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        let element = self.resolve(locator).await?;
        element
            .attribute(name)
            .await
            .map_err(|e| ScraperError::JavaScript(format!("{}@{}: {}", locator, name, e)))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ScraperError> {
        let element = self.resolve(locator).await?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| ScraperError::JavaScript(format!("{}: {}", locator, e)))?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), ScraperError> {
        let element = self.resolve(locator).await?;
        element
            .click()
            .await
            .map_err(|e| ScraperError::Navigation(format!("クリック {}: {}", locator, e)))?;
        Ok(())
    }

    async fn scroll_by(&self, dy: i64) -> Result<(), ScraperError> {
        let script = format!("window.scrollBy(0, {});", dy);
        self.page
            .evaluate(script.as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        info!("ブラウザを終了中...");

        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScraperError::Browser(format!("終了: {}", e)));
        if let Err(e) = browser.wait().await {
            debug!("ブラウザプロセスの待機に失敗: {}", e);
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        info!("ブラウザ終了完了");
        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if self.browser.is_some() {
            // Browser の Drop で chromiumoxide が子プロセスを終了させる
            warn!("close されずに破棄されたためブラウザを強制終了");
        }
    }
}
