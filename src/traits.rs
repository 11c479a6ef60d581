use std::time::Duration;

use async_trait::async_trait;

use crate::browser::Locator;
use crate::error::ScraperError;

/// 収集処理が使うブラウザ操作。
///
/// 要素は [`Locator`] で指定し、呼び出しごとに解決し直す。
/// ページ遷移をまたいで要素ハンドルを保持しない。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// URLへ遷移
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;

    /// 履歴を1つ戻る
    async fn back(&self) -> Result<(), ScraperError>;

    async fn current_url(&self) -> Result<String, ScraperError>;

    /// `selector` が現れるまで待機、期限切れは `Timeout`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError>;

    /// 親要素内で最後のステップに一致する要素数
    async fn count(&self, locator: &Locator) -> Result<usize, ScraperError>;

    /// 要素の表示テキスト
    async fn text(&self, locator: &Locator) -> Result<String, ScraperError>;

    /// 属性値、属性がなければ `Ok(None)`
    async fn attribute(&self, locator: &Locator, name: &str)
        -> Result<Option<String>, ScraperError>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ScraperError>;

    async fn click(&self, locator: &Locator) -> Result<(), ScraperError>;

    /// ウィンドウを縦スクロール
    async fn scroll_by(&self, dy: i64) -> Result<(), ScraperError>;

    /// ブラウザを解放
    async fn close(&mut self) -> Result<(), ScraperError>;
}
