use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ブラウザエラー: {0}")]
    Browser(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("スクリプトエラー: {0}")]
    JavaScript(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),
}

impl ScraperError {
    /// 一覧ページ1件分だけを失うエラー（クロールは継続）
    pub fn is_page_level(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ElementNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_level_classification() {
        assert!(ScraperError::Timeout("count".into()).is_page_level());
        assert!(ScraperError::ElementNotFound("count".into()).is_page_level());
        assert!(!ScraperError::Navigation("crash".into()).is_page_level());
        assert!(!ScraperError::BrowserInit("launch".into()).is_page_level());
    }
}
