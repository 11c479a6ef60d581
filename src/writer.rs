use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ScraperError;
use crate::harvest::ListingRecord;

/// UTF-8 BOM（表計算ソフトでの文字化け防止）
pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 物件バッチをCSVファイルへ追記
#[derive(Debug, Clone)]
pub struct RecordWriter {
    path: PathBuf,
}

impl RecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 行単位で追記する。新規または空のファイルには先にBOMとヘッダーを書く。
    pub fn append(&self, records: &[ListingRecord]) -> Result<usize, ScraperError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if needs_header {
            file.write_all(UTF8_BOM)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(ListingRecord::FIELDS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("{}行を {} に書き込み", records.len(), self.path.display());
        Ok(records.len())
    }
}
