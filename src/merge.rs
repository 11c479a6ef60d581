//! 複数サイトから収集した物件表を1ファイルに統合

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::ScraperError;
use crate::writer::UTF8_BOM;

/// 行の取得元を示す列
pub const SOURCE_COLUMN: &str = "source";

#[derive(Debug, Clone)]
pub struct MergeSource {
    pub path: PathBuf,
    pub source: String,
}

impl MergeSource {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub columns: Vec<String>,
    pub rows_per_source: Vec<(String, usize)>,
    pub total_rows: usize,
}

struct Table {
    source: String,
    columns: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

fn normalize_column(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn read_table(input: &MergeSource) -> Result<Table, ScraperError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&input.path)?;

    let mut columns = HashMap::new();
    for (i, name) in reader.headers()?.iter().enumerate() {
        columns.entry(normalize_column(name)).or_insert(i);
    }

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    info!(
        "{}行 x {}列を読み込み: {}",
        rows.len(),
        columns.len(),
        input.path.display()
    );

    Ok(Table {
        source: input.source.clone(),
        columns,
        rows,
    })
}

/// 入力の列を和集合にし、全行を1つのヘッダーの下に積む。
///
/// 列名は正規化（前後空白除去・小文字化）してソートし、最後に `source` を付ける。
/// 入力にない列は空欄。`output` に既存ファイルがあれば置き換える。
pub fn merge_sources(sources: &[MergeSource], output: &Path) -> Result<MergeSummary, ScraperError> {
    let tables = sources
        .iter()
        .map(read_table)
        .collect::<Result<Vec<_>, _>>()?;

    let union: BTreeSet<&str> = tables
        .iter()
        .flat_map(|t| t.columns.keys().map(String::as_str))
        .filter(|c| *c != SOURCE_COLUMN)
        .collect();
    let mut columns: Vec<String> = union.into_iter().map(str::to_string).collect();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if output.exists() {
        std::fs::remove_file(output)?;
    }

    let mut file = File::create(output)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = columns.clone();
    header.push(SOURCE_COLUMN.to_string());
    writer.write_record(&header)?;

    let mut rows_per_source = Vec::with_capacity(tables.len());
    for table in &tables {
        for row in &table.rows {
            let mut cells: Vec<&str> = columns
                .iter()
                .map(|c| {
                    table
                        .columns
                        .get(c)
                        .and_then(|i| row.get(*i))
                        .unwrap_or("")
                })
                .collect();
            cells.push(&table.source);
            writer.write_record(&cells)?;
        }
        rows_per_source.push((table.source.clone(), table.rows.len()));
    }
    writer.flush()?;

    let total_rows = rows_per_source.iter().map(|(_, n)| n).sum();
    columns.push(SOURCE_COLUMN.to_string());
    info!(
        "{}行 x {}列を統合: {}",
        total_rows,
        columns.len(),
        output.display()
    );

    Ok(MergeSummary {
        columns,
        rows_per_source,
        total_rows,
    })
}
