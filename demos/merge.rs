use std::path::Path;

use listing_harvest::merge::{merge_sources, MergeSource};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let sources = [
        MergeSource::new(
            "data/preprocessed/batdongsancomvn_preprocessed.csv",
            "batdongsancomvn",
        ),
        MergeSource::new("data/preprocessed/muabannet_preprocessed.csv", "muabannet"),
    ];
    let output = Path::new("data/preprocessed/full.csv");

    match merge_sources(&sources, output) {
        Ok(summary) => {
            for (source, rows) in &summary.rows_per_source {
                println!("{}: {}行", source, rows);
            }
            println!(
                "成功! {}行 x {}列 -> {}",
                summary.total_rows,
                summary.columns.len(),
                output.display()
            );
        }
        Err(e) => eprintln!("エラー: {}", e),
    }
}
