use listing_harvest::{HarvestRequest, HarvestService};
use tower::Service;

fn env_index(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info,listing_harvest=debug,chromiumoxide=warn")
        .init();

    // クロール範囲 例: HARVEST_START=0 HARVEST_END=8
    let start = env_index("HARVEST_START", 439);
    let end = env_index("HARVEST_END", 500);
    let headless = std::env::var("HARVEST_HEADLESS").map(|v| v != "0").unwrap_or(false);

    let request = HarvestRequest::new(start, end)
        .with_output_path("data/raw/batdongsan_com_vn.csv")
        .with_headless(headless);

    println!("=== Listing Harvest i={}..{} ===", start, end);

    let mut service = HarvestService::new();
    match service.call(request).await {
        Ok(summary) => {
            println!(
                "成功! {}ページ取得, {}ページスキップ, {}行 -> {:?}",
                summary.pages_harvested,
                summary.pages_skipped,
                summary.records_written,
                summary.output_path
            );
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
        }
    }
}
