//! ページから読み取った値の変換

use std::sync::OnceLock;

use regex::Regex;

/// `lat,lon` を持ちうるクエリキー（優先順）
const COORDINATE_KEYS: [&str; 3] = ["q", "center", "ll"];

fn embed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").expect("static coordinate pattern")
    })
}

/// 地図埋め込みURLから `(緯度, 経度)` を取り出す。
///
/// `!3d<lat>!4d<lon>` を優先し、次に `q`, `center`, `ll` クエリを見る。
/// 一致しなければ `(None, None)`。
pub fn extract_coordinates(embed_url: Option<&str>) -> (Option<f64>, Option<f64>) {
    let Some(link) = embed_url.filter(|s| !s.is_empty()) else {
        return (None, None);
    };

    if let Some((lat, lon)) = from_embed_segment(link) {
        return (Some(lat), Some(lon));
    }

    match from_query(link) {
        Some((lat, lon)) => (Some(lat), Some(lon)),
        None => (None, None),
    }
}

fn from_embed_segment(link: &str) -> Option<(f64, f64)> {
    let caps = embed_pattern().captures(link)?;
    let lat = caps.get(1)?.as_str().parse().ok()?;
    let lon = caps.get(2)?.as_str().parse().ok()?;
    Some((lat, lon))
}

fn from_query(link: &str) -> Option<(f64, f64)> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    for key in COORDINATE_KEYS {
        let value = url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.into_owned());

        let Some(value) = value else { continue };
        if let Some((lat, lon)) = value.split_once(',') {
            // 不正な値ならクエリ探索はここで終了
            let lat = lat.trim().parse().ok()?;
            let lon = lon.trim().parse().ok()?;
            return Some((lat, lon));
        }
    }
    None
}

/// `"1.234 tin"` のような件数表記を `1234` として読む。
///
/// `.` と `,` の区切りを除き、残りの数字をすべて連結する。
/// 入力なし・数字なし・桁あふれは 0。
pub fn extract_numeric(text: Option<&str>) -> u64 {
    let Some(text) = text else { return 0 };
    let digits: String = text
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}
