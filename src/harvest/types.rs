//! 収集データ型

use serde::{Deserialize, Serialize};

use crate::config::Category;

/// 出力1行分。シリアライズ順がCSVの列順。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub price: Option<String>,
    pub area: Option<String>,
    pub n_bedrooms: Option<String>,
    pub n_bathrooms: Option<String>,
    pub n_floors: Option<String>,
    pub legal: Option<String>,
    pub interior: Option<String>,
    pub facing_direction: Option<String>,
    pub balcony_direction: Option<String>,
    pub front_width: Option<String>,
    pub front_road_width: Option<String>,
    pub title: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub verified: Option<u8>,
    pub location: Option<String>,
    pub location_details: Option<String>,
    pub property_type: Option<String>,
    pub date_of_posting: Option<String>,
    pub url: Option<String>,
}

impl ListingRecord {
    pub const FIELDS: [&'static str; 20] = [
        "price",
        "area",
        "n_bedrooms",
        "n_bathrooms",
        "n_floors",
        "legal",
        "interior",
        "facing_direction",
        "balcony_direction",
        "front_width",
        "front_road_width",
        "title",
        "latitude",
        "longitude",
        "verified",
        "location",
        "location_details",
        "property_type",
        "date_of_posting",
        "url",
    ];

    /// 指定カテゴリの空レコード
    pub fn for_category(category: &Category) -> Self {
        Self {
            property_type: Some(category.name.clone()),
            ..Default::default()
        }
    }

    pub fn set_spec(&mut self, field: SpecField, value: String) {
        let slot = match field {
            SpecField::Price => &mut self.price,
            SpecField::Area => &mut self.area,
            SpecField::Bedrooms => &mut self.n_bedrooms,
            SpecField::Bathrooms => &mut self.n_bathrooms,
            SpecField::Floors => &mut self.n_floors,
            SpecField::Legal => &mut self.legal,
            SpecField::Interior => &mut self.interior,
            SpecField::FacingDirection => &mut self.facing_direction,
            SpecField::BalconyDirection => &mut self.balcony_direction,
            SpecField::FrontWidth => &mut self.front_width,
            SpecField::FrontRoadWidth => &mut self.front_road_width,
        };
        *slot = Some(value);
    }
}

/// 詳細ページの物件概要欄から埋める項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    Price,
    Area,
    Bedrooms,
    Bathrooms,
    Floors,
    Legal,
    Interior,
    FacingDirection,
    BalconyDirection,
    FrontWidth,
    FrontRoadWidth,
}

impl SpecField {
    /// 物件概要欄のラベルを項目に対応付け
    pub fn from_label(label: &str) -> Option<Self> {
        let field = match label.trim() {
            "Khoảng giá" => Self::Price,
            "Diện tích" => Self::Area,
            "Số phòng ngủ" => Self::Bedrooms,
            "Số phòng tắm, vệ sinh" => Self::Bathrooms,
            "Số tầng" => Self::Floors,
            "Pháp lý" => Self::Legal,
            "Nội thất" => Self::Interior,
            "Hướng nhà" => Self::FacingDirection,
            "Hướng ban công" => Self::BalconyDirection,
            "Mặt tiền" => Self::FrontWidth,
            "Đường vào" => Self::FrontRoadWidth,
            _ => return None,
        };
        Some(field)
    }
}

/// 仮想クロールインデックスから求めた (カテゴリ, ページ)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub index: u64,
    pub category: Category,
    pub page: u64,
}

impl PageTarget {
    /// カテゴリを順番に回す: `i mod C` がカテゴリ、`i div C + 1` がページ
    pub fn from_index(index: u64, categories: &[Category]) -> Option<Self> {
        let count = categories.len() as u64;
        if count == 0 {
            return None;
        }
        let category = categories[(index % count) as usize].clone();
        Some(Self {
            index,
            category,
            page: index / count + 1,
        })
    }

    pub fn list_url(&self, sort_value: u32) -> String {
        format!(
            "{}/p{}?sortValue={}",
            self.category.url.trim_end_matches('/'),
            self.page,
            sort_value
        )
    }
}

/// 一覧ページ1件の処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Harvested(Vec<ListingRecord>),
    /// 件数から見て最終ページを超えている
    BeyondLastPage { total_results: u64 },
    NoCards,
    /// 1回の再読み込み後もカテゴリ外
    Redirected { landed: String },
}

impl PageOutcome {
    pub fn into_records(self) -> Vec<ListingRecord> {
        match self {
            PageOutcome::Harvested(records) => records,
            _ => Vec::new(),
        }
    }
}
