//! batdongsan.com.vn 一覧・詳細ページのセレクタ

// 一覧ページ
pub const TOTAL_COUNT: &str = ".re__srp-total-count.js__srp-total-result";
pub const COUNT_NUMBER: &str = ".re__srp-total-count.js__srp-total-result #count-number";
pub const CARD: &str = ".re__card-info";
pub const CARD_LOCATION_PARTS: &str = ".re__card-location > *";
pub const CARD_TITLE: &str = ".re__card-title";

// 詳細ページ
pub const TITLE: &str = ".re__pr-title.pr-title.js__pr-title";
pub const ADDRESS: &str = ".re__pr-short-description.js__pr-address";
pub const SPEC_ITEM: &str = ".re__pr-specs-content-item";
pub const SPEC_ITEM_TITLE: &str = ".re__pr-specs-content-item-title";
pub const SPEC_ITEM_VALUE: &str = ".re__pr-specs-content-item-value";
pub const VERIFIED_BADGE: &str = ".re__pr-stick-listing-verified";
pub const MAP_BODY: &str = ".re__section.re__pr-map.js__section.js__li-other .re__section-body";
pub const MAP_IFRAME: &str = "iframe";
pub const POSTING_DATE: &str = ".re__pr-short-info.re__pr-config.js__pr-config > :nth-child(1) > .value";
