//! 収集処理のテスト用に動作を記述できるインメモリブラウザ

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::browser::Locator;
use crate::config::{Category, Delays, HarvestConfig};
use crate::error::ScraperError;
use crate::harvest::selectors;
use crate::traits::BrowserSession;

/// URLの表示状態1つ。キーは `Locator` の表示文字列
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    texts: HashMap<String, String>,
    attrs: HashMap<(String, String), String>,
    counts: HashMap<String, usize>,
    links: HashMap<String, String>,
    broken: HashSet<String>,
    lazy: HashSet<String>,
    lazy_after_scrolls: usize,
}

impl FakePage {
    pub fn text(mut self, locator: &Locator, text: &str) -> Self {
        self.texts.insert(locator.to_string(), text.to_string());
        self
    }

    pub fn attr(mut self, locator: &Locator, name: &str, value: &str) -> Self {
        self.attrs
            .insert((locator.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn count(mut self, locator: &Locator, count: usize) -> Self {
        self.counts.insert(locator.to_string(), count);
        self
    }

    pub fn link(mut self, locator: &Locator, url: &str) -> Self {
        self.links.insert(locator.to_string(), url.to_string());
        self
    }

    /// この要素のクリックは失敗する
    pub fn broken(mut self, locator: &Locator) -> Self {
        self.broken.insert(locator.to_string());
        self
    }

    /// `scrolls` 回スクロールした後に現れる要素
    pub fn lazy(mut self, locator: &Locator, scrolls: usize) -> Self {
        self.lazy.insert(locator.to_string());
        self.lazy_after_scrolls = scrolls;
        self
    }

    fn visible(&self, key: &str, scrolls: usize) -> bool {
        !self.lazy.contains(key) || scrolls >= self.lazy_after_scrolls
    }

    fn has(&self, key: &str) -> bool {
        self.texts.contains_key(key)
            || self.links.contains_key(key)
            || self.counts.get(key).copied().unwrap_or(0) > 0
            || self.attrs.keys().any(|(k, _)| k == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Back,
    ScrollIntoView(String),
    Click(String),
    ScrollBy(i64),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pages: HashMap<String, Vec<FakePage>>,
    visits: HashMap<String, usize>,
    redirects: HashMap<String, VecDeque<String>>,
    dead: HashSet<String>,
    history: Vec<String>,
    current: String,
    scrolls: usize,
    pub actions: Vec<Action>,
    pub closes: usize,
}

impl FakeState {
    fn arrive(&mut self, url: &str) {
        self.current = url.to_string();
        self.scrolls = 0;
        *self.visits.entry(url.to_string()).or_default() += 1;
    }

    fn page(&self) -> Option<&FakePage> {
        let variants = self.pages.get(&self.current)?;
        let visit = self.visits.get(&self.current).copied().unwrap_or(1).max(1);
        variants.get(visit - 1).or_else(|| variants.last())
    }

    fn element(&self, locator: &Locator) -> Result<&FakePage, ScraperError> {
        let key = locator.to_string();
        match self.page() {
            Some(page) if page.has(&key) && page.visible(&key, self.scrolls) => Ok(page),
            _ => Err(ScraperError::ElementNotFound(key)),
        }
    }
}

/// クローンは状態を共有する。セッションをドライバーに渡した後も
/// テスト側で参照できる。
#[derive(Debug, Clone, Default)]
pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `url` で `page` を返す。複数回呼ぶと以降の訪問用の状態を追加
    pub fn page(self, url: &str, page: FakePage) -> Self {
        self.lock().pages.entry(url.to_string()).or_default().push(page);
        self
    }

    /// 次の `from` への遷移は `to` に着く
    pub fn redirect_once(self, from: &str, to: &str) -> Self {
        self.lock()
            .redirects
            .entry(from.to_string())
            .or_default()
            .push_back(to.to_string());
        self
    }

    /// `url` への遷移はブラウザクラッシュのように失敗する
    pub fn dead_url(self, url: &str) -> Self {
        self.lock().dead.insert(url.to_string());
        self
    }

    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// ブラウザが既に `url` を表示している状態にする
    pub fn at(self, url: &str) -> Self {
        {
            let mut state = self.lock();
            state.history.push(url.to_string());
            state.arrive(url);
        }
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Click(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn card_interactions(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, Action::Click(_) | Action::ScrollIntoView(_)))
            .count()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.actions.push(Action::Goto(url.to_string()));
        if state.dead.contains(url) {
            return Err(ScraperError::Navigation(format!("target closed: {}", url)));
        }
        let landed = state
            .redirects
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| url.to_string());
        state.history.push(landed.clone());
        state.arrive(&landed);
        Ok(())
    }

    async fn back(&self) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.actions.push(Action::Back);
        if state.history.len() > 1 {
            state.history.pop();
        }
        let previous = state.history.last().cloned().unwrap_or_default();
        state.arrive(&previous);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        Ok(self.lock().current.clone())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<(), ScraperError> {
        let state = self.lock();
        state
            .element(&Locator::css(selector))
            .map(|_| ())
            .map_err(|_| ScraperError::Timeout(selector.to_string()))
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ScraperError> {
        let state = self.lock();
        let key = locator.to_string();
        Ok(state
            .page()
            .filter(|p| p.visible(&key, state.scrolls))
            .and_then(|p| p.counts.get(&key).copied())
            .unwrap_or(0))
    }

    async fn text(&self, locator: &Locator) -> Result<String, ScraperError> {
        let state = self.lock();
        let page = state.element(locator)?;
        Ok(page
            .texts
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn attribute(
        &self,
        locator: &Locator,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        let state = self.lock();
        let page = state.element(locator)?;
        Ok(page
            .attrs
            .get(&(locator.to_string(), name.to_string()))
            .cloned())
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.element(locator)?;
        state.actions.push(Action::ScrollIntoView(locator.to_string()));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), ScraperError> {
        let mut state = self.lock();
        let key = locator.to_string();
        let target = {
            let page = state.element(locator)?;
            if page.broken.contains(&key) {
                return Err(ScraperError::Navigation(format!("click intercepted: {}", key)));
            }
            page.links.get(&key).cloned()
        };
        state.actions.push(Action::Click(key));
        if let Some(url) = target {
            state.history.push(url.clone());
            state.arrive(&url);
        }
        Ok(())
    }

    async fn scroll_by(&self, dy: i64) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.actions.push(Action::ScrollBy(dy));
        state.scrolls += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.lock().closes += 1;
        Ok(())
    }
}

pub fn category() -> Category {
    Category::new("Nhà riêng", "https://site.test/ban-nha-rieng")
}

pub fn test_config() -> HarvestConfig {
    HarvestConfig::new(0, 1)
        .with_categories(vec![category()])
        .with_page_size(20)
        .with_delays(Delays::none())
        .with_wait_timeout(Duration::from_millis(10))
}

pub fn card(j: usize) -> Locator {
    Locator::css(selectors::CARD).nth(j)
}

pub fn card_title(j: usize) -> Locator {
    card(j).child(selectors::CARD_TITLE)
}

pub fn card_location(j: usize) -> Locator {
    card(j).child(selectors::CARD_LOCATION_PARTS).nth(1)
}

/// 件数表示と `(title, detail_url)` ごとのカードを持つ一覧ページ
pub fn listing_page(total: &str, cards: &[(&str, &str)]) -> FakePage {
    let mut page = listing_page_without_hrefs(total, cards);
    for (j, (_, url)) in cards.iter().enumerate() {
        page = page.attr(&card_title(j), "href", url);
    }
    page
}

/// `listing_page` と同じだがタイトルに `href` がない
pub fn listing_page_without_hrefs(total: &str, cards: &[(&str, &str)]) -> FakePage {
    let mut page = FakePage::default()
        .text(&Locator::css(selectors::TOTAL_COUNT), total)
        .text(&Locator::css(selectors::COUNT_NUMBER), total)
        .count(&Locator::css(selectors::CARD), cards.len());
    for (j, (title, url)) in cards.iter().enumerate() {
        page = page
            .text(&card_title(j), title)
            .link(&card_title(j), url)
            .text(&card_location(j), &format!("Quận {}", j + 1));
    }
    page
}

/// タイトルと地図埋め込みを持つ詳細ページ
pub fn detail_page(title: &str) -> FakePage {
    FakePage::default()
        .text(&Locator::css(selectors::TITLE), &format!("  {}  ", title))
        .attr(
            &Locator::css(selectors::MAP_BODY).child(selectors::MAP_IFRAME),
            "data-src",
            "https://www.google.com/maps/embed?pb=!1m18!3d21.0285!4d105.8542",
        )
}
