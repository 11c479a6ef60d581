use tokio::time::sleep;
use tracing::debug;

use crate::config::{DelayRange, Delays};

/// ブラウザ操作間のランダム待機
#[derive(Debug, Clone)]
pub struct Pacer {
    delays: Delays,
}

impl Pacer {
    pub fn new(delays: Delays) -> Self {
        Self { delays }
    }

    pub fn delays(&self) -> &Delays {
        &self.delays
    }

    pub async fn pause(&self, range: DelayRange) {
        let wait = range.sample();
        if wait.is_zero() {
            return;
        }
        debug!("待機: {:?}", wait);
        sleep(wait).await;
    }

    pub async fn after_page_load(&self) {
        self.pause(self.delays.page_load).await;
    }

    pub async fn after_detail(&self) {
        self.pause(self.delays.detail).await;
    }

    pub async fn after_scroll(&self) {
        self.pause(self.delays.scroll).await;
    }

    pub async fn after_scroll_into_view(&self) {
        self.pause(self.delays.scroll_into_view).await;
    }

    pub async fn after_back(&self) {
        self.pause(self.delays.back).await;
    }

    pub async fn after_invalid_back(&self) {
        self.pause(self.delays.invalid_back).await;
    }

    pub async fn between_pages(&self) {
        self.pause(self.delays.between_pages).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_zero_delays_do_not_sleep() {
        let pacer = Pacer::new(Delays::none());
        let start = Instant::now();
        pacer.after_page_load().await;
        pacer.between_pages().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_waits_at_least_min() {
        let pacer = Pacer::new(Delays::none());
        let start = Instant::now();
        pacer
            .pause(DelayRange {
                min: Duration::from_millis(20),
                max: Duration::from_millis(30),
            })
            .await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
