//! ブラウザ操作: 要素ロケータとChromeセッション

mod chrome;
mod locator;

pub use chrome::ChromeSession;
pub use locator::{Locator, Step};
