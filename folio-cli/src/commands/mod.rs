//! CLI command implementations

mod account;
mod books;
mod borrow;
mod home;

pub use account::{login, profile, register};
pub use books::{book, books, categories};
pub use borrow::{borrow, buy, return_book};
pub use home::home;

use anyhow::{Context, Result};
use folio_client::HttpCatalog;
use folio_core::{format::format_price, BookRecord, FolioConfig, SessionContext};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Build an HTTP client for the configured backend
fn connect(config: &FolioConfig, session: SessionContext) -> Result<HttpCatalog> {
    HttpCatalog::new(config, session)
        .with_context(|| format!("Failed to set up a client for {}", config.api_url))
}

/// Animated spinner shown while a request is in flight
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

fn price_label(book: &BookRecord) -> String {
    book.price
        .filter(|p| p.is_finite())
        .map(format_price)
        .unwrap_or_else(|| "-".to_string())
}
