//! Folio Client - HTTP implementation of the catalog backend

mod client;
mod envelope;

pub use client::HttpCatalog;
