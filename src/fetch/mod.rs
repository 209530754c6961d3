pub mod config;
pub mod http;

pub use config::FetchConfig;
pub use http::HttpFetcher;

use crate::core::{GameMode, Result};
use crate::storage::RawPayload;
use async_trait::async_trait;

/// One page of the upstream listing.
#[derive(Debug, Clone)]
pub struct Page {
    pub entries: Vec<RawPayload>,
    pub total_pages: u32,
    pub total_rows: u32,
}

/// Cheap paged access to the upstream summary listing.
#[async_trait]
pub trait ListingFetch {
    /// Fetch one listing page. Fails with `Transport` on network or decode
    /// problems; the caller treats that as fatal for the category.
    async fn fetch_page(&self, mode: GameMode, page: u32) -> Result<Page>;
}

/// Expensive per-identity detail lookup.
#[async_trait]
pub trait DetailFetch {
    /// Fetch the rich detail payload for one handle. Fails with `NotFound`
    /// when the remote no longer recognizes the handle; task-local either
    /// way.
    async fn fetch_detail(&self, mode: GameMode, handle: &str) -> Result<RawPayload>;
}
