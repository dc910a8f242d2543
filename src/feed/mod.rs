//! The remote alert feed as seen by the poll loop.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::Region;

pub use client::FeedClient;
pub use error::FetchError;

/// Source of region snapshots.
#[async_trait]
pub trait AlertFeed: Send + Sync {
    async fn fetch_regions(&self, region_id: &str) -> Result<Vec<Region>, FetchError>;
}

#[async_trait]
impl AlertFeed for FeedClient {
    async fn fetch_regions(&self, region_id: &str) -> Result<Vec<Region>, FetchError> {
        self.get_alerts(Some(region_id)).await
    }
}
