//! The data-source boundary consumed by data views.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::filters::TimeRange;

/// Default offset for paginated endpoints.
pub const DEFAULT_OFFSET: u32 = 0;

/// Default page size for paginated endpoints.
pub const DEFAULT_LIMIT: u32 = 50;

/// Hard API limit for one several-artists request.
pub const MAX_ARTIST_IDS: usize = 50;

/// Hard API limit for one several-audio-features request.
pub const MAX_AUDIO_FEATURE_IDS: usize = 100;

/// One page of an offset-paginated listing.
///
/// Items stay raw JSON: the mapping engine resolves fields by lookup path, so
/// there is no point deserializing every endpoint into its own record type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// The records on this page.
    #[serde(default)]
    pub items: Vec<Value>,
    /// URL of the next page, absent on the last page.
    pub next: Option<String>,
    /// Offset of this page within the full listing.
    #[serde(default)]
    pub offset: u32,
    /// Page size used by the server.
    #[serde(default)]
    pub limit: u32,
    /// Total records in the full listing.
    #[serde(default)]
    pub total: u32,
}

/// Read operations against the Spotify catalog.
///
/// Implemented by [`SpotifyClient`] over HTTP and by scripted mocks in tests;
/// data views only ever depend on this trait.
///
/// [`SpotifyClient`]: crate::client::SpotifyClient
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// The current user's top artists.
    async fn top_artists(&self, time_range: TimeRange, offset: u32, limit: u32) -> Result<Page>;

    /// The current user's top tracks.
    async fn top_tracks(&self, time_range: TimeRange, offset: u32, limit: u32) -> Result<Page>;

    /// Albums saved in the current user's library.
    async fn saved_albums(&self, market: Option<&str>, offset: u32, limit: u32) -> Result<Page>;

    /// Tracks saved in the current user's library.
    async fn saved_tracks(&self, market: Option<&str>, offset: u32, limit: u32) -> Result<Page>;

    /// Several artists by id. At most [`MAX_ARTIST_IDS`] per call.
    async fn artists(&self, ids: &[String]) -> Result<Vec<Value>>;

    /// Audio features for several tracks. At most
    /// [`MAX_AUDIO_FEATURE_IDS`] per call.
    async fn audio_features(&self, ids: &[String]) -> Result<Vec<Value>>;
}
