//! Scripted catalog for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{CatalogApi, Page};
use crate::error::{Error, Result};
use crate::filters::TimeRange;
use crate::status::ApiFailure;

#[derive(Default)]
struct MockState {
    pages: VecDeque<Page>,
    batches: VecDeque<Vec<Value>>,
    failure: Option<ApiFailure>,
    calls: Vec<String>,
}

/// An in-memory [`CatalogApi`] fed with scripted responses.
///
/// Paged endpoints share one queue of pages and batch endpoints share one
/// queue of batches; every call is recorded with its salient parameters so
/// tests can assert on request order. An exhausted queue answers with an
/// empty page or batch.
#[derive(Default)]
pub struct MockCatalog {
    state: Mutex<MockState>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a page for the next paged call.
    #[must_use]
    pub fn with_page(self, page: Page) -> Self {
        self.state.lock().unwrap().pages.push_back(page);
        self
    }

    /// Queues a batch for the next id-batch call.
    #[must_use]
    pub fn with_batch(self, batch: Vec<Value>) -> Self {
        self.state.lock().unwrap().batches.push_back(batch);
        self
    }

    /// Makes every call fail with the given API failure.
    #[must_use]
    pub fn failing_with(self, failure: ApiFailure) -> Self {
        self.state.lock().unwrap().failure = Some(failure);
        self
    }

    /// The calls recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// [`CatalogApi::artists`] taking ownership of the id batch, for use in
    /// `Fn(Vec<String>)` fetch closures.
    pub async fn artists_owned(&self, ids: Vec<String>) -> Result<Vec<Value>> {
        self.artists(&ids).await
    }

    /// [`CatalogApi::audio_features`] taking ownership of the id batch.
    pub async fn audio_features_owned(&self, ids: Vec<String>) -> Result<Vec<Value>> {
        self.audio_features(&ids).await
    }

    fn next_page(&self, call: String) -> Result<Page> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(failure) = state.failure.clone() {
            return Err(Error::Api(failure));
        }
        Ok(state.pages.pop_front().unwrap_or_default())
    }

    fn next_batch(&self, call: String) -> Result<Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(failure) = state.failure.clone() {
            return Err(Error::Api(failure));
        }
        Ok(state.batches.pop_front().unwrap_or_default())
    }
}

impl std::fmt::Debug for MockCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalog").finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn top_artists(&self, _time_range: TimeRange, offset: u32, _limit: u32) -> Result<Page> {
        self.next_page(format!("top_artists offset={offset}"))
    }

    async fn top_tracks(&self, _time_range: TimeRange, offset: u32, _limit: u32) -> Result<Page> {
        self.next_page(format!("top_tracks offset={offset}"))
    }

    async fn saved_albums(&self, _market: Option<&str>, offset: u32, _limit: u32) -> Result<Page> {
        self.next_page(format!("saved_albums offset={offset}"))
    }

    async fn saved_tracks(&self, _market: Option<&str>, offset: u32, _limit: u32) -> Result<Page> {
        self.next_page(format!("saved_tracks offset={offset}"))
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.next_batch(format!("artists ids={}", ids.join(",")))
    }

    async fn audio_features(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.next_batch(format!("audio_features ids={}", ids.join(",")))
    }
}
