//! Per-table data views.
//!
//! Each view owns a [`Mapping`] configured with the lookup paths for its
//! table and drives one of the two retrieval shapes against the catalog:
//! offset pagination or id-batch resolution. Both are written as explicit
//! sequential loops with exactly one page in flight, so memory stays bounded
//! to one page of rows and batches reach the sink in retrieval order.

mod albums;
mod artists;
mod top_artists;
mod top_tracks;
mod tracks;
mod tracks_features;

use std::future::Future;

use serde_json::Value;
use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::Mapping;

pub use self::albums::Albums;
pub use self::artists::Artists;
pub use self::top_artists::TopArtists;
pub use self::top_tracks::TopTracks;
pub use self::tracks::Tracks;
pub use self::tracks_features::TracksFeatures;

use crate::api::{DEFAULT_OFFSET, Page};
use crate::error::Result;

/// Tracing target for data view operations.
pub const TRACING_TARGET: &str = "wdc_spotify::views";

/// Drives an offset-paginated gather to completion.
///
/// Fetches page after page starting at offset zero, flattening and emitting
/// each page before requesting the next one. The first fetch or mapping
/// failure propagates immediately; there is no retry.
pub(crate) async fn run_offset_loop<F, Fut>(
    label: &str,
    mapping: &Mapping,
    host: &dyn ConnectorHost,
    sink: &mut dyn RowSink,
    fetch: F,
) -> Result<()>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut offset = DEFAULT_OFFSET;

    loop {
        let page = fetch(offset).await?;
        let rows = mapping.flatten_data(&page.items)?;

        host.report_progress(&format!(
            "Retrieving {label}:\ntotal: {}\n offset: {} \n limit: {}",
            page.total, page.offset, page.limit
        ));

        tracing::debug!(
            target: TRACING_TARGET,
            label,
            offset = page.offset,
            rows = rows.len(),
            has_next = page.next.is_some(),
            "Page retrieved"
        );

        // Send the flattened page along and release it.
        sink.append_rows(rows);

        if page.next.is_none() {
            return Ok(());
        }

        offset = page.offset + page.limit;
    }
}

/// Drives an id-batch gather to completion.
///
/// Consumes the id list back-to-front in batches of at most `max_batch`
/// (a hard API limit, not tunable). An empty id list completes immediately
/// without a network call; a batch answered with zero items also completes.
pub(crate) async fn run_id_batch_loop<F, Fut>(
    label: &str,
    max_batch: usize,
    mut ids: Vec<String>,
    mapping: &Mapping,
    host: &dyn ConnectorHost,
    sink: &mut dyn RowSink,
    fetch: F,
) -> Result<()>
where
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    loop {
        let split_at = ids.len().saturating_sub(max_batch);
        let batch = ids.split_off(split_at);

        if batch.is_empty() {
            return Ok(());
        }

        host.report_progress(&format!(
            "Retrieving {} {label}\n {} remaining",
            batch.len(),
            ids.len()
        ));

        let items = fetch(batch).await?;
        if items.is_empty() {
            return Ok(());
        }

        let rows = mapping.flatten_data(&items)?;

        tracing::debug!(
            target: TRACING_TARGET,
            label,
            rows = rows.len(),
            remaining = ids.len(),
            "Batch retrieved"
        );

        sink.append_rows(rows);
    }
}
