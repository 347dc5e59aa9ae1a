use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec};
use wdc_core::schema::ColumnInfo;

use super::run_offset_loop;
use crate::api::{CatalogApi, DEFAULT_LIMIT};
use crate::error::Result;
use crate::filters::Filters;

/// Tracks saved in the current user's library, offset paginated.
///
/// Library items nest the track record under a `track` key next to the
/// `added_at` timestamp, so every lookup except `added_at` goes through it.
#[derive(Debug, Default)]
pub struct Tracks {
    mapping: Mapping,
    filters: Filters,
}

impl Tracks {
    pub fn new(filters: Filters) -> Self {
        Self {
            mapping: Mapping::new(),
            filters,
        }
    }

    /// Attaches lookup paths to the schema columns and registers them as
    /// mapping rules.
    pub fn define_mapping_rules(&mut self, columns: &[ColumnInfo]) -> Result<&mut Self> {
        let specs = columns.iter().map(|col| {
            let mut spec = RuleSpec {
                id: col.id.clone(),
                data_type: Some(col.data_type.to_string()),
                ..RuleSpec::default()
            };

            spec.lookup = match col.id.as_str() {
                "added_at" => Some("added_at".to_owned()),
                "album_id" => Some("track.album.id".to_owned()),
                "artist_id" => Some("track.artists[0].id".to_owned()),
                "artist_name" => Some("track.artists[0].name".to_owned()),
                "duration_ms" => Some("track.duration_ms".to_owned()),
                "explicit" => Some("track.explicit".to_owned()),
                "href" => Some("track.href".to_owned()),
                "id" => Some("track.id".to_owned()),
                "name" => Some("track.name".to_owned()),
                "preview_url" => Some("track.preview_url".to_owned()),
                "track_number" => Some("track.track_number".to_owned()),
                "uri" => Some("track.uri".to_owned()),
                _ => None,
            };

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Retrieves, flattens and emits every page of saved tracks.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let market = self.filters.market.as_deref();

        run_offset_loop("Tracks", &self.mapping, host, sink, |offset| {
            api.saved_tracks(market, offset, DEFAULT_LIMIT)
        })
        .await
    }
}
