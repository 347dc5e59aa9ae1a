use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec};
use wdc_core::schema::ColumnInfo;

use super::run_offset_loop;
use crate::api::{CatalogApi, DEFAULT_LIMIT};
use crate::error::Result;
use crate::filters::Filters;

/// The current user's top tracks, offset paginated.
#[derive(Debug, Default)]
pub struct TopTracks {
    mapping: Mapping,
    filters: Filters,
}

impl TopTracks {
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
                "album_id" => Some("album.id".to_owned()),
                "artist_id" => Some("artists[0].id".to_owned()),
                "artist_name" => Some("artists[0].name".to_owned()),
                "duration_ms" => Some("duration_ms".to_owned()),
                "explicit" => Some("explicit".to_owned()),
                "href" => Some("href".to_owned()),
                "id" => Some("id".to_owned()),
                "name" => Some("name".to_owned()),
                "preview_url" => Some("preview_url".to_owned()),
                "track_number" => Some("track_number".to_owned()),
                "uri" => Some("uri".to_owned()),
                _ => None,
            };

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Retrieves, flattens and emits every page of top tracks.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let time_range = self.filters.time_range;

        run_offset_loop("Top Tracks", &self.mapping, host, sink, |offset| {
            api.top_tracks(time_range, offset, DEFAULT_LIMIT)
        })
        .await
    }
}
