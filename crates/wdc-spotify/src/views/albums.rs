use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec};
use wdc_core::schema::ColumnInfo;

use super::run_offset_loop;
use crate::api::{CatalogApi, DEFAULT_LIMIT};
use crate::error::Result;
use crate::filters::Filters;

/// Albums saved in the current user's library, offset paginated.
///
/// Library items nest the album record under an `album` key next to the
/// `added_at` timestamp, so every lookup except `added_at` goes through it.
#[derive(Debug, Default)]
pub struct Albums {
    mapping: Mapping,
    filters: Filters,
}

impl Albums {
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
                "artist_id" => Some("album.artists[0].id".to_owned()),
                "genre1" => Some("album.genres[0]".to_owned()),
                "genre2" => Some("album.genres[1]".to_owned()),
                "href" => Some("album.href".to_owned()),
                "id" => Some("album.id".to_owned()),
                "image_link" => Some("album.images[0].url".to_owned()),
                "name" => Some("album.name".to_owned()),
                "popularity" => Some("album.popularity".to_owned()),
                "uri" => Some("album.uri".to_owned()),
                "release_date" => Some("album.release_date".to_owned()),
                "type" => Some("album.type".to_owned()),
                _ => None,
            };

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Retrieves, flattens and emits every page of saved albums.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let market = self.filters.market.as_deref();

        run_offset_loop("Albums", &self.mapping, host, sink, |offset| {
            api.saved_albums(market, offset, DEFAULT_LIMIT)
        })
        .await
    }
}
