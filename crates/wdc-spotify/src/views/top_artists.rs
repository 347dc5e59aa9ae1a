use serde_json::json;
use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec};
use wdc_core::schema::ColumnInfo;

use super::run_offset_loop;
use crate::api::{CatalogApi, DEFAULT_LIMIT};
use crate::error::Result;
use crate::filters::Filters;

/// The current user's top artists, offset paginated.
#[derive(Debug, Default)]
pub struct TopArtists {
    mapping: Mapping,
    filters: Filters,
}

impl TopArtists {
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

            match col.id.as_str() {
                "followers" => {
                    spec.lookup = Some("followers.total".to_owned());
                    spec.default_value = Some(json!(0));
                }
                "genre1" => spec.lookup = Some("genres[0]".to_owned()),
                "genre2" => spec.lookup = Some("genres[1]".to_owned()),
                "href" => spec.lookup = Some("href".to_owned()),
                "id" => spec.lookup = Some("id".to_owned()),
                "image_link" => spec.lookup = Some("images[0].url".to_owned()),
                "name" => spec.lookup = Some("name".to_owned()),
                "popularity" => spec.lookup = Some("popularity".to_owned()),
                "uri" => spec.lookup = Some("uri".to_owned()),
                _ => {}
            }

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Retrieves, flattens and emits every page of top artists.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let time_range = self.filters.time_range;

        run_offset_loop("Top Artists", &self.mapping, host, sink, |offset| {
            api.top_artists(time_range, offset, DEFAULT_LIMIT)
        })
        .await
    }
}
