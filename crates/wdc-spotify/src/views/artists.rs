use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec};
use wdc_core::schema::ColumnInfo;

use super::run_id_batch_loop;
use crate::api::{CatalogApi, MAX_ARTIST_IDS};
use crate::error::Result;
use crate::filters::Filters;

/// Artists resolved by id, in batches of at most [`MAX_ARTIST_IDS`].
///
/// Backs the join-only `tracksArtists` and `albumsArtists` tables: the ids
/// arrive as join filter values from the parent table's rows.
#[derive(Debug, Default)]
pub struct Artists {
    mapping: Mapping,
}

impl Artists {
    pub fn new(_filters: Filters) -> Self {
        Self {
            mapping: Mapping::new(),
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
                "id" => Some("id".to_owned()),
                "followers" => Some("followers.total".to_owned()),
                "genre1" => Some("genres[0]".to_owned()),
                "genre2" => Some("genres[1]".to_owned()),
                "href" => Some("href".to_owned()),
                "image_link" => Some("images[0].url".to_owned()),
                "name" => Some("name".to_owned()),
                "popularity" => Some("popularity".to_owned()),
                "uri" => Some("uri".to_owned()),
                _ => None,
            };

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Resolves, flattens and emits the requested artists batch by batch.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
        filter_values: Vec<String>,
    ) -> Result<()> {
        run_id_batch_loop(
            "Artists",
            MAX_ARTIST_IDS,
            filter_values,
            &self.mapping,
            host,
            sink,
            |ids| async move { api.artists(&ids).await },
        )
        .await
    }
}
