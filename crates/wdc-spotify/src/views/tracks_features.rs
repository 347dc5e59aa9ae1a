use serde_json::{Value, json};
use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::mapping::{Mapping, RuleSpec, Transform};
use wdc_core::schema::ColumnInfo;

use super::run_id_batch_loop;
use crate::api::{CatalogApi, MAX_AUDIO_FEATURE_IDS};
use crate::error::Result;
use crate::filters::Filters;

/// Pitch class notation for the audio feature `key` field, indexed 0 to 11.
const KEY_NOTATION: [&str; 12] = [
    "C", "C♯", "D", "E♭", "E", "F", "F♯", "G", "A♭", "A", "A♯", "B",
];

/// Audio features resolved by track id, in batches of at most
/// [`MAX_AUDIO_FEATURE_IDS`].
///
/// Backs the join-only `tracksFeatures` table. The numeric `key` and `mode`
/// fields are rewritten to their musical notation through inline transforms.
#[derive(Debug, Default)]
pub struct TracksFeatures {
    mapping: Mapping,
}

impl TracksFeatures {
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

            match col.id.as_str() {
                "key" => {
                    spec.lookup = Some("key".to_owned());
                    spec.default_value = Some(Value::Null);
                    spec.transform = Transform::inline(key_notation);
                }
                "mode" => {
                    spec.lookup = Some("mode".to_owned());
                    spec.default_value = Some(Value::Null);
                    spec.transform = Transform::inline(mode_notation);
                }
                "id" | "danceability" | "energy" | "loudness" | "speechiness"
                | "acousticness" | "instrumentalness" | "liveness" | "valence" | "tempo"
                | "time_signature" => {
                    spec.lookup = Some(col.id.clone());
                }
                _ => {}
            }

            spec
        });

        self.mapping.add_rules(specs)?;
        Ok(self)
    }

    /// Resolves, flattens and emits the requested audio features batch by
    /// batch.
    pub async fn get_flattened_data(
        &self,
        api: &dyn CatalogApi,
        host: &dyn ConnectorHost,
        sink: &mut dyn RowSink,
        filter_values: Vec<String>,
    ) -> Result<()> {
        run_id_batch_loop(
            "Tracks Features",
            MAX_AUDIO_FEATURE_IDS,
            filter_values,
            &self.mapping,
            host,
            sink,
            |ids| async move { api.audio_features(&ids).await },
        )
        .await
    }
}

/// Rewrites a pitch class index to its note name. Out-of-range or non-numeric
/// values become null.
fn key_notation(value: Value) -> Value {
    value
        .as_u64()
        .and_then(|key| KEY_NOTATION.get(key as usize))
        .map_or(Value::Null, |note| json!(note))
}

/// Rewrites modality to Minor/Major. Anything else passes through unchanged.
fn mode_notation(value: Value) -> Value {
    match value.as_i64() {
        Some(0) => json!("Minor"),
        Some(1) => json!("Major"),
        _ => value,
    }
}
