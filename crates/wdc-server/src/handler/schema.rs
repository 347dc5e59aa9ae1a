//! Schema document handler.

use axum::Json;
use wdc_spotify::schema;

/// Serves the advanced schema document the connector page loads at startup.
pub(super) async fn advanced_schema() -> Json<wdc_core::schema::SchemaDocument> {
    Json(schema::advanced_schema())
}
