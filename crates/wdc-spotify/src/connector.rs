//! Table routing between the host and the data views.

use std::sync::Arc;

use wdc_core::ConnectorError;
use wdc_core::host::{ConnectorHost, RowSink};
use wdc_core::schema::{ColumnInfo, SchemaDocument};

use crate::api::CatalogApi;
use crate::error::{Error, Result};
use crate::filters::Filters;
use crate::schema::advanced_schema;
use crate::terms;
use crate::views::{Albums, Artists, TopArtists, TopTracks, Tracks, TracksFeatures};

/// Tracing target for connector operations.
pub const TRACING_TARGET: &str = "wdc_spotify::connector";

/// One table's worth of work, as handed over by the host.
#[derive(Debug, Clone)]
pub struct TableRequest {
    /// Id of the requested table, as declared in the schema document.
    pub table_id: String,
    /// The stored column metadata for the table.
    pub columns: Vec<ColumnInfo>,
    /// Join filter values, present only for join-only tables.
    pub filter_values: Vec<String>,
}

/// Routes schema and data requests to the right data view.
///
/// Failures are logged in full through the host and aborted with a message
/// safe to show the user; raw error detail never crosses that boundary.
pub struct Connector {
    api: Option<Arc<dyn CatalogApi>>,
    host: Arc<dyn ConnectorHost>,
    filters: Filters,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl Connector {
    pub fn new(api: Arc<dyn CatalogApi>, host: Arc<dyn ConnectorHost>, filters: Filters) -> Self {
        Self {
            api: Some(api),
            host,
            filters,
        }
    }

    /// A connector with no authenticated catalog behind it.
    ///
    /// This is the state right after a connection is restored without stored
    /// tokens: schema requests still work, but a data gather aborts asking
    /// the host to re-run authentication.
    pub fn without_auth(host: Arc<dyn ConnectorHost>, filters: Filters) -> Self {
        Self {
            api: None,
            host,
            filters,
        }
    }

    /// The schema document for this connection.
    ///
    /// Without connection data there is nothing to offer: this happens right
    /// after the auth phase, and the empty document tells the host so.
    pub fn get_schema(&self, has_connection_data: bool) -> SchemaDocument {
        if !has_connection_data {
            return SchemaDocument::empty();
        }
        advanced_schema()
    }

    /// Gathers one table and streams its rows into the sink.
    ///
    /// On failure the full error block goes to the host log and the gather
    /// is aborted with the user-safe message.
    pub async fn get_data(&self, request: TableRequest, sink: &mut dyn RowSink) -> Result<()> {
        tracing::info!(
            target: TRACING_TARGET,
            table_id = %request.table_id,
            filter_values = request.filter_values.len(),
            "Gathering table"
        );

        let Some(api) = self.api.clone() else {
            tracing::warn!(target: TRACING_TARGET, "Data gather without stored tokens");
            self.host.abort_for_auth(terms::MISSING_AUTH);
            return Err(Error::MissingAuth);
        };

        match self.gather(api.as_ref(), request, sink).await {
            Ok(()) => {
                // Completion is signalled exactly once, only after the whole
                // table made it into the sink.
                self.host.submit();
                Ok(())
            }
            Err(err) => {
                let tagged = ConnectorError::new(err.to_string()).tag("Connector.data ->", None);

                self.host.log(&tagged.stringify());
                self.host.abort_with_error(err.user_message());

                Err(err)
            }
        }
    }

    async fn gather(
        &self,
        api: &dyn CatalogApi,
        request: TableRequest,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let TableRequest {
            table_id,
            columns,
            filter_values,
        } = request;

        let host = self.host.as_ref();
        let filters = self.filters.clone();

        match table_id.as_str() {
            "topArtists" => {
                let mut view = TopArtists::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink).await
            }
            "topTracks" => {
                let mut view = TopTracks::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink).await
            }
            "albums" => {
                let mut view = Albums::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink).await
            }
            "tracks" => {
                let mut view = Tracks::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink).await
            }
            "tracksFeatures" => {
                let mut view = TracksFeatures::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink, filter_values).await
            }
            // Both artist projections resolve through the same view; only
            // the parent table providing the filter values differs.
            "tracksArtists" | "albumsArtists" => {
                let mut view = Artists::new(filters);
                view.define_mapping_rules(&columns)?;
                view.get_flattened_data(api, host, sink, filter_values).await
            }
            _ => Err(Error::UnknownTable(table_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wdc_core::mock::{RecordingHost, RecordingSink};

    use super::*;
    use crate::api::Page;
    use crate::mock::MockCatalog;
    use crate::status::intercept_status;
    use crate::terms;

    fn connector(catalog: MockCatalog) -> (Connector, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let connector = Connector::new(Arc::new(catalog), host.clone(), Filters::default());
        (connector, host)
    }

    fn table_columns(table_id: &str) -> Vec<ColumnInfo> {
        advanced_schema()
            .tables
            .into_iter()
            .find(|table| table.id == table_id)
            .map(|table| table.columns)
            .unwrap_or_default()
    }

    #[test]
    fn schema_is_empty_without_connection_data() {
        let (connector, _) = connector(MockCatalog::new());

        let schema = connector.get_schema(false);
        assert!(schema.tables.is_empty());
        assert!(schema.standard_connections.is_empty());

        let schema = connector.get_schema(true);
        assert_eq!(schema.tables.len(), 7);
    }

    #[tokio::test]
    async fn routes_top_artists_to_its_view() {
        let catalog = MockCatalog::new().with_page(Page {
            items: vec![json!({ "id": "a1", "name": "A", "followers": { "total": 3 } })],
            next: None,
            offset: 0,
            limit: 50,
            total: 1,
        });
        let (connector, host) = connector(catalog);
        let mut sink = RecordingSink::new();

        let request = TableRequest {
            table_id: "topArtists".to_owned(),
            columns: table_columns("topArtists"),
            filter_values: Vec::new(),
        };

        connector.get_data(request, &mut sink).await.unwrap();

        let rows = sink.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("followers"), Some(&json!(3)));
        assert_eq!(rows[0].get("name"), Some(&json!("A")));

        // One gather, one completion signal.
        assert_eq!(*host.submits.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn artist_projections_share_one_view() {
        for table_id in ["tracksArtists", "albumsArtists"] {
            let catalog = MockCatalog::new().with_batch(vec![json!({ "id": "a1", "name": "A" })]);
            let (connector, _host) = connector(catalog);
            let mut sink = RecordingSink::new();

            let request = TableRequest {
                table_id: table_id.to_owned(),
                columns: table_columns(table_id),
                filter_values: vec!["a1".to_owned()],
            };

            connector.get_data(request, &mut sink).await.unwrap();
            assert_eq!(sink.rows().len(), 1, "table {table_id}");
        }
    }

    #[tokio::test]
    async fn unknown_table_logs_and_aborts_generically() {
        let (connector, host) = connector(MockCatalog::new());
        let mut sink = RecordingSink::new();

        let request = TableRequest {
            table_id: "nope".to_owned(),
            columns: Vec::new(),
            filter_values: Vec::new(),
        };

        let result = connector.get_data(request, &mut sink).await;
        assert!(matches!(result, Err(Error::UnknownTable(_))));

        let logs = host.logs.lock().unwrap();
        assert!(logs[0].contains("Name: Connector.data ->"));
        assert!(logs[0].contains("nope not found on data view classes"));

        let aborts = host.aborts.lock().unwrap();
        assert_eq!(aborts[0], terms::DEFAULT_ERROR);

        // Aborted gathers never signal completion.
        assert_eq!(*host.submits.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn gather_without_auth_aborts_for_authentication() {
        let host = Arc::new(RecordingHost::new());
        let connector = Connector::without_auth(host.clone(), Filters::default());
        let mut sink = RecordingSink::new();

        let request = TableRequest {
            table_id: "topArtists".to_owned(),
            columns: table_columns("topArtists"),
            filter_values: Vec::new(),
        };

        let result = connector.get_data(request, &mut sink).await;
        assert!(matches!(result, Err(Error::MissingAuth)));

        let auth_aborts = host.auth_aborts.lock().unwrap();
        assert_eq!(auth_aborts[0], terms::MISSING_AUTH);

        // The auth abort replaces the generic error path entirely.
        assert!(host.aborts.lock().unwrap().is_empty());
        assert_eq!(*host.submits.lock().unwrap(), 0);
        assert!(sink.batches.is_empty());

        // The schema phase still answers without authentication.
        assert_eq!(connector.get_schema(true).tables.len(), 7);
    }

    #[tokio::test]
    async fn api_failure_aborts_with_curated_message() {
        let catalog =
            MockCatalog::new().failing_with(intercept_status(401, "SpotifyClient", "expired"));
        let (connector, host) = connector(catalog);
        let mut sink = RecordingSink::new();

        let request = TableRequest {
            table_id: "topTracks".to_owned(),
            columns: table_columns("topTracks"),
            filter_values: Vec::new(),
        };

        let result = connector.get_data(request, &mut sink).await;
        assert!(result.is_err());

        let aborts = host.aborts.lock().unwrap();
        assert!(aborts[0].contains("Unauthorized"));
    }
}
