//! The advanced schema document advertised to the host.
//!
//! Seven tables plus two predefined joins. The three artist-flavored tables
//! share the same columns but are declared separately: `tracksArtists` and
//! `albumsArtists` are join-only projections filtered through their parent
//! table's `artist_id`.

use wdc_core::schema::{
    AggType, ColumnInfo, ConnectionTable, DataType, Join, NumberFormat, SchemaDocument,
    StandardConnection, TableInfo,
};

/// Builds the full schema document.
pub fn advanced_schema() -> SchemaDocument {
    SchemaDocument {
        tables: vec![
            top_artists(),
            top_tracks(),
            albums(),
            tracks(),
            tracks_features(),
            tracks_artists(),
            albums_artists(),
        ],
        standard_connections: vec![artists_and_tracks(), artists_and_albums()],
    }
}

fn artist_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("id", DataType::String).filterable(),
        ColumnInfo::new("followers", DataType::Int),
        ColumnInfo::new("genre1", DataType::String),
        ColumnInfo::new("genre2", DataType::String),
        ColumnInfo::new("href", DataType::String),
        ColumnInfo::new("image_link", DataType::String),
        ColumnInfo::new("name", DataType::String),
        ColumnInfo::new("popularity", DataType::String),
        ColumnInfo::new("uri", DataType::String),
    ]
}

fn top_artists() -> TableInfo {
    TableInfo::new(
        "topArtists",
        "Top Artists",
        vec![
            ColumnInfo::new("followers", DataType::Int).with_alias("Followers"),
            ColumnInfo::new("genre1", DataType::String),
            ColumnInfo::new("genre2", DataType::String),
            ColumnInfo::new("href", DataType::String),
            ColumnInfo::new("id", DataType::String),
            ColumnInfo::new("image_link", DataType::String),
            ColumnInfo::new("name", DataType::String),
            ColumnInfo::new("popularity", DataType::String),
            ColumnInfo::new("uri", DataType::String),
        ],
    )
}

fn top_tracks() -> TableInfo {
    TableInfo::new(
        "topTracks",
        "Top Tracks",
        vec![
            ColumnInfo::new("id", DataType::String),
            ColumnInfo::new("album_id", DataType::String),
            ColumnInfo::new("artist_id", DataType::String),
            ColumnInfo::new("artist_name", DataType::String),
            ColumnInfo::new("duration_ms", DataType::Int),
            ColumnInfo::new("explicit", DataType::Bool),
            ColumnInfo::new("href", DataType::String),
            ColumnInfo::new("name", DataType::String),
            ColumnInfo::new("preview_url", DataType::String),
            ColumnInfo::new("track_number", DataType::Int),
            ColumnInfo::new("uri", DataType::String),
        ],
    )
}

fn albums() -> TableInfo {
    TableInfo::new(
        "albums",
        "Albums",
        vec![
            ColumnInfo::new("id", DataType::String),
            ColumnInfo::new("added_at", DataType::Datetime),
            ColumnInfo::new("artist_id", DataType::String),
            ColumnInfo::new("genre1", DataType::String),
            ColumnInfo::new("genre2", DataType::String),
            ColumnInfo::new("href", DataType::String),
            ColumnInfo::new("image_link", DataType::String),
            ColumnInfo::new("name", DataType::String),
            // The API reports album popularity as a string-ish 0..100 value.
            ColumnInfo::new("popularity", DataType::String),
            ColumnInfo::new("release_date", DataType::Date),
            ColumnInfo::new("type", DataType::String),
            ColumnInfo::new("uri", DataType::String),
        ],
    )
}

fn tracks() -> TableInfo {
    TableInfo::new(
        "tracks",
        "Tracks",
        vec![
            ColumnInfo::new("id", DataType::String).with_alias("Track Id"),
            ColumnInfo::new("added_at", DataType::Datetime).with_alias("Added At Time"),
            ColumnInfo::new("album_id", DataType::String).with_alias("Album Id"),
            ColumnInfo::new("artist_id", DataType::String).with_alias("Artist Id"),
            ColumnInfo::new("artist_name", DataType::String).with_alias("Artist Name"),
            ColumnInfo::new("duration_ms", DataType::Int).with_alias("Song Duration (ms)"),
            ColumnInfo::new("explicit", DataType::Bool).with_alias("Is Explicit"),
            ColumnInfo::new("href", DataType::String).with_alias("Link to Track"),
            ColumnInfo::new("name", DataType::String).with_alias("Name"),
            ColumnInfo::new("preview_url", DataType::String).with_alias("Track Preview Url"),
            ColumnInfo::new("track_number", DataType::Int).with_alias("Track Number"),
            ColumnInfo::new("uri", DataType::String).with_alias("Launch Spotify Link"),
        ],
    )
}

fn percentage_feature(id: &str, alias: &str) -> ColumnInfo {
    ColumnInfo::new(id, DataType::Float)
        .with_alias(alias)
        .with_agg_type(AggType::Avg)
        .with_number_format(NumberFormat::Percentage)
}

fn tracks_features() -> TableInfo {
    TableInfo::new(
        "tracksFeatures",
        "Tracks Features",
        vec![
            ColumnInfo::new("id", DataType::String)
                .with_alias("Track Id")
                .filterable(),
            percentage_feature("danceability", "Danceability"),
            percentage_feature("energy", "Energy"),
            ColumnInfo::new("key", DataType::String).with_alias("Key"),
            ColumnInfo::new("loudness", DataType::Float).with_alias("Loudness (dB)"),
            ColumnInfo::new("mode", DataType::String).with_alias("Mode (Major or Minor)"),
            percentage_feature("speechiness", "Speechiness"),
            percentage_feature("acousticness", "Acousticness"),
            percentage_feature("instrumentalness", "Instrumentalness"),
            percentage_feature("liveness", "Liveness"),
            percentage_feature("valence", "Valence (Musical Positiveness)"),
            ColumnInfo::new("tempo", DataType::Float)
                .with_alias("Tempo (Beats per Minute)")
                .with_agg_type(AggType::Avg),
            ColumnInfo::new("time_signature", DataType::String).with_alias("Time Signature"),
        ],
    )
    .with_description("This table can only be joined with Tracks table")
    .join_only_on("tracks", "id")
}

fn tracks_artists() -> TableInfo {
    TableInfo::new("tracksArtists", "Tracks Artists", artist_columns())
        .with_description("This table can only be joined with Tracks table")
        .join_only_on("tracks", "artist_id")
}

fn albums_artists() -> TableInfo {
    TableInfo::new("albumsArtists", "Albums Artists", artist_columns())
        .with_description("This table can only be joined with Albums table")
        .join_only_on("albums", "artist_id")
}

fn artists_and_tracks() -> StandardConnection {
    StandardConnection {
        alias: "Artists and Tracks".to_owned(),
        tables: vec![
            ConnectionTable::new("tracks", "Tracks"),
            ConnectionTable::new("tracksFeatures", "Features"),
            ConnectionTable::new("tracksArtists", "Artists"),
        ],
        joins: vec![
            Join::inner("Tracks", "artist_id", "Artists", "id"),
            Join::inner("Tracks", "id", "Features", "id"),
        ],
    }
}

fn artists_and_albums() -> StandardConnection {
    StandardConnection {
        alias: "Artists and Albums".to_owned(),
        tables: vec![
            ConnectionTable::new("albums", "Albums"),
            ConnectionTable::new("albumsArtists", "Artists"),
        ],
        joins: vec![Join::inner("Albums", "artist_id", "Artists", "id")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_has_all_tables_and_connections() {
        let schema = advanced_schema();

        let ids: Vec<&str> = schema.tables.iter().map(|table| table.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "topArtists",
                "topTracks",
                "albums",
                "tracks",
                "tracksFeatures",
                "tracksArtists",
                "albumsArtists"
            ]
        );

        let aliases: Vec<&str> = schema
            .standard_connections
            .iter()
            .map(|connection| connection.alias.as_str())
            .collect();
        assert_eq!(aliases, vec!["Artists and Tracks", "Artists and Albums"]);
    }

    #[test]
    fn join_only_tables_declare_foreign_keys() {
        let schema = advanced_schema();

        for (id, parent, column) in [
            ("tracksFeatures", "tracks", "id"),
            ("tracksArtists", "tracks", "artist_id"),
            ("albumsArtists", "albums", "artist_id"),
        ] {
            let table = schema
                .tables
                .iter()
                .find(|table| table.id == id)
                .unwrap_or_else(|| panic!("table {id}"));

            assert_eq!(table.join_only, Some(true), "table {id}");
            let foreign_key = table.foreign_key.as_ref().unwrap();
            assert_eq!(foreign_key.table_id, parent);
            assert_eq!(foreign_key.column_id, column);
            assert_eq!(table.columns[0].filterable, Some(true), "table {id}");
        }
    }

    #[test]
    fn release_date_is_a_date_column() {
        let schema = advanced_schema();
        let albums = schema.tables.iter().find(|table| table.id == "albums").unwrap();
        let release_date = albums
            .columns
            .iter()
            .find(|column| column.id == "release_date")
            .unwrap();
        assert_eq!(release_date.data_type, DataType::Date);
    }

    #[test]
    fn every_rule_driven_column_resolves_against_its_view() {
        // Each selectable table's columns must all receive a lookup path from
        // the corresponding view, otherwise rule registration fails at run
        // time with a missing-lookup error.
        use crate::Filters;
        use crate::views::{Albums, Artists, TopArtists, TopTracks, Tracks, TracksFeatures};

        let schema = advanced_schema();
        let columns = |id: &str| {
            schema
                .tables
                .iter()
                .find(|table| table.id == id)
                .map(|table| table.columns.clone())
                .unwrap()
        };

        assert!(
            TopArtists::new(Filters::default())
                .define_mapping_rules(&columns("topArtists"))
                .is_ok()
        );
        assert!(
            TopTracks::new(Filters::default())
                .define_mapping_rules(&columns("topTracks"))
                .is_ok()
        );
        assert!(
            Albums::new(Filters::default())
                .define_mapping_rules(&columns("albums"))
                .is_ok()
        );
        assert!(
            Tracks::new(Filters::default())
                .define_mapping_rules(&columns("tracks"))
                .is_ok()
        );
        assert!(
            TracksFeatures::new(Filters::default())
                .define_mapping_rules(&columns("tracksFeatures"))
                .is_ok()
        );
        assert!(
            Artists::new(Filters::default())
                .define_mapping_rules(&columns("tracksArtists"))
                .is_ok()
        );
        assert!(
            Artists::new(Filters::default())
                .define_mapping_rules(&columns("albumsArtists"))
                .is_ok()
        );
    }
}
