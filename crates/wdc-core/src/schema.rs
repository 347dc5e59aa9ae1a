//! Typed model of the table schema handed to the host.
//!
//! The wire shape (field names, enum values) is fixed by the host API, so
//! everything here serializes to the exact camelCase document the host
//! expects.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Supported column data types. This set is fixed by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    Bool,
    Date,
    Datetime,
    Float,
    Geometry,
    Int,
    String,
}

/// Default aggregation types for numeric columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggType {
    Avg,
    Count,
    CountDist,
    Median,
    Sum,
}

/// Default number formatting for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    Currency,
    Number,
    Percentage,
    Scientific,
}

/// The `defaultFormat` block of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultFormat {
    pub number_format: NumberFormat,
}

/// Metadata about one output column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agg_type: Option<AggType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<DefaultFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
}

impl ColumnInfo {
    /// Creates a column with just an id and a data type.
    pub fn new(id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            alias: None,
            data_type,
            agg_type: None,
            default_format: None,
            filterable: None,
        }
    }

    /// Sets the user-friendly alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the default aggregation type.
    pub fn with_agg_type(mut self, agg_type: AggType) -> Self {
        self.agg_type = Some(agg_type);
        self
    }

    /// Sets the default number format.
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.default_format = Some(DefaultFormat { number_format });
        self
    }

    /// Marks the column as usable for join filtering.
    pub fn filterable(mut self) -> Self {
        self.filterable = Some(true);
        self
    }
}

/// Foreign-key reference used by join-only tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub table_id: String,
    pub column_id: String,
}

/// Metadata about one table of data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
}

impl TableInfo {
    /// Creates a table with an id, alias and columns.
    pub fn new(
        id: impl Into<String>,
        alias: impl Into<String>,
        columns: Vec<ColumnInfo>,
    ) -> Self {
        Self {
            id: id.into(),
            alias: Some(alias.into()),
            description: None,
            columns,
            join_only: None,
            foreign_key: None,
        }
    }

    /// Sets the user-friendly description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restricts the table to join-filtered selection through a foreign key.
    pub fn join_only_on(mut self, table_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        self.join_only = Some(true);
        self.foreign_key = Some(ForeignKey {
            table_id: table_id.into(),
            column_id: column_id.into(),
        });
        self
    }
}

/// Join types supported by standard connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
}

/// One side of a predefined join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinClause {
    pub table_alias: String,
    pub column_id: String,
}

/// A predefined join between two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub left: JoinClause,
    pub right: JoinClause,
    pub join_type: JoinType,
}

impl Join {
    /// Creates an inner join between two table aliases.
    pub fn inner(
        left_alias: impl Into<String>,
        left_column: impl Into<String>,
        right_alias: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            left: JoinClause {
                table_alias: left_alias.into(),
                column_id: left_column.into(),
            },
            right: JoinClause {
                table_alias: right_alias.into(),
                column_id: right_column.into(),
            },
            join_type: JoinType::Inner,
        }
    }
}

/// A table participating in a standard connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTable {
    pub id: String,
    pub alias: String,
}

impl ConnectionTable {
    pub fn new(id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias: alias.into(),
        }
    }
}

/// A predefined multi-table join shown to the user as one connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardConnection {
    pub alias: String,
    pub tables: Vec<ConnectionTable>,
    pub joins: Vec<Join>,
}

/// The complete schema document: tables plus predefined joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    pub tables: Vec<TableInfo>,
    pub standard_connections: Vec<StandardConnection>,
}

impl SchemaDocument {
    /// An empty document, returned when no connection data is available.
    pub fn empty() -> Self {
        Self {
            tables: Vec::new(),
            standard_connections: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn data_type_parses_lowercase_names() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Int);
        assert_eq!("datetime".parse::<DataType>().unwrap(), DataType::Datetime);
        assert!("class".parse::<DataType>().is_err());
    }

    #[test]
    fn column_serializes_camel_case() {
        let column = ColumnInfo::new("danceability", DataType::Float)
            .with_alias("Danceability")
            .with_agg_type(AggType::Avg)
            .with_number_format(NumberFormat::Percentage);

        let value = serde_json::to_value(&column).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "danceability",
                "alias": "Danceability",
                "dataType": "float",
                "aggType": "avg",
                "defaultFormat": { "numberFormat": "percentage" }
            })
        );
    }

    #[test]
    fn join_only_table_serializes_foreign_key() {
        let table = TableInfo::new(
            "tracksFeatures",
            "Tracks Features",
            vec![ColumnInfo::new("id", DataType::String).filterable()],
        )
        .join_only_on("tracks", "id");

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["joinOnly"], json!(true));
        assert_eq!(
            value["foreignKey"],
            json!({ "tableId": "tracks", "columnId": "id" })
        );
        assert_eq!(value["columns"][0]["filterable"], json!(true));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let column = ColumnInfo::new("id", DataType::String);
        let value = serde_json::to_value(&column).unwrap();
        assert_eq!(value, json!({ "id": "id", "dataType": "string" }));
    }

    #[test]
    fn table_info_round_trips() {
        let table = TableInfo::new(
            "topArtists",
            "Top Artists",
            vec![ColumnInfo::new("followers", DataType::Int)],
        );

        let encoded = serde_json::to_string(&table).unwrap();
        let decoded: TableInfo = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, "topArtists");
        assert_eq!(decoded.columns[0].data_type, DataType::Int);
    }
}
