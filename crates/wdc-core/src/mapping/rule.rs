//! Rule definitions: the loosely-typed spec as declared, and the validated
//! form the flattener runs.

use serde_json::{Map, Value, json};

use super::error::MappingError;
use super::lookup::Lookup;
use super::transform::Transform;
use crate::schema::DataType;

/// A column-mapping rule as declared, before validation.
///
/// Specs usually come from schema columns with a lookup path attached by a
/// data view, but can also be built from raw JSON via [`RuleSpec::from_value`].
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    /// Output column id. Must match `^[a-z][a-z0-9_]+$` (case-insensitive).
    pub id: String,
    /// Dot/bracket path into the source record, or `"."` for the whole record.
    pub lookup: Option<String>,
    /// Declared data type name, validated against [`DataType`].
    pub data_type: Option<String>,
    /// Substituted when the lookup resolves to nothing. Defaults to `null`.
    pub default_value: Option<Value>,
    /// Optional transform applied after resolution.
    pub transform: Transform,
}

impl RuleSpec {
    /// Creates a spec with the three mandatory fields.
    pub fn new(
        id: impl Into<String>,
        data_type: impl Into<String>,
        lookup: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lookup: Some(lookup.into()),
            data_type: Some(data_type.into()),
            default_value: None,
            transform: Transform::None,
        }
    }

    /// Sets the default value substituted for unresolvable lookups.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Attaches a transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builds a spec from a raw JSON value.
    ///
    /// Anything other than a JSON object is rejected, which is the first
    /// validation step for rules arriving from untyped sources.
    pub fn from_value(value: &Value) -> Result<Self, MappingError> {
        let Some(object) = value.as_object() else {
            return Err(MappingError::NotAnObject(value.to_string()));
        };

        let string_field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Ok(Self {
            id: string_field("id").unwrap_or_default(),
            lookup: string_field("lookup"),
            data_type: string_field("dataType"),
            default_value: object.get("defaultValue").cloned(),
            transform: match string_field("transform") {
                Some(key) => Transform::Named(key),
                None => Transform::None,
            },
        })
    }

    /// JSON rendering of the spec, used in validation error messages.
    /// Inline transforms are rendered as a textual marker.
    pub fn to_json_string(&self) -> String {
        let mut object = Map::new();
        object.insert("id".to_owned(), json!(self.id));
        if let Some(lookup) = &self.lookup {
            object.insert("lookup".to_owned(), json!(lookup));
        }
        if let Some(data_type) = &self.data_type {
            object.insert("dataType".to_owned(), json!(data_type));
        }
        if let Some(default_value) = &self.default_value {
            object.insert("defaultValue".to_owned(), default_value.clone());
        }
        if let Some(transform) = self.transform.describe() {
            object.insert("transform".to_owned(), json!(transform));
        }
        Value::Object(object).to_string()
    }
}

/// A validated rule, ready to drive flattening.
#[derive(Debug, Clone)]
pub struct MappingRule {
    id: String,
    lookup: Lookup,
    data_type: DataType,
    default_value: Value,
    transform: Transform,
}

impl MappingRule {
    pub(super) fn from_spec(spec: RuleSpec) -> Self {
        let data_type = spec
            .data_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .unwrap_or(DataType::String);

        Self {
            id: spec.id,
            lookup: Lookup::parse(spec.lookup.as_deref().unwrap_or_default()),
            data_type,
            default_value: spec.default_value.unwrap_or(Value::Null),
            transform: spec.transform,
        }
    }

    /// The output column id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parsed lookup path.
    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    /// The declared column data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The value substituted for unresolvable lookups.
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// The transform attached to this rule.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}
