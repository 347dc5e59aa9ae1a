//! The row-mapping engine.
//!
//! A [`Mapping`] owns an ordered list of validated column rules plus a
//! registry of named transformation handlers, and flattens arrays of nested
//! JSON records into flat rows keyed by rule id. Rule definitions are
//! validated loudly at registration so misconfiguration surfaces before a
//! gather ever reaches the host.

mod error;
mod lookup;
mod rule;
mod transform;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Value};

pub use self::error::MappingError;
pub use self::lookup::Lookup;
pub use self::rule::{MappingRule, RuleSpec};
pub use self::transform::{Transform, TransformFn};

/// One flattened output row, keyed by rule id in declared rule order.
pub type FlatRow = Map<String, Value>;

static RULE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9_]+$").expect("valid rule id pattern"));

/// Maps nested source records into flat rows following declared rules.
#[derive(Default)]
pub struct Mapping {
    rules: Vec<MappingRule>,
    handlers: HashMap<String, TransformFn>,
}

impl std::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("rules", &self.rules)
            .field("handlers", &self.handlers.keys())
            .finish()
    }
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the ordered rule list. Mutating the copy never
    /// touches the registered rules.
    pub fn rules(&self) -> Vec<MappingRule> {
        self.rules.clone()
    }

    /// Replaces all rules: clears the current list, then adds the given
    /// specs in order, stopping at the first invalid one.
    pub fn set_rules(
        &mut self,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> Result<&mut Self, MappingError> {
        self.rules.clear();
        self.add_rules(specs)
    }

    /// Validates a single rule and appends it, preserving call order.
    pub fn add_rule(&mut self, spec: RuleSpec) -> Result<&mut Self, MappingError> {
        self.prevalidate_rule(&spec)?;
        self.rules.push(MappingRule::from_spec(spec));
        Ok(self)
    }

    /// Adds rules in order, propagating the first failure.
    ///
    /// Partial application is allowed: rules added before the failure stay.
    pub fn add_rules(
        &mut self,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> Result<&mut Self, MappingError> {
        for spec in specs {
            self.add_rule(spec)?;
        }
        Ok(self)
    }

    /// Checks a rule id against the required pattern.
    pub fn is_valid_id(id: &str) -> bool {
        RULE_ID_PATTERN.is_match(id)
    }

    /// Validates a rule spec without storing it. First failure wins.
    pub fn prevalidate_rule(&self, spec: &RuleSpec) -> Result<(), MappingError> {
        let rendered = || spec.to_json_string();

        if !Self::is_valid_id(&spec.id) {
            return Err(MappingError::InvalidId(rendered()));
        }
        if self.rules.iter().any(|rule| rule.id() == spec.id) {
            return Err(MappingError::DuplicateId(rendered()));
        }
        let Some(data_type) = spec.data_type.as_deref() else {
            return Err(MappingError::MissingDataType(rendered()));
        };
        if data_type.parse::<crate::schema::DataType>().is_err() {
            return Err(MappingError::UnsupportedDataType(rendered()));
        }
        if spec.lookup.as_deref().unwrap_or_default().is_empty() {
            return Err(MappingError::MissingLookup(rendered()));
        }

        Ok(())
    }

    /// Registers a named reusable transform function.
    pub fn add_transformation_handler(
        &mut self,
        key: impl Into<String>,
        handler: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Result<&mut Self, MappingError> {
        let key = key.into();

        if key.is_empty() {
            return Err(MappingError::HandlerKeyRequired);
        }
        if self.handlers.contains_key(&key) {
            return Err(MappingError::HandlerExists(key));
        }

        self.handlers.insert(key, Arc::new(handler));
        Ok(self)
    }

    /// Applies a transform to a value.
    ///
    /// `Transform::None` passes the value through, named handlers must have
    /// been registered, inline closures are invoked directly.
    pub fn transform(&self, value: Value, transform: &Transform) -> Result<Value, MappingError> {
        match transform {
            Transform::None => Ok(value),
            Transform::Named(key) => {
                let handler = self
                    .handlers
                    .get(key)
                    .ok_or_else(|| MappingError::UnknownHandler(key.clone()))?;
                Ok(handler(value))
            }
            Transform::Inline(handler) => Ok(handler(value)),
        }
    }

    /// Flattens records into one row per qualifying record.
    ///
    /// Records that are not JSON objects, or are empty objects, are silently
    /// skipped: that is filtering policy, not an error. Output order follows
    /// the relative order of qualifying input records.
    pub fn flatten_data(&self, records: &[Value]) -> Result<Vec<FlatRow>, MappingError> {
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let qualifies = record.as_object().is_some_and(|object| !object.is_empty());
            if !qualifies {
                continue;
            }
            rows.push(self.map_item(record)?);
        }

        Ok(rows)
    }

    fn map_item(&self, record: &Value) -> Result<FlatRow, MappingError> {
        let mut row = FlatRow::new();

        for rule in &self.rules {
            let resolved = rule
                .lookup()
                .resolve(record)
                .cloned()
                .unwrap_or_else(|| rule.default_value().clone());

            let value = self.transform(resolved, rule.transform())?;
            row.insert(rule.id().to_owned(), value);
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn three_user_rules() -> Vec<RuleSpec> {
        vec![
            RuleSpec::new("user_id", "int", "id"),
            RuleSpec::new("user_name", "string", "name"),
            RuleSpec::new("type", "string", "type").with_default(json!("")),
        ]
    }

    #[test]
    fn flattens_one_row_per_qualifying_record() {
        let mut mapping = Mapping::new();
        mapping.add_rules(three_user_rules()).unwrap();

        let records = vec![
            json!({ "id": 100, "name": "Bar", "type": "simple" }),
            json!({ "id": 103, "name": "Baz" }),
        ];

        let rows = mapping.flatten_data(&records).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("user_id"), Some(&json!(100)));
        assert_eq!(rows[0].get("user_name"), Some(&json!("Bar")));
        assert_eq!(rows[0].get("type"), Some(&json!("simple")));
        assert_eq!(rows[1].get("user_id"), Some(&json!(103)));
        assert_eq!(rows[1].get("user_name"), Some(&json!("Baz")));
        assert_eq!(rows[1].get("type"), Some(&json!("")));
    }

    #[test]
    fn skips_non_object_and_empty_records() {
        let mut mapping = Mapping::new();
        mapping.add_rules(three_user_rules()).unwrap();

        let records = vec![
            json!(null),
            json!({}),
            json!([1, 2]),
            json!("scalar"),
            json!({ "id": 1, "name": "only" }),
        ];

        let rows = mapping.flatten_data(&records).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("user_id"), Some(&json!(1)));
    }

    #[test]
    fn unresolvable_lookup_without_default_is_null() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(RuleSpec::new("missing", "string", "not.there"))
            .unwrap();

        let rows = mapping.flatten_data(&[json!({ "id": 1 })]).unwrap();
        assert_eq!(rows[0].get("missing"), Some(&Value::Null));
    }

    #[test]
    fn unresolvable_lookup_with_default_uses_default() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(RuleSpec::new("missing", "int", "not.there").with_default(json!(0)))
            .unwrap();

        let rows = mapping.flatten_data(&[json!({ "id": 1 })]).unwrap();
        assert_eq!(rows[0].get("missing"), Some(&json!(0)));
    }

    #[test]
    fn rows_keep_declared_column_order() {
        let mut mapping = Mapping::new();
        mapping.add_rules(three_user_rules()).unwrap();

        let rows = mapping
            .flatten_data(&[json!({ "id": 7, "name": "Foo" })])
            .unwrap();

        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["user_id", "user_name", "type"]);
    }

    #[test]
    fn duplicate_id_is_rejected_before_storage() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(RuleSpec::new("user_id", "int", "id"))
            .unwrap();

        let err = mapping
            .add_rule(RuleSpec::new("user_id", "string", "name"))
            .unwrap_err();

        assert!(err.to_string().contains("id MUST be unique"));
        assert_eq!(mapping.rules().len(), 1);
    }

    #[test]
    fn unsupported_data_type_is_rejected() {
        let mapping = Mapping::new();
        let err = mapping
            .prevalidate_rule(&RuleSpec::new("user_id", "class", "id"))
            .unwrap_err();

        assert!(err.to_string().contains("dataType unsupported"));
    }

    #[test]
    fn valid_rule_prevalidates() {
        let mapping = Mapping::new();
        let spec = RuleSpec::new("user_id", "int", "id");
        assert!(mapping.prevalidate_rule(&spec).is_ok());
    }

    #[test]
    fn missing_data_type_and_lookup_are_rejected_in_order() {
        let mapping = Mapping::new();

        let spec = RuleSpec {
            id: "user_id".to_owned(),
            ..RuleSpec::default()
        };
        let err = mapping.prevalidate_rule(&spec).unwrap_err();
        assert!(err.to_string().contains("dataType mandatory property missing"));

        let spec = RuleSpec {
            id: "user_id".to_owned(),
            data_type: Some("int".to_owned()),
            ..RuleSpec::default()
        };
        let err = mapping.prevalidate_rule(&spec).unwrap_err();
        assert!(err.to_string().contains("lookup mandatory property missing"));
    }

    #[test]
    fn invalid_id_is_rejected() {
        let mapping = Mapping::new();

        for id in ["", "1abc", "a", "has space", "Ümlaut"] {
            let err = mapping
                .prevalidate_rule(&RuleSpec::new(id, "string", "x"))
                .unwrap_err();
            assert!(err.to_string().contains("Invalid id"), "id {id:?}");
        }

        // Uppercase is fine, the pattern is case-insensitive.
        assert!(
            mapping
                .prevalidate_rule(&RuleSpec::new("UserId", "string", "x"))
                .is_ok()
        );
    }

    #[test]
    fn non_object_rule_value_is_rejected() {
        let err = RuleSpec::from_value(&json!("not a rule")).unwrap_err();
        assert!(err.to_string().contains("MUST be literal objects"));

        let spec = RuleSpec::from_value(&json!({
            "id": "user_id",
            "dataType": "int",
            "lookup": "id"
        }))
        .unwrap();
        assert!(Mapping::new().prevalidate_rule(&spec).is_ok());
    }

    #[test]
    fn add_rules_stops_at_first_failure_keeping_earlier_rules() {
        let mut mapping = Mapping::new();
        let result = mapping.add_rules(vec![
            RuleSpec::new("first", "string", "a"),
            RuleSpec::new("bad id!", "string", "b"),
            RuleSpec::new("third", "string", "c"),
        ]);

        assert!(result.is_err());
        let ids: Vec<String> = mapping
            .rules()
            .iter()
            .map(|rule| rule.id().to_owned())
            .collect();
        assert_eq!(ids, vec!["first"]);
    }

    #[test]
    fn set_rules_clears_existing_rules() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(RuleSpec::new("old_rule", "string", "x"))
            .unwrap();

        mapping
            .set_rules(vec![RuleSpec::new("new_rule", "string", "y")])
            .unwrap();

        let ids: Vec<String> = mapping
            .rules()
            .iter()
            .map(|rule| rule.id().to_owned())
            .collect();
        assert_eq!(ids, vec!["new_rule"]);
    }

    #[test]
    fn rules_returns_a_detached_copy() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(RuleSpec::new("user_id", "int", "id"))
            .unwrap();

        let mut copy = mapping.rules();
        copy.clear();
        assert_eq!(mapping.rules().len(), 1);
    }

    #[test]
    fn transform_none_passes_value_through() {
        let mapping = Mapping::new();
        let value = mapping.transform(json!(5), &Transform::None).unwrap();
        assert_eq!(value, json!(5));
    }

    #[test]
    fn transform_unregistered_name_fails() {
        let mapping = Mapping::new();
        let err = mapping
            .transform(json!(5), &Transform::named("nope"))
            .unwrap_err();
        assert!(err.to_string().contains("not a defined Mapping"));
    }

    #[test]
    fn transform_inline_invokes_function() {
        let mapping = Mapping::new();
        let double = Transform::inline(|value| json!(value.as_i64().unwrap_or(0) * 2));
        assert_eq!(mapping.transform(json!(21), &double).unwrap(), json!(42));
    }

    #[test]
    fn named_handlers_are_registered_once() {
        let mut mapping = Mapping::new();
        mapping
            .add_transformation_handler("upper", |value| {
                json!(value.as_str().unwrap_or_default().to_uppercase())
            })
            .unwrap();

        let err = mapping
            .add_transformation_handler("upper", |value| value)
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let err = mapping
            .add_transformation_handler("", |value| value)
            .unwrap_err();
        assert!(err.to_string().contains("key param is required"));

        let value = mapping
            .transform(json!("abba"), &Transform::named("upper"))
            .unwrap();
        assert_eq!(value, json!("ABBA"));
    }

    #[test]
    fn named_handler_applies_during_flatten() {
        let mut mapping = Mapping::new();
        mapping
            .add_transformation_handler("shout", |value| {
                json!(value.as_str().unwrap_or_default().to_uppercase())
            })
            .unwrap();
        mapping
            .add_rule(
                RuleSpec::new("name", "string", "name")
                    .with_transform(Transform::named("shout")),
            )
            .unwrap();

        let rows = mapping.flatten_data(&[json!({ "name": "quiet" })]).unwrap();
        assert_eq!(rows[0].get("name"), Some(&json!("QUIET")));
    }

    #[test]
    fn unknown_named_handler_fails_at_flatten_time() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(
                RuleSpec::new("name", "string", "name")
                    .with_transform(Transform::named("missing")),
            )
            .unwrap();

        let err = mapping
            .flatten_data(&[json!({ "name": "x" })])
            .unwrap_err();
        assert!(matches!(err, MappingError::UnknownHandler(_)));
    }

    #[test]
    fn identity_lookup_maps_whole_record() {
        let mut mapping = Mapping::new();
        mapping
            .add_rule(
                RuleSpec::new("raw", "string", ".")
                    .with_transform(Transform::inline(|value| json!(value.to_string()))),
            )
            .unwrap();

        let rows = mapping.flatten_data(&[json!({ "id": 1 })]).unwrap();
        assert_eq!(rows[0].get("raw"), Some(&json!("{\"id\":1}")));
    }

    #[test]
    fn error_message_carries_rule_json() {
        let mapping = Mapping::new();
        let err = mapping
            .prevalidate_rule(
                &RuleSpec::new("user_id", "class", "id")
                    .with_transform(Transform::inline(|value| value)),
            )
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("\"id\":\"user_id\""));
        assert!(message.contains("\"dataType\":\"class\""));
        assert!(message.contains("[inline transform]"));
    }
}
