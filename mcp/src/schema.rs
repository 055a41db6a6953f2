//! Translation of registry-provided parameter descriptors into validated schemas.
//!
//! The registry describes tool parameters with a loosely typed JSON Schema subset.
//! [`translate`] turns that into a small closed [`ValidatedSchema`] tree that can
//! validate payloads and be re-emitted as JSON Schema for the model runtime.
//!
//! Translation is intentionally lossy: `format`, `pattern`, `enum` and numeric
//! bounds are dropped. Anything unrecognized becomes [`ValidatedSchema::Permissive`].

use serde_json::{json, Map, Value};

use crate::error::SchemaViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
}

impl Primitive {
    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Primitive::String),
            "number" => Some(Primitive::Number),
            "integer" => Some(Primitive::Integer),
            "boolean" => Some(Primitive::Boolean),
            _ => None,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::Boolean => "boolean",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Primitive::String => value.is_string(),
            Primitive::Number => value.is_number(),
            Primitive::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
            }
            Primitive::Boolean => value.is_boolean(),
        }
    }
}

/// One named property of an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: ValidatedSchema,
    pub required: bool,
    pub description: Option<String>,
}

/// Object shape. Unknown keys are always accepted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: Vec<Property>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self, name: impl Into<String>, schema: ValidatedSchema) -> Self {
        self.properties.push(Property {
            name: name.into(),
            schema,
            required: true,
            description: None,
        });
        self
    }

    #[must_use]
    pub fn optional(mut self, name: impl Into<String>, schema: ValidatedSchema) -> Self {
        self.properties.push(Property {
            name: name.into(),
            schema,
            required: false,
            description: None,
        });
        self
    }

    /// Attach a description to the most recently added property.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.description = Some(description.into());
        }
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Closed schema tree produced by [`translate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedSchema {
    Primitive(Primitive),
    Sequence(Box<ValidatedSchema>),
    Object(ObjectSchema),
    /// Accepts any value.
    Permissive,
}

impl ValidatedSchema {
    pub fn string() -> Self {
        ValidatedSchema::Primitive(Primitive::String)
    }

    pub fn number() -> Self {
        ValidatedSchema::Primitive(Primitive::Number)
    }

    pub fn integer() -> Self {
        ValidatedSchema::Primitive(Primitive::Integer)
    }

    pub fn boolean() -> Self {
        ValidatedSchema::Primitive(Primitive::Boolean)
    }

    pub fn sequence(items: ValidatedSchema) -> Self {
        ValidatedSchema::Sequence(Box::new(items))
    }

    pub fn is_permissive(&self) -> bool {
        matches!(self, ValidatedSchema::Permissive)
    }

    /// Check `value` against this schema.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        match self {
            ValidatedSchema::Permissive => Ok(()),
            ValidatedSchema::Primitive(p) => {
                if p.accepts(value) {
                    Ok(())
                } else {
                    Err(SchemaViolation::TypeMismatch {
                        path: path.to_string(),
                        expected: p.type_name(),
                    })
                }
            }
            ValidatedSchema::Sequence(items) => {
                let arr = value.as_array().ok_or_else(|| SchemaViolation::TypeMismatch {
                    path: path.to_string(),
                    expected: "array",
                })?;
                for (i, item) in arr.iter().enumerate() {
                    items.validate_at(item, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            ValidatedSchema::Object(obj) => {
                let map = value.as_object().ok_or_else(|| SchemaViolation::TypeMismatch {
                    path: path.to_string(),
                    expected: "object",
                })?;
                for prop in &obj.properties {
                    let child_path = format!("{path}.{}", prop.name);
                    match map.get(&prop.name) {
                        // An explicit null on an optional field counts as absent.
                        Some(Value::Null) if !prop.required => {}
                        Some(v) => prop.schema.validate_at(v, &child_path)?,
                        None if prop.required => {
                            return Err(SchemaViolation::MissingField(child_path));
                        }
                        None => {}
                    }
                }
                Ok(())
            }
        }
    }

    /// Re-emit as a JSON Schema fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            ValidatedSchema::Permissive => json!({}),
            ValidatedSchema::Primitive(p) => json!({ "type": p.type_name() }),
            ValidatedSchema::Sequence(items) => json!({
                "type": "array",
                "items": items.to_json_schema(),
            }),
            ValidatedSchema::Object(obj) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for prop in &obj.properties {
                    let mut schema = prop.schema.to_json_schema();
                    if let (Some(desc), Some(map)) = (&prop.description, schema.as_object_mut()) {
                        map.insert("description".to_string(), Value::String(desc.clone()));
                    }
                    properties.insert(prop.name.clone(), schema);
                    if prop.required {
                        required.push(Value::String(prop.name.clone()));
                    }
                }
                let mut out = json!({
                    "type": "object",
                    "properties": properties,
                    "additionalProperties": true,
                });
                if !required.is_empty() {
                    out["required"] = Value::Array(required);
                }
                out
            }
        }
    }

    /// JSON Schema for a tool's parameter block.
    ///
    /// Function-calling runtimes require an object at the top level, so a
    /// permissive schema is emitted as an open object.
    pub fn to_parameters_schema(&self) -> Value {
        match self {
            ValidatedSchema::Object(_) => self.to_json_schema(),
            _ => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": true,
            }),
        }
    }
}

/// Translate a registry descriptor into a [`ValidatedSchema`]. Never fails.
pub fn translate(descriptor: Option<&Value>) -> ValidatedSchema {
    let Some(obj) = descriptor.and_then(Value::as_object) else {
        return ValidatedSchema::Permissive;
    };
    if obj.get("type").and_then(Value::as_str) != Some("object") {
        return ValidatedSchema::Permissive;
    }
    match obj.get("properties").and_then(Value::as_object) {
        Some(_) => translate_object(obj),
        None => ValidatedSchema::Permissive,
    }
}

fn translate_object(obj: &Map<String, Value>) -> ValidatedSchema {
    let required: Vec<&str> = obj
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| Property {
                    name: name.clone(),
                    schema: translate_property(prop),
                    required: required.contains(&name.as_str()),
                    description: prop
                        .get("description")
                        .and_then(Value::as_str)
                        .map(String::from),
                })
                .collect()
        })
        .unwrap_or_default();

    ValidatedSchema::Object(ObjectSchema { properties })
}

fn translate_property(prop: &Value) -> ValidatedSchema {
    let Some(obj) = prop.as_object() else {
        return ValidatedSchema::Permissive;
    };
    match obj.get("type").and_then(Value::as_str) {
        Some("array") => ValidatedSchema::sequence(
            obj.get("items")
                .map(translate_property)
                .unwrap_or(ValidatedSchema::Permissive),
        ),
        Some("object") => translate_object(obj),
        Some(other) => Primitive::from_type_name(other)
            .map(ValidatedSchema::Primitive)
            .unwrap_or(ValidatedSchema::Permissive),
        None => ValidatedSchema::Permissive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_absent_are_permissive() {
        assert!(translate(None).is_permissive());
        assert!(translate(Some(&json!({}))).is_permissive());

        let schema = translate(Some(&json!({})));
        assert!(schema.validate(&json!({"anything": 1, "else": [true]})).is_ok());
    }

    #[test]
    fn test_required_string_property() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {"q": {"type": "string"}},
            "required": ["q"]
        })));

        assert!(schema.validate(&json!({"q": "rust"})).is_ok());
        assert_eq!(
            schema.validate(&json!({})),
            Err(SchemaViolation::MissingField("$.q".to_string()))
        );
        assert!(matches!(
            schema.validate(&json!({"q": 5})),
            Err(SchemaViolation::TypeMismatch { expected: "string", .. })
        ));
    }

    #[test]
    fn test_optional_properties() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {
                "q": {"type": "string"},
                "limit": {"type": "integer"}
            },
            "required": ["q"]
        })));

        let ValidatedSchema::Object(obj) = &schema else {
            panic!("Expected object schema");
        };
        assert!(obj.property("q").unwrap().required);
        assert!(!obj.property("limit").unwrap().required);
        assert!(schema.validate(&json!({"q": "x"})).is_ok());
        assert!(schema.validate(&json!({"q": "x", "limit": null})).is_ok());
        assert!(schema.validate(&json!({"q": "x", "limit": 2.5})).is_err());
        assert!(schema.validate(&json!({"q": "x", "limit": 2.0})).is_ok());
    }

    #[test]
    fn test_primitive_mapping() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {
                "s": {"type": "string"},
                "n": {"type": "number"},
                "i": {"type": "integer"},
                "b": {"type": "boolean"},
                "weird": {"type": "null"},
                "untyped": {"description": "anything"}
            }
        })));

        let ValidatedSchema::Object(obj) = &schema else {
            panic!("Expected object schema");
        };
        assert_eq!(obj.property("s").unwrap().schema, ValidatedSchema::string());
        assert_eq!(obj.property("n").unwrap().schema, ValidatedSchema::number());
        assert_eq!(obj.property("i").unwrap().schema, ValidatedSchema::integer());
        assert_eq!(obj.property("b").unwrap().schema, ValidatedSchema::boolean());
        assert!(obj.property("weird").unwrap().schema.is_permissive());
        assert!(obj.property("untyped").unwrap().schema.is_permissive());
    }

    #[test]
    fn test_arrays_and_nested_objects() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "anything": {"type": "array"},
                "filter": {
                    "type": "object",
                    "properties": {"site": {"type": "string"}},
                    "required": ["site"]
                }
            }
        })));

        assert!(schema
            .validate(&json!({"tags": ["a", "b"], "anything": [1, "x"], "filter": {"site": "docs.rs"}}))
            .is_ok());
        assert!(schema.validate(&json!({"tags": ["a", 1]})).is_err());
        assert_eq!(
            schema.validate(&json!({"filter": {}})),
            Err(SchemaViolation::MissingField("$.filter.site".to_string()))
        );
    }

    #[test]
    fn test_non_object_top_level_is_permissive() {
        assert!(translate(Some(&json!({"type": "string"}))).is_permissive());
        assert!(translate(Some(&json!([1, 2]))).is_permissive());
        assert!(translate(Some(&json!({"type": "object"}))).is_permissive());
    }

    #[test]
    fn test_constraints_are_dropped() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {
                "mode": {"type": "string", "enum": ["a", "b"], "pattern": "^[ab]$"}
            }
        })));
        assert!(schema.validate(&json!({"mode": "zzz"})).is_ok());
    }

    #[test]
    fn test_json_schema_emission() {
        let schema = translate(Some(&json!({
            "type": "object",
            "properties": {
                "q": {"type": "string", "description": "Search query"},
                "n": {"type": "integer"}
            },
            "required": ["q"]
        })));

        let emitted = schema.to_json_schema();
        assert_eq!(emitted["type"], "object");
        assert_eq!(emitted["properties"]["q"]["description"], "Search query");
        assert_eq!(emitted["properties"]["n"]["type"], "integer");
        assert_eq!(emitted["required"], json!(["q"]));

        let params = ValidatedSchema::Permissive.to_parameters_schema();
        assert_eq!(params["type"], "object");
        assert_eq!(params["additionalProperties"], true);
    }
}
