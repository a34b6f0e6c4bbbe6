//! Typed input schemas for tools.
//!
//! An [`ObjectSchema`] is both the JSON Schema advertised in `tools/list`
//! and the predicate that validates `tools/call` arguments. Each
//! [`FieldKind`] carries its declared JSON form and its check together, so
//! the two views cannot drift apart.

use rmcp::model::JsonObject;
use serde_json::{Value, json};

/// Arguments that passed validation, restricted to the declared fields.
///
/// Absent nullable fields are present here as `null`.
pub type ValidatedArgs = JsonObject;

/// Shape and constraint of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String that is not empty after trimming whitespace.
    NonBlankText,
    /// Number greater than zero with no fractional part.
    PositiveInteger,
    /// String or `null`; may also be omitted.
    NullableText,
}

impl FieldKind {
    /// Whether `value` (or its absence) satisfies this kind.
    pub fn accepts(self, value: Option<&Value>) -> bool {
        match self {
            Self::NonBlankText => value
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty()),
            Self::PositiveInteger => value
                .and_then(Value::as_f64)
                .is_some_and(|n| n > 0.0 && n.fract() == 0.0),
            Self::NullableText => matches!(value, None | Some(Value::Null | Value::String(_))),
        }
    }

    /// Canonical form of an accepted value. Whole-number floats such as
    /// `42.0` are forwarded as the integer `42`.
    fn normalize(self, value: Option<&Value>) -> Value {
        match (self, value) {
            (Self::PositiveInteger, Some(v)) if v.as_u64().is_none() => v
                .as_f64()
                .filter(|n| *n <= u64::MAX as f64)
                .map(|n| Value::from(n as u64))
                .unwrap_or_else(|| v.clone()),
            (_, Some(v)) => v.clone(),
            (_, None) => Value::Null,
        }
    }

    /// Human-readable requirement, used in invalid-argument messages.
    pub fn requirement(self) -> &'static str {
        match self {
            Self::NonBlankText => "must be a non-empty string",
            Self::PositiveInteger => "must be a positive integer",
            Self::NullableText => "must be a string or null",
        }
    }

    fn declare(self, schema: &mut JsonObject) {
        match self {
            Self::NonBlankText => {
                schema.insert("type".into(), json!("string"));
                schema.insert("minLength".into(), json!(1));
            }
            Self::PositiveInteger => {
                schema.insert("type".into(), json!("number"));
                schema.insert("minimum".into(), json!(1));
            }
            Self::NullableText => {
                schema.insert("type".into(), json!(["string", "null"]));
            }
        }
    }
}

/// One named property of an object schema.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: &'static str,
    kind: FieldKind,
    description: &'static str,
    pattern: Option<&'static str>,
}

impl FieldSchema {
    pub fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            pattern: None,
        }
    }

    /// Advertise a `pattern` hint. Declarative only; `kind` does the checking.
    pub fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn to_json(&self) -> Value {
        let mut schema = JsonObject::new();
        self.kind.declare(&mut schema);
        schema.insert("description".into(), json!(self.description));
        if let Some(pattern) = self.pattern {
            schema.insert("pattern".into(), json!(pattern));
        }
        Value::Object(schema)
    }
}

/// Schema of a tool's argument object. Every field is required, though a
/// [`FieldKind::NullableText`] field may still be omitted by callers.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<FieldSchema>,
    additional_properties: bool,
}

impl ObjectSchema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            additional_properties: true,
        }
    }

    /// Declare `additionalProperties: false`.
    ///
    /// Unknown properties are still tolerated at call time; they are simply
    /// never forwarded upstream.
    pub fn deny_additional_properties(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    /// Render as a JSON Schema object.
    pub fn to_json(&self) -> JsonObject {
        let properties: JsonObject = self
            .fields
            .iter()
            .map(|field| (field.name.to_string(), field.to_json()))
            .collect();
        let required: Vec<&str> = self.fields.iter().map(|field| field.name).collect();

        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        if !self.additional_properties {
            schema.insert("additionalProperties".into(), json!(false));
        }
        schema
    }

    /// Check `arguments` against every field.
    ///
    /// On failure the message lists each offending field, e.g.
    /// `"query must be a non-empty string, id must be a positive integer"`.
    pub fn validate(&self, arguments: &Value) -> Result<ValidatedArgs, String> {
        let Some(object) = arguments.as_object() else {
            return Err("arguments must be an object".to_string());
        };

        let mut validated = ValidatedArgs::new();
        let mut failures = Vec::new();

        for field in &self.fields {
            let value = object.get(field.name);
            if field.kind.accepts(value) {
                validated.insert(field.name.to_string(), field.kind.normalize(value));
            } else {
                failures.push(format!("{} {}", field.name, field.kind.requirement()));
            }
        }

        if failures.is_empty() {
            Ok(validated)
        } else {
            Err(failures.join(", "))
        }
    }
}
