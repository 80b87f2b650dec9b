use jsonschema::error::ValidationErrorKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

use super::error::SchemaError;
use super::issues::{SchemaIssue, SchemaIssues};

/// A schema the contract can run a value through.
///
/// `parse` either returns the validated value (possibly transformed, e.g. defaults filled
/// in) or the structured issues that made it invalid.
///
/// Closures of the right shape are validators too:
///
/// ```rust
/// use serde_json::{json, Value};
/// use typedroute::schema::{SchemaIssues, Validator};
///
/// let non_empty = |v: &Value| -> Result<Value, SchemaIssues> {
///     match v.as_str() {
///         Some(s) if !s.is_empty() => Ok(v.clone()),
///         _ => Err(SchemaIssues::single("expected a non-empty string")),
///     }
/// };
/// assert!(non_empty.parse(&json!("x")).is_ok());
/// assert!(non_empty.parse(&json!("")).is_err());
/// ```
pub trait Validator: Send + Sync {
    /// Validate `raw`, returning the parsed value or the issues found.
    ///
    /// # Errors
    ///
    /// Returns the [`SchemaIssues`] describing why `raw` is invalid.
    fn parse(&self, raw: &Value) -> Result<Value, SchemaIssues>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<Value, SchemaIssues> + Send + Sync,
{
    fn parse(&self, raw: &Value) -> Result<Value, SchemaIssues> {
        self(raw)
    }
}

/// Validator backed by a compiled JSON Schema document.
pub struct JsonSchemaValidator {
    compiled: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile a JSON Schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] when the document is not a valid schema.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        jsonschema::validator_for(schema)
            .map(|compiled| JsonSchemaValidator { compiled })
            .map_err(|e| {
                debug!(error = %e, "Failed to compile JSON Schema");
                SchemaError::from(e)
            })
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator").finish_non_exhaustive()
    }
}

impl Validator for JsonSchemaValidator {
    fn parse(&self, raw: &Value) -> Result<Value, SchemaIssues> {
        let issues: Vec<SchemaIssue> = self
            .compiled
            .iter_errors(raw)
            .map(|error| {
                let mut path = pointer_segments(&error.instance_path().to_string());
                // A missing property is reported against its parent object; attribute it
                // to the property itself.
                if let ValidationErrorKind::Required { property } = error.kind() {
                    if let Some(name) = property.as_str() {
                        path.push(name.to_string());
                    }
                }
                SchemaIssue {
                    path,
                    message: error.to_string(),
                }
            })
            .collect();

        if issues.is_empty() {
            Ok(raw.clone())
        } else {
            Err(SchemaIssues::new(issues))
        }
    }
}

/// Split a JSON pointer (`/a/b~1c`) into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Validator that parses by deserializing into `T` and serializing back.
///
/// The output reflects `T`'s serde attributes, so defaults and renames apply.
pub struct SerdeValidator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeValidator<T> {
    #[must_use]
    pub fn new() -> Self {
        SerdeValidator {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerdeValidator<{}>", std::any::type_name::<T>())
    }
}

impl<T> Validator for SerdeValidator<T>
where
    T: DeserializeOwned + Serialize,
{
    fn parse(&self, raw: &Value) -> Result<Value, SchemaIssues> {
        let typed: T = serde_json::from_value(raw.clone())
            .map_err(|e| SchemaIssues::single(e.to_string()))?;
        serde_json::to_value(typed).map_err(|e| SchemaIssues::single(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn person_schema() -> JsonSchemaValidator {
        JsonSchemaValidator::new(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "age": { "type": "integer" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_json_schema_accepts_valid() {
        let value = json!({"name": "Ada", "age": 36});
        assert_eq!(person_schema().parse(&value).unwrap(), value);
    }

    #[test]
    fn test_json_schema_required_attributed_to_field() {
        let issues = person_schema().parse(&json!({})).unwrap_err();
        let flat = issues.flatten();
        let (field, message) = flat.first_field_error().unwrap();
        assert_eq!(field, "name");
        assert!(!message.is_empty());
    }

    #[test]
    fn test_json_schema_nested_path() {
        let issues = person_schema()
            .parse(&json!({"name": "", "age": "old"}))
            .unwrap_err();
        let fields: Vec<_> = issues.iter().filter_map(|i| i.field()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"age"));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let err = JsonSchemaValidator::new(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema { .. }));
        assert!(err.to_string().starts_with("invalid JSON Schema: "));
    }

    #[test]
    fn test_pointer_segments_unescape() {
        assert_eq!(pointer_segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
        assert!(pointer_segments("").is_empty());
    }

    #[derive(Serialize, Deserialize)]
    struct Paging {
        #[serde(default = "default_limit")]
        limit: u32,
    }

    fn default_limit() -> u32 {
        20
    }

    #[test]
    fn test_serde_validator_applies_defaults() {
        let v = SerdeValidator::<Paging>::new();
        assert_eq!(v.parse(&json!({})).unwrap(), json!({"limit": 20}));
        assert!(v.parse(&json!({"limit": "many"})).is_err());
    }
}
