//! GraphQL response types.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ExchangeError;

/// A GraphQL error returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations in the document where the error occurred.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<GraphQLLocation>,

    /// Path to the field that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,

    /// Additional error metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref path) = self.path {
            write!(f, " (at ")?;
            for (i, segment) in path.iter().enumerate() {
                if i > 0 {
                    write!(f, ".")?;
                }
                match segment {
                    PathSegment::Field(name) => write!(f, "{}", name)?,
                    PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphQLError {}

/// A location in a GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLLocation {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

/// A segment in an error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A field name.
    Field(String),
    /// An array index.
    Index(usize),
}

/// A decoded GraphQL response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    /// The data returned by the operation.
    #[serde(default)]
    pub data: Option<Value>,

    /// Errors that occurred during execution.
    ///
    /// A `null` or non-array `errors` field decodes as empty.
    #[serde(
        default,
        deserialize_with = "lenient_errors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<GraphQLError>,

    /// Additional response metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQLResponse {
    /// Classify a decoded response body.
    ///
    /// Only a truthy `data` field matters. Any other JSON value, including
    /// non-objects and bodies carrying only `errors`, is [`ExchangeError::NoData`].
    pub fn from_value(body: Value) -> Result<Self, ExchangeError> {
        if !body.get("data").is_some_and(is_truthy) {
            return Err(ExchangeError::NoData);
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Check if the response carries usable data.
    ///
    /// `null`, `false`, `0` and `""` do not count; any object or array does,
    /// even when empty.
    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(is_truthy)
    }

    /// Check if the response contains errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the first error, if any.
    pub fn first_error(&self) -> Option<&GraphQLError> {
        self.errors.first()
    }

    /// Get all errors as a combined message.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(
                self.errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        }
    }

    /// Parse the data as a specific type.
    ///
    /// Errors alongside data are not checked; GraphQL allows partial results.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, ExchangeError> {
        match &self.data {
            Some(data) if is_truthy(data) => Ok(serde_json::from_value(data.clone())?),
            _ => Err(ExchangeError::NoData),
        }
    }

    /// Parse a specific field from the data.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // For a response like: { "data": { "user": { "id": "1", "name": "John" } } }
    /// let user: User = response.field("user")?;
    /// ```
    pub fn field<T: DeserializeOwned>(&self, field: &str) -> Result<T, ExchangeError> {
        let value = self
            .data
            .as_ref()
            .and_then(|data| data.get(field))
            .ok_or(ExchangeError::NoData)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Get raw data as Value without parsing.
    pub fn raw_data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

fn lenient_errors<'de, D>(deserializer: D) -> Result<Vec<GraphQLError>, D::Error>
where
    D: Deserializer<'de>,
{
    let errors = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries.into_iter().map(GraphQLError::from_entry).collect(),
        _ => Vec::new(),
    };
    Ok(errors)
}

impl GraphQLError {
    /// Decode one `errors` entry, keeping malformed ones as their JSON text.
    fn from_entry(entry: Value) -> Self {
        match serde_json::from_value(entry.clone()) {
            Ok(error) => error,
            Err(_) => Self {
                message: entry.to_string(),
                locations: Vec::new(),
                path: None,
                extensions: None,
            },
        }
    }
}

/// JSON truthiness: everything except `null`, `false`, zero and `""`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(body: Value) -> GraphQLResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_successful_response() {
        let response = decode(json!({"data": {"user": {"id": "1", "name": "John"}}}));
        assert!(response.has_data());
        assert!(!response.has_errors());
    }

    #[test]
    fn test_error_response() {
        let response = decode(json!({
            "errors": [{
                "message": "User not found",
                "locations": [{"line": 1, "column": 1}],
                "path": ["user", 0, "name"]
            }]
        }));

        assert!(!response.has_data());
        assert!(response.has_errors());
        assert_eq!(response.error_message(), Some("User not found".to_string()));
        assert_eq!(
            response.first_error().unwrap().to_string(),
            "User not found (at user.[0].name)"
        );
    }

    #[test]
    fn test_falsy_data() {
        for data in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            let response = decode(json!({ "data": data }));
            assert!(!response.has_data(), "{data} should not count as data");
        }
    }

    #[test]
    fn test_truthy_data() {
        for data in [json!({}), json!([]), json!(1), json!("x"), json!(true)] {
            let response = decode(json!({ "data": data }));
            assert!(response.has_data(), "{data} should count as data");
        }
    }

    #[test]
    fn test_parse_field() {
        let response = decode(json!({"data": {"user": {"id": "1", "name": "John"}}}));

        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            id: String,
            name: String,
        }

        let user: User = response.field("user").unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "John");
        assert!(matches!(
            response.field::<User>("missing"),
            Err(ExchangeError::NoData)
        ));
    }

    #[test]
    fn test_partial_response() {
        // GraphQL can return partial data with errors
        let response = decode(json!({
            "data": {"user": null, "viewer": {"id": "7"}},
            "errors": [{"message": "Permission denied", "path": ["user"]}]
        }));

        assert!(response.has_errors());
        let data: Value = response.data().unwrap();
        assert_eq!(data["viewer"]["id"], "7");
    }

    #[test]
    fn test_from_value_ignores_malformed_errors() {
        let response = GraphQLResponse::from_value(json!({
            "data": {"id": 1},
            "errors": null
        }))
        .unwrap();
        assert!(!response.has_errors());

        let response = GraphQLResponse::from_value(json!({
            "data": {"id": 1},
            "errors": [{"msg": "partial"}, {"message": "kept"}]
        }))
        .unwrap();
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[0].message, r#"{"msg":"partial"}"#);
        assert_eq!(response.errors[1].message, "kept");
    }

    #[test]
    fn test_from_value_without_data() {
        for body in [
            json!([]),
            json!([{"data": 1}]),
            json!("data"),
            json!(null),
            json!({"errors": null}),
            json!({"data": false, "errors": [{"message": "boom"}]}),
        ] {
            assert!(
                matches!(GraphQLResponse::from_value(body.clone()), Err(ExchangeError::NoData)),
                "{body} should have no data"
            );
        }
    }

    #[test]
    fn test_missing_data() {
        let response = GraphQLResponse::default();
        assert!(matches!(response.data::<Value>(), Err(ExchangeError::NoData)));
        assert!(response.raw_data().is_none());
    }
}
