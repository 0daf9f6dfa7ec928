//! Operation descriptors.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::{FetchOptions, RedirectMode};
use crate::logging::targets;

/// Where and how an operation is sent.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    /// The GraphQL endpoint URL.
    pub url: String,
    /// Transport options.
    pub fetch_options: FetchOptions,
}

impl OperationContext {
    /// Create a context for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetch_options: FetchOptions::default(),
        }
    }
}

/// A GraphQL operation bound to an endpoint.
///
/// Serializes to the request payload `{"query", "variables"}`, plus
/// `"operationName"` when one is set. The context is not serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    /// The GraphQL query string.
    pub query: String,

    /// Variables for the query.
    pub variables: Map<String, Value>,

    /// Optional operation name (for documents with multiple operations).
    #[serde(skip_serializing_if = "Option::is_none", rename = "operationName")]
    pub operation_name: Option<String>,

    /// Endpoint and transport options.
    #[serde(skip)]
    pub context: OperationContext,
}

impl Operation {
    /// Create a new operation with no variables and an empty context.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let operation = Operation::new("query GetUser($id: ID!) { user(id: $id) { name } }")
    ///     .url("https://api.example.com/graphql")
    ///     .variable("id", "123");
    /// ```
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            operation_name: None,
            context: OperationContext::default(),
        }
    }

    /// Set the endpoint URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.context.url = url.into();
        self
    }

    /// Replace the whole context.
    pub fn context(mut self, context: OperationContext) -> Self {
        self.context = context;
        self
    }

    /// Replace the transport options.
    pub fn fetch_options(mut self, fetch_options: FetchOptions) -> Self {
        self.context.fetch_options = fetch_options;
        self
    }

    /// Set the redirect mode.
    pub fn redirect(mut self, mode: RedirectMode) -> Self {
        self.context.fetch_options.redirect = Some(mode);
        self
    }

    /// Set a variable value.
    ///
    /// Values that fail to serialize are skipped.
    pub fn variable(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.variables.insert(name, value);
            }
            Err(e) => {
                tracing::warn!(target: targets::EXCHANGE, "Skipping variable '{}': {}", name, e);
            }
        }
        self
    }

    /// Set all variables from a serializable value.
    ///
    /// The value must serialize to a JSON object; anything else is ignored.
    ///
    /// ```ignore
    /// let operation = Operation::new("...")
    ///     .variables(serde_json::json!({
    ///         "id": "123",
    ///         "limit": 10
    ///     }));
    /// ```
    pub fn variables(mut self, variables: impl Serialize) -> Self {
        match serde_json::to_value(variables) {
            Ok(Value::Object(map)) => self.variables = map,
            Ok(other) => {
                tracing::warn!(
                    target: targets::EXCHANGE,
                    "Ignoring non-object variables: {}",
                    other
                );
            }
            Err(e) => {
                tracing::warn!(target: targets::EXCHANGE, "Ignoring variables: {}", e);
            }
        }
        self
    }

    /// Set variables from a HashMap.
    pub fn variables_map(mut self, variables: HashMap<String, Value>) -> Self {
        self.variables = variables.into_iter().collect();
        self
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// The request payload as a JSON string.
    pub fn payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
