//! GraphQL [requests](https://spec.graphql.org/October2021/#sec-Executing-Requests)

use crate::execution::Execution;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::Response;
use crate::schema::Schema;
use crate::Value;
use apollo_compiler::ast;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// A [request error](https://spec.graphql.org/October2021/#sec-Errors) is raised
/// before execution starts, and aborts the request as a whole.
///
/// The resulting response does not have a `data` key.
/// This differs from a response with `"data": null`, which happens when a field error
/// on a non-null field propagates all the way to the root of the response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
    location: Option<GraphQLLocation>,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub(crate) fn with_location(mut self, location: Option<GraphQLLocation>) -> Self {
        self.location = location;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location in the query document of the node that caused this error, if known
    pub fn location(&self) -> Option<GraphQLLocation> {
        self.location
    }
}

impl From<RequestError> for GraphQLError {
    fn from(error: RequestError) -> Self {
        let mut graphql_error = GraphQLError::new(error.message);
        graphql_error.locations.extend(error.location);
        graphql_error
    }
}

/// The body of a GraphQL request, as sent by clients over HTTP.
///
/// ```
/// use apollo_executor::Request;
///
/// let request: Request = serde_json::from_str(
///     r#"{"query": "query Q { a }", "operationName": "Q", "variables": null}"#,
/// )
/// .unwrap();
/// assert_eq!(request.operation_name.as_deref(), Some("Q"));
/// assert!(request.variables.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    pub variables: JsonMap,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<JsonMap, D::Error> {
    Ok(Option::<JsonMap>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: JsonMap) -> Self {
        self.variables = variables;
        self
    }

    /// Parses `query`. On syntax errors, returns one error per parser diagnostic.
    pub fn parse(&self) -> Result<ast::Document, Vec<GraphQLError>> {
        ast::Document::parse(&self.query, "request.graphql").map_err(|with_errors| {
            with_errors
                .errors
                .iter()
                .map(|diagnostic| {
                    let json = diagnostic.to_json();
                    let mut error = GraphQLError::new(json.message);
                    error
                        .locations
                        .extend(json.locations.iter().map(|location| GraphQLLocation {
                            line: location.line,
                            column: location.column,
                        }));
                    error
                })
                .collect()
        })
    }

    /// An [`Execution`] configured with the operation name and variables of this request
    pub fn execution(&self) -> Execution {
        let mut execution = Execution::new().variable_values(self.variables.clone());
        if let Some(name) = &self.operation_name {
            execution = execution.operation_name(name.as_str());
        }
        execution
    }

    /// Parses and executes this request.
    ///
    /// Syntax errors result in a response without `data`.
    pub fn execute(&self, schema: &Schema, root_value: impl Into<Value>) -> Response {
        self.execute_with(schema, self.execution().root_value(root_value))
    }

    /// Like [`execute`][Self::execute] with more configuration.
    /// The operation name and variables of `execution` are used, not those of this request.
    pub fn execute_with(&self, schema: &Schema, execution: Execution) -> Response {
        match self.parse() {
            Ok(document) => execution.execute(schema, &document),
            Err(errors) => {
                tracing::debug!(count = errors.len(), "syntax errors in request");
                Response::from_request_errors(errors)
            }
        }
    }
}
