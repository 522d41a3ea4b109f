//! GraphQL [responses](https://spec.graphql.org/October2021/#sec-Response-Format)

use apollo_compiler::parser::SourceMap;
use apollo_compiler::Node;
use serde::Deserialize;
use serde::Serialize;
/// Re-export of the version of the `serde_json_bytes` crate used for [`JsonValue`] and [`JsonMap`]
pub use serde_json_bytes;

/// A JSON-compatible dynamically-typed value.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON-compatible object/map with string keys and dynamically-typed values.
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;

/// A [GraphQL response](https://spec.graphql.org/October2021/#sec-Response-Format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    // <https://spec.graphql.org/October2021/#note-6f005> suggests serializing this first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "ResponseData::is_absent")]
    #[serde(default)]
    pub data: ResponseData,

    /// Reserved for any additional information
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// The `data` entry of a [`Response`]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Option<JsonMap>")]
pub enum ResponseData {
    /// Execution returned an object.
    /// [`Response::data`] is serialized as a JSON object.
    Object(JsonMap),

    /// A field error happened on a non-null field,
    /// and null was propagated all the way to the root of the response.
    /// [`Response::data`] is serialized as JSON null.
    Null,

    /// A [request error][crate::RequestError] was encountered. Execution did not start.
    /// [`Response::data`] is skipped from serialization.
    #[default]
    Absent,
}

/// A serializable [error](https://spec.graphql.org/October2021/#sec-Errors.Error-result-format),
/// as found in a GraphQL [response][Response].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations in relevant to the error, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<GraphQLLocation>,

    /// If non-empty, the error is a field error
    /// for the particular field found at this path in [`Response::data`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub path: Vec<PathElement>,

    /// Reserved for any additional information
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// A source location (line and column numbers) for a [`GraphQLError`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLLocation {
    /// The line number for this location, starting at 1 for the first line.
    pub line: usize,
    /// The column number for this location, starting at 1.
    pub column: usize,
}

/// An element of [`GraphQLError::path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// The relevant key in an object value
    Field(String),

    /// The index of the relevant item in a list value
    ListIndex(usize),
}

impl Response {
    /// Create a response for a request error:
    /// handling of a request was aborted before execution started.
    pub fn from_request_error(error: impl Into<GraphQLError>) -> Self {
        Self::from_request_errors(vec![error.into()])
    }

    pub(crate) fn from_request_errors(errors: Vec<GraphQLError>) -> Self {
        Self {
            errors,
            data: ResponseData::Absent,
            extensions: JsonMap::new(),
        }
    }

    /// Returns the data object, if execution produced one
    pub fn data(&self) -> Option<&JsonMap> {
        match &self.data {
            ResponseData::Object(map) => Some(map),
            ResponseData::Null | ResponseData::Absent => None,
        }
    }
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
            extensions: JsonMap::new(),
        }
    }

    /// Adds the start location of `node`, if known
    pub(crate) fn with_location_of<T>(mut self, node: &Node<T>, sources: &SourceMap) -> Self {
        self.locations.extend(GraphQLLocation::from_node(node, sources));
        self
    }
}

impl GraphQLLocation {
    /// Convert the location of a node to a line and column number
    pub fn from_node<T>(node: &Node<T>, sources: &SourceMap) -> Option<Self> {
        let range = node.line_column_range(sources)?;
        Some(GraphQLLocation {
            line: range.start.line,
            column: range.start.column,
        })
    }
}

impl ResponseData {
    /// For serde `skip_serializing_if`
    fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl Serialize for ResponseData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            // Skipped by `skip_serializing_if`, only reachable when serialized on its own
            ResponseData::Absent | ResponseData::Null => serializer.serialize_unit(),
            ResponseData::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<Option<JsonMap>> for ResponseData {
    fn from(value: Option<JsonMap>) -> Self {
        match value {
            Some(data) => Self::Object(data),
            None => Self::Null,
        }
    }
}
