//! Execution of GraphQL operations against a schema built in Rust code.
//!
//! A [`Schema`][schema::Schema] is assembled from type definitions
//! whose fields carry [resolvers][execution::Resolver].
//! Operations are parsed with [`apollo_compiler::ast::Document::parse`]
//! and executed with [`Execution`] or the [`execute`] shorthand,
//! producing a serializable [`Response`].
//!
//! ```
//! use apollo_compiler::{ast, name, ty};
//! use apollo_executor::schema::{FieldDefinition, InputValueDefinition, ObjectType, Schema};
//! use apollo_executor::{execute, JsonMap, Value};
//!
//! let schema = Schema::builder()
//!     .query_type(name!("Query"))
//!     .object(
//!         ObjectType::new(name!("Query")).field(
//!             FieldDefinition::new(name!("greeting"), ty!(String!))
//!                 .argument(
//!                     InputValueDefinition::new(name!("name"), ty!(String))
//!                         .default_value("world"),
//!                 )
//!                 .resolve(|info| {
//!                     let name = info.argument("name").as_str().unwrap_or_default();
//!                     Ok(format!("Hello, {name}!").into())
//!                 }),
//!         ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let document = ast::Document::parse("{ greeting }", "query.graphql").unwrap();
//! let response = execute(&schema, Value::Null, &document, None, &JsonMap::new());
//! assert_eq!(
//!     serde_json::to_string(&response).unwrap(),
//!     r#"{"data":{"greeting":"Hello, world!"}}"#
//! );
//! ```

pub mod execution;
mod request;
mod response;
pub mod schema;
mod value;

pub use self::execution::execute;
pub use self::execution::Execution;
pub use self::request::Request;
pub use self::request::RequestError;
pub use self::response::serde_json_bytes;
pub use self::response::GraphQLError;
pub use self::response::GraphQLLocation;
pub use self::response::JsonMap;
pub use self::response::JsonValue;
pub use self::response::PathElement;
pub use self::response::Response;
pub use self::response::ResponseData;
pub use self::value::Member;
pub use self::value::Method;
pub use self::value::Record;
pub use self::value::Source;
pub use self::value::Value;
pub use self::value::ValueMap;
