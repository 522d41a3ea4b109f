//! APIs related to [executing a GraphQL request][execution]
//! and returning a [GraphQL response][crate::Response]
//!
//! [execution]: https://spec.graphql.org/October2021/#sec-Execution

mod engine;
mod input_coercion;
pub(crate) mod introspection;
mod resolver;
mod result_coercion;

pub use self::input_coercion::coerce_variable_values;
pub use self::input_coercion::VariableValues;
pub use self::resolver::Arguments;
pub use self::resolver::FieldError;
pub use self::resolver::ResolveInfo;
pub use self::resolver::Resolver;
use self::engine::execute_selection_set;
use self::engine::ExecutionContext;
use self::engine::ExecutionMode;
use crate::request::RequestError;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::Response;
use crate::schema::Schema;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::Node;

/// Configuration for executing an operation of a parsed document.
///
/// ```
/// use apollo_compiler::{ast, name, ty};
/// use apollo_executor::schema::{FieldDefinition, ObjectType, Schema};
/// use apollo_executor::Execution;
///
/// let schema = Schema::builder()
///     .query_type(name!("Query"))
///     .object(ObjectType::new(name!("Query")).field(
///         FieldDefinition::new(name!("hello"), ty!(String)).resolve(|_| Ok("world".into())),
///     ))
///     .build()
///     .unwrap();
/// let document = ast::Document::parse("{ hello }", "query.graphql").unwrap();
/// let response = Execution::new().execute(&schema, &document);
/// assert_eq!(
///     serde_json::to_string(&response).unwrap(),
///     r#"{"data":{"hello":"world"}}"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Execution {
    operation_name: Option<String>,
    variable_values: JsonMap,
    root_value: Value,
    enable_schema_introspection: bool,
}

impl Default for Execution {
    fn default() -> Self {
        Self::new()
    }
}

impl Execution {
    pub fn new() -> Self {
        Self {
            operation_name: None,
            variable_values: JsonMap::new(),
            root_value: Value::Null,
            enable_schema_introspection: true,
        }
    }

    /// Selects the operation to execute.
    /// Required if the document contains more than one operation.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Raw variable values from the request, coerced before execution starts
    pub fn variable_values(mut self, values: JsonMap) -> Self {
        self.variable_values = values;
        self
    }

    /// The source value of root fields
    pub fn root_value(mut self, value: impl Into<Value>) -> Self {
        self.root_value = value.into();
        self
    }

    /// Whether `__schema` and `__type` are resolved. Enabled by default.
    ///
    /// When disabled, they produce a field error. `__typename` is not affected.
    pub fn enable_schema_introspection(mut self, enable: bool) -> Self {
        self.enable_schema_introspection = enable;
        self
    }

    /// Executes an operation of `document`.
    ///
    /// Request errors result in a response without `data`.
    /// Field errors are collected in the response next to partial data.
    pub fn execute(&self, schema: &Schema, document: &ast::Document) -> Response {
        let span = tracing::debug_span!(
            "execute",
            operation_name = self.operation_name.as_deref()
        );
        let _guard = span.enter();
        self.try_execute(schema, document)
            .unwrap_or_else(|error| {
                tracing::debug!(%error, "request error");
                Response::from_request_error(error)
            })
    }

    fn try_execute(
        &self,
        schema: &Schema,
        document: &ast::Document,
    ) -> Result<Response, RequestError> {
        let sources = &document.sources;
        let operation = get_operation(document, self.operation_name.as_deref())?;
        let location = || GraphQLLocation::from_node(operation, sources);
        let (object_type, mode) = match operation.operation_type {
            ast::OperationType::Query => (&**schema.query_type(), ExecutionMode::Normal),
            ast::OperationType::Mutation => {
                let Some(mutation_type) = schema.mutation_type() else {
                    return Err(RequestError::new("Schema is not configured for mutations.")
                        .with_location(location()));
                };
                (&**mutation_type, ExecutionMode::Sequential)
            }
            ast::OperationType::Subscription => {
                return Err(RequestError::new("Can only execute queries and mutations.")
                    .with_location(location()))
            }
        };
        let variable_values =
            coerce_variable_values(schema, operation, &self.variable_values, sources)?;
        let fragments = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => {
                    Some((fragment.name.as_str(), fragment))
                }
                _ => None,
            })
            .collect();

        let mut errors = Vec::new();
        let mut ctx = ExecutionContext {
            schema,
            sources,
            fragments,
            operation,
            root_value: &self.root_value,
            variable_values: &variable_values,
            errors: &mut errors,
            enable_schema_introspection: self.enable_schema_introspection,
        };
        let path = None;
        let data = execute_selection_set(
            &mut ctx,
            path,
            mode,
            object_type,
            &self.root_value,
            &operation.selection_set,
        )
        // A null propagated to the root of the response
        .ok();
        Ok(Response {
            data: data.into(),
            errors,
            extensions: JsonMap::new(),
        })
    }
}

/// <https://spec.graphql.org/October2021/#GetOperation()>
fn get_operation<'a>(
    document: &'a ast::Document,
    name: Option<&str>,
) -> Result<&'a Node<ast::OperationDefinition>, RequestError> {
    let mut operations = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        });
    if let Some(name) = name {
        return operations
            .find(|operation| {
                operation
                    .name
                    .as_ref()
                    .is_some_and(|operation_name| operation_name.as_str() == name)
            })
            .ok_or_else(|| RequestError::new(format!("Unknown operation named \"{name}\".")));
    }
    let operation = operations
        .next()
        .ok_or_else(|| RequestError::new("Must provide an operation."))?;
    if operations.next().is_some() {
        return Err(RequestError::new(
            "Must provide operation name if query contains multiple operations.",
        ));
    }
    Ok(operation)
}

/// Executes an operation with default configuration.
///
/// Shorthand for [`Execution`] with an optional operation name and raw variable values.
pub fn execute(
    schema: &Schema,
    root_value: impl Into<Value>,
    document: &ast::Document,
    operation_name: Option<&str>,
    variable_values: &JsonMap,
) -> Response {
    let mut execution = Execution::new()
        .root_value(root_value)
        .variable_values(variable_values.clone());
    if let Some(name) = operation_name {
        execution = execution.operation_name(name);
    }
    execution.execute(schema, document)
}
