use crate::execution::resolver::Arguments;
use crate::request::RequestError;
use crate::response::GraphQLLocation;
use crate::schema::ExtendedType;
use crate::schema::InputObjectType;
use crate::schema::InputValueDefinition;
use crate::schema::Schema;
use crate::schema::Type;
use crate::JsonMap;
use crate::Value;
use crate::ValueMap;
use apollo_compiler::ast;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::Name;
use apollo_compiler::Node;
use indexmap::IndexMap;

/// Coerced values of the variables declared by an operation
pub type VariableValues = IndexMap<Name, Value>;

/// Coerce the values of variables from a GraphQL request to the types declared by the operation.
///
/// Variables that are not declared are ignored.
/// A declared variable without a value takes its default value, or null.
/// If a value is not valid for its declared type, a request error is returned
/// and the request must not be executed.
pub fn coerce_variable_values(
    schema: &Schema,
    operation: &ast::OperationDefinition,
    values: &JsonMap,
    sources: &SourceMap,
) -> Result<VariableValues, RequestError> {
    let mut coerced_values = VariableValues::with_capacity(operation.variables.len());
    for variable_def in &operation.variables {
        let name = &variable_def.name;
        let ty = &variable_def.ty;
        if schema.get_type(ty.inner_named_type().as_str()).is_none() {
            coerced_values.insert(name.clone(), Value::Null);
            continue;
        }
        let value = values
            .get(name.as_str())
            .map(Value::from_json)
            .unwrap_or_default();
        if !is_valid_value(schema, ty, &value) {
            tracing::debug!(variable = %name, "invalid variable value");
            return Err(RequestError::new(format!(
                "Variable \"${name}\" expected value of different type."
            ))
            .with_location(GraphQLLocation::from_node(variable_def, sources)));
        }
        let value = match (&value, &variable_def.default_value) {
            (Value::Null, Some(default)) => {
                coerce_literal(schema, ty, Some(&**default), &VariableValues::new())
            }
            _ => coerce_value(schema, ty, &value),
        };
        coerced_values.insert(name.clone(), value);
    }
    Ok(coerced_values)
}

/// Coerce the argument nodes of a field or directive against the declared arguments.
///
/// Every declared argument is present in the result.
/// A null value is replaced with the argument's default value, if any.
pub(crate) fn coerce_argument_values(
    schema: &Schema,
    definitions: &[InputValueDefinition],
    arguments: &[Node<ast::Argument>],
    variable_values: &VariableValues,
) -> Arguments {
    definitions
        .iter()
        .map(|def| {
            let node = arguments
                .iter()
                .find(|arg| arg.name == def.name)
                .map(|arg| &*arg.value);
            let value = coerce_literal(schema, &def.ty, node, variable_values);
            (def.name.clone(), with_default(value, def))
        })
        .collect()
}

fn with_default(value: Value, def: &InputValueDefinition) -> Value {
    match (value, &def.default_value) {
        (Value::Null, Some(default)) => default.clone(),
        (value, _) => value,
    }
}

/// Coerce a literal or variable reference from a query document to an input type.
///
/// Literals that cannot be coerced become null.
/// Variables are looked up as-is, they were already coerced.
pub(crate) fn coerce_literal(
    schema: &Schema,
    ty: &Type,
    value: Option<&ast::Value>,
    variable_values: &VariableValues,
) -> Value {
    let Some(value) = value else {
        return Value::Null;
    };
    match value {
        ast::Value::Null => return Value::Null,
        ast::Value::Variable(name) => {
            return variable_values
                .get(name.as_str())
                .cloned()
                .unwrap_or_default()
        }
        _ => {}
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            return match value {
                ast::Value::List(items) => Value::List(
                    items
                        .iter()
                        .map(|item| coerce_literal(schema, inner, Some(item), variable_values))
                        .collect(),
                ),
                // A single value is treated as a list of size one
                _ => Value::List(vec![coerce_literal(
                    schema,
                    inner,
                    Some(value),
                    variable_values,
                )]),
            };
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    match schema.types.get(ty_name) {
        Some(ExtendedType::InputObject(def)) => {
            let ast::Value::Object(fields) = value else {
                return Value::Null;
            };
            coerce_input_object(def, |field_def| {
                let node = fields
                    .iter()
                    .find(|(name, _)| *name == field_def.name)
                    .map(|(_, value)| &**value);
                coerce_literal(schema, &field_def.ty, node, variable_values)
            })
        }
        Some(ExtendedType::Scalar(def)) => def.coerce_literal(value).unwrap_or_default(),
        Some(ExtendedType::Enum(def)) => def.coerce_literal(value).unwrap_or_default(),
        _ => Value::Null,
    }
}

/// Fields in declaration order, defaults applied for null values
fn coerce_input_object(
    def: &InputObjectType,
    mut coerce_field: impl FnMut(&InputValueDefinition) -> Value,
) -> Value {
    let map: ValueMap = def
        .fields
        .values()
        .map(|field_def| {
            let value = coerce_field(field_def);
            (field_def.name.to_string(), with_default(value, field_def))
        })
        .collect();
    Value::Map(map)
}

/// Returns whether a runtime value, such as a variable value, can be coerced to an input type
pub(crate) fn is_valid_value(schema: &Schema, ty: &Type, value: &Value) -> bool {
    if value.is_null() {
        return !ty.is_non_null();
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            return match value {
                Value::List(items) => items
                    .iter()
                    .all(|item| is_valid_value(schema, inner, item)),
                _ => is_valid_value(schema, inner, value),
            };
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    match schema.types.get(ty_name) {
        Some(ExtendedType::InputObject(def)) => {
            let Value::Map(map) = value else {
                return false;
            };
            def.fields
                .values()
                .all(|field_def| match map.get(field_def.name.as_str()) {
                    Some(field_value) => is_valid_value(schema, &field_def.ty, field_value),
                    None => !field_def.ty.is_non_null(),
                })
        }
        Some(ExtendedType::Scalar(def)) => def.coerce(value).is_some(),
        Some(ExtendedType::Enum(def)) => def.coerce(value).is_some(),
        _ => false,
    }
}

/// Coerce a runtime value that passed [`is_valid_value`] to an input type
pub(crate) fn coerce_value(schema: &Schema, ty: &Type, value: &Value) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            return match value {
                Value::List(items) => Value::List(
                    items
                        .iter()
                        .map(|item| coerce_value(schema, inner, item))
                        .collect(),
                ),
                _ => Value::List(vec![coerce_value(schema, inner, value)]),
            };
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    match schema.types.get(ty_name) {
        Some(ExtendedType::InputObject(def)) => {
            let Value::Map(map) = value else {
                return Value::Null;
            };
            coerce_input_object(def, |field_def| {
                map.get(field_def.name.as_str())
                    .map(|field_value| coerce_value(schema, &field_def.ty, field_value))
                    .unwrap_or_default()
            })
        }
        Some(ExtendedType::Scalar(def)) => def.coerce(value).unwrap_or_default(),
        Some(ExtendedType::Enum(def)) => def.coerce(value).unwrap_or_default(),
        _ => Value::Null,
    }
}
