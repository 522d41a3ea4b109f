use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::input_coercion::VariableValues;
use crate::execution::resolver::default_resolve;
use crate::execution::resolver::ResolveInfo;
use crate::execution::result_coercion::complete_value;
use crate::execution::FieldError;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathElement;
use crate::schema::ExtendedType;
use crate::schema::FieldDefinition;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::Type;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::parser::SourceMap;
use apollo_compiler::Name;
use apollo_compiler::Node;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;

/// <https://spec.graphql.org/October2021/#sec-Normal-and-Serial-Execution>
#[derive(Debug, Copy, Clone)]
pub(crate) enum ExecutionMode {
    /// Allowed to resolve fields in any order, including in parallel
    Normal,
    /// Top-level fields of a mutation operation must be executed in order
    Sequential,
}

/// Return in `Err` when a field error occurred at some non-nullable place
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
pub(crate) struct PropagateNull;

/// Linked-list version of `Vec<PathElement>`, taking advantage of the call stack
pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathElement,
    pub(crate) next: LinkedPath<'a>,
}

pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) sources: &'a SourceMap,
    pub(crate) fragments: HashMap<&'a str, &'a Node<ast::FragmentDefinition>>,
    pub(crate) operation: &'a Node<ast::OperationDefinition>,
    pub(crate) root_value: &'a Value,
    pub(crate) variable_values: &'a VariableValues,
    pub(crate) errors: &'a mut Vec<GraphQLError>,
    pub(crate) enable_schema_introspection: bool,
}

/// <https://spec.graphql.org/October2021/#ExecuteSelectionSet()>
pub(crate) fn execute_selection_set<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &'a ObjectType,
    object_value: &Value,
    selections: impl IntoIterator<Item = &'a ast::Selection>,
) -> Result<JsonMap, PropagateNull> {
    let mut grouped_field_set = IndexMap::new();
    collect_fields(
        ctx,
        object_type,
        selections,
        &mut HashSet::new(),
        &mut grouped_field_set,
    );

    match mode {
        ExecutionMode::Normal => {
            // Resolvers are synchronous, so fields are still resolved in document order
        }
        ExecutionMode::Sequential => {
            // Each top-level mutation field completes before the next one starts
        }
    }

    let mut response_map = JsonMap::with_capacity(grouped_field_set.len());
    for (&response_key, fields) in &grouped_field_set {
        let field_path = LinkedPathElement {
            element: PathElement::Field(response_key.to_string()),
            next: path,
        };
        if let Some(value) = execute_field(
            ctx,
            Some(&field_path),
            mode,
            object_type,
            object_value,
            fields,
        )? {
            response_map.insert(response_key.as_str(), value);
        }
    }
    Ok(response_map)
}

/// <https://spec.graphql.org/October2021/#CollectFields()>
fn collect_fields<'a>(
    ctx: &mut ExecutionContext<'a>,
    object_type: &ObjectType,
    selections: impl IntoIterator<Item = &'a ast::Selection>,
    visited_fragments: &mut HashSet<&'a Name>,
    grouped_fields: &mut IndexMap<&'a Name, Vec<&'a Node<ast::Field>>>,
) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => {
                if !should_include(ctx, &field.directives) {
                    continue;
                }
                grouped_fields
                    .entry(response_key(field))
                    .or_default()
                    .push(field)
            }
            ast::Selection::InlineFragment(inline) => {
                if !should_include(ctx, &inline.directives) {
                    continue;
                }
                if let Some(condition) = &inline.type_condition {
                    if !does_fragment_type_apply(ctx.schema, object_type, condition) {
                        continue;
                    }
                }
                collect_fields(
                    ctx,
                    object_type,
                    &inline.selection_set,
                    visited_fragments,
                    grouped_fields,
                )
            }
            ast::Selection::FragmentSpread(spread) => {
                if visited_fragments.contains(&spread.fragment_name)
                    || !should_include(ctx, &spread.directives)
                {
                    continue;
                }
                visited_fragments.insert(&spread.fragment_name);
                let Some(fragment) = ctx.fragments.get(spread.fragment_name.as_str()).copied()
                else {
                    continue;
                };
                if !should_include(ctx, &fragment.directives)
                    || !does_fragment_type_apply(ctx.schema, object_type, &fragment.type_condition)
                {
                    continue;
                }
                collect_fields(
                    ctx,
                    object_type,
                    &fragment.selection_set,
                    visited_fragments,
                    grouped_fields,
                )
            }
        }
    }
}

fn response_key(field: &ast::Field) -> &Name {
    field.alias.as_ref().unwrap_or(&field.name)
}

/// <https://spec.graphql.org/October2021/#DoesFragmentTypeApply()>
fn does_fragment_type_apply(
    schema: &Schema,
    object_type: &ObjectType,
    fragment_type: &Name,
) -> bool {
    match schema.get_type(fragment_type.as_str()) {
        Some(ExtendedType::Object(_)) => *fragment_type == object_type.name,
        Some(ExtendedType::Interface(_) | ExtendedType::Union(_)) => {
            schema.is_possible_type(fragment_type.as_str(), object_type.name.as_str())
        }
        // Undefined or not an output type
        _ => false,
    }
}

/// The first `@skip` or `@include` directive decides.
/// If its `if` argument cannot be coerced to a boolean, the node is included.
fn should_include(ctx: &ExecutionContext<'_>, directives: &ast::DirectiveList) -> bool {
    for directive in directives.iter() {
        match directive.name.as_str() {
            "skip" => return !eval_if_arg(ctx, directive).unwrap_or(false),
            "include" => return eval_if_arg(ctx, directive).unwrap_or(true),
            _ => {}
        }
    }
    true
}

fn eval_if_arg(ctx: &ExecutionContext<'_>, directive: &ast::Directive) -> Option<bool> {
    let definition = ctx.schema.directive(directive.name.as_str())?;
    let argument_values = coerce_argument_values(
        ctx.schema,
        &definition.arguments,
        &directive.arguments,
        ctx.variable_values,
    );
    argument_values.get("if")?.as_bool()
}

/// <https://spec.graphql.org/October2021/#ExecuteField()>
///
/// Return `Ok(None)` for silently skipping that field.
fn execute_field<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &'a ObjectType,
    object_value: &Value,
    fields: &[&'a Node<ast::Field>],
) -> Result<Option<JsonValue>, PropagateNull> {
    // Indexing should not panic: `collect_fields` only creates a `Vec` to push to it
    let field = fields[0];
    let Some(field_def) = field_definition(ctx.schema, object_type, &field.name) else {
        tracing::trace!(
            field = %field.name,
            object_type = %object_type.name,
            "skipping undefined field"
        );
        return Ok(None);
    };
    let argument_values = coerce_argument_values(
        ctx.schema,
        &field_def.arguments,
        &field.arguments,
        ctx.variable_values,
    );
    let info = ResolveInfo {
        source: object_value,
        arguments: &argument_values,
        root_value: ctx.root_value,
        operation: ctx.operation,
        fields,
        field_definition: field_def,
        parent_type: object_type,
        schema: ctx.schema,
    };
    let resolved_result = if is_schema_introspection(ctx.schema, field_def)
        && !ctx.enable_schema_introspection
    {
        // Disabled with `Execution::enable_schema_introspection(false)`
        Err(FieldError::new("schema introspection is disabled"))
    } else {
        match &field_def.resolver {
            Some(resolver) => resolver.resolve(&info),
            None => default_resolve(&info),
        }
    };
    let completed_result = match resolved_result {
        Ok(resolved) => complete_value(ctx, path, mode, &field_def.ty, &resolved, fields),
        Err(FieldError {
            message,
            extensions,
        }) => {
            tracing::debug!(field = %field.name, %message, "resolver error");
            let mut error = ctx.field_error(message, path, field);
            error.extensions = extensions;
            ctx.errors.push(error);
            Err(PropagateNull)
        }
    };
    try_nullify(&field_def.ty, completed_result).map(Some)
}

/// Looks up a field, including meta-fields.
///
/// `__schema` and `__type` are only defined on the query root type.
fn field_definition<'a>(
    schema: &'a Schema,
    object_type: &'a ObjectType,
    name: &Name,
) -> Option<&'a FieldDefinition> {
    let meta_fields = &schema.meta_fields;
    match name.as_str() {
        "__typename" => Some(&meta_fields.typename),
        "__schema" | "__type" if object_type.name != schema.query_type.name => None,
        "__schema" => Some(&meta_fields.schema),
        "__type" => Some(&meta_fields.type_),
        _ => object_type.fields.get(name),
    }
}

fn is_schema_introspection(schema: &Schema, field_def: &FieldDefinition) -> bool {
    std::ptr::eq(field_def, &schema.meta_fields.schema)
        || std::ptr::eq(field_def, &schema.meta_fields.type_)
}

/// Try to insert a propagated null if possible, or keep propagating it.
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
pub(crate) fn try_nullify(
    ty: &Type,
    result: Result<JsonValue, PropagateNull>,
) -> Result<JsonValue, PropagateNull> {
    match result {
        Ok(json) => Ok(json),
        Err(PropagateNull) => {
            if ty.is_non_null() {
                Err(PropagateNull)
            } else {
                Ok(JsonValue::Null)
            }
        }
    }
}

pub(crate) fn path_to_vec(mut link: LinkedPath<'_>) -> Vec<PathElement> {
    let mut path = Vec::new();
    while let Some(node) = link {
        path.push(node.element.clone());
        link = node.next;
    }
    path.reverse();
    path
}

impl ExecutionContext<'_> {
    /// A field error located at the first node of a field
    pub(crate) fn field_error(
        &self,
        message: impl Into<String>,
        path: LinkedPath<'_>,
        field: &Node<ast::Field>,
    ) -> GraphQLError {
        let mut error = GraphQLError::new(message).with_location_of(field, self.sources);
        error.path = path_to_vec(path);
        error
    }
}
