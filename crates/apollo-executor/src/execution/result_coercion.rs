use crate::execution::engine::execute_selection_set;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::LinkedPathElement;
use crate::execution::engine::PropagateNull;
use crate::execution::engine::try_nullify;
use crate::response::JsonValue;
use crate::response::PathElement;
use crate::schema::ExtendedType;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::Type;
use crate::schema::TypeResolver;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::Name;
use apollo_compiler::Node;

/// <https://spec.graphql.org/October2021/#CompleteValue()>
///
/// Returns `Err` for a field error being propagated upwards to find a nullable place.
/// The error was already pushed to `ctx.errors`.
pub(crate) fn complete_value<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    ty: &'a Type,
    resolved: &Value,
    fields: &[&'a Node<ast::Field>],
) -> Result<JsonValue, PropagateNull> {
    let completed = complete_nullable_value(ctx, path, mode, ty, resolved, fields)?;
    if completed.is_null() && ty.is_non_null() {
        let error = ctx.field_error("Cannot return null for non-nullable type.", path, fields[0]);
        ctx.errors.push(error);
        return Err(PropagateNull);
    }
    Ok(completed)
}

/// Completes as if `ty` was nullable
fn complete_nullable_value<'a>(
    ctx: &mut ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    ty: &'a Type,
    resolved: &Value,
    fields: &[&'a Node<ast::Field>],
) -> Result<JsonValue, PropagateNull> {
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                let error = ctx.field_error(format!($($arg)+), path, fields[0]);
                ctx.errors.push(error);
                return Err(PropagateNull);
            }
        };
    }
    if resolved.is_null() {
        return Ok(JsonValue::Null);
    }
    let ty_name = match ty {
        Type::List(inner_ty) | Type::NonNullList(inner_ty) => {
            let Value::List(items) = resolved else {
                field_error!("User Error: expected iterable, but did not find one.")
            };
            let mut completed_list = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let inner_path = LinkedPathElement {
                    element: PathElement::ListIndex(index),
                    next: path,
                };
                let inner_result =
                    complete_value(ctx, Some(&inner_path), mode, inner_ty, item, fields);
                // On field error, try to nullify that item
                let nullable_result = try_nullify(inner_ty, inner_result);
                // If the item is non-null, the error was propagated and the list is nullified
                completed_list.push(nullable_result?)
            }
            return Ok(completed_list.into());
        }
        Type::Named(name) | Type::NonNullNamed(name) => name,
    };
    let Some(ty_def) = ctx.schema.types.get(ty_name) else {
        field_error!("Undefined type {ty_name}")
    };
    let object_type = match ty_def {
        ExtendedType::InputObject(_) => field_error!("Field with input object type {ty_name}"),
        ExtendedType::Scalar(def) => return Ok(coerce_leaf(def.coerce(resolved), ty_name)),
        ExtendedType::Enum(def) => return Ok(coerce_leaf(def.coerce(resolved), ty_name)),
        ExtendedType::Object(def) => def.as_ref(),
        ExtendedType::Interface(def) => {
            match resolve_abstract_type(ctx.schema, &def.name, def.resolve_type.as_ref(), resolved)
            {
                Ok(Some(def)) => def,
                Ok(None) => return Ok(JsonValue::Null),
                Err(message) => field_error!("{message}"),
            }
        }
        ExtendedType::Union(def) => {
            match resolve_abstract_type(ctx.schema, &def.name, def.resolve_type.as_ref(), resolved)
            {
                Ok(Some(def)) => def,
                Ok(None) => return Ok(JsonValue::Null),
                Err(message) => field_error!("{message}"),
            }
        }
    };
    execute_selection_set(
        ctx,
        path,
        mode,
        object_type,
        resolved,
        fields.iter().flat_map(|&field| &field.selection_set),
    )
    .map(JsonValue::Object)
}

/// A value that cannot be coerced to a leaf type becomes null without a field error
fn coerce_leaf(coerced: Option<Value>, ty_name: &Name) -> JsonValue {
    match coerced {
        Some(value) => value.to_json(),
        None => {
            tracing::debug!(ty = %ty_name, "leaf value could not be coerced, completing as null");
            JsonValue::Null
        }
    }
}

/// Finds the object type of a value of an interface or union type.
///
/// Uses the type resolver of the abstract type if there is one.
/// Otherwise, the first possible type whose `is_type_of` predicate accepts the value wins.
/// `Ok(None)` means the value does not belong to any possible type.
fn resolve_abstract_type<'a>(
    schema: &'a Schema,
    abstract_type: &Name,
    type_resolver: Option<&TypeResolver>,
    value: &Value,
) -> Result<Option<&'a ObjectType>, String> {
    if let Some(type_resolver) = type_resolver {
        let Some(name) = type_resolver.resolve(value) else {
            return Ok(None);
        };
        return match schema.get_object(name.as_str()) {
            Some(def) => Ok(Some(def.as_ref())),
            None => Err(format!(
                "Abstract type {abstract_type} must resolve to an object type at runtime, \
                 received \"{name}\"."
            )),
        };
    }
    for possible_type in schema.possible_types(abstract_type.as_str()) {
        let Some(def) = schema.get_object(possible_type.as_str()) else {
            continue;
        };
        let Some(is_type_of) = &def.is_type_of else {
            tracing::warn!(
                abstract_type = %abstract_type,
                object_type = %def.name,
                "cannot determine the runtime type of an abstract type"
            );
            return Err(format!(
                "Non-Object Type {abstract_type} does not implement resolveType and \
                 Object Type {} does not implement isTypeOf. There is no way to \
                 determine if a value is of this type.",
                def.name
            ));
        };
        if is_type_of.check(value) {
            return Ok(Some(def.as_ref()));
        }
    }
    Ok(None)
}
