//! Meta-types and meta-fields for [schema introspection](https://spec.graphql.org/October2021/#sec-Schema-Introspection)
//!
//! Meta-types are registered in every schema and executed like any other type.
//! Their source values are private [`Introspected`] objects.

use crate::execution::FieldError;
use crate::execution::ResolveInfo;
use crate::execution::Resolver;
use crate::schema::DirectiveDefinition;
use crate::schema::EnumType;
use crate::schema::EnumValueDefinition;
use crate::schema::ExtendedType;
use crate::schema::FieldDefinition;
use crate::schema::InputValueDefinition;
use crate::schema::ObjectType;
use crate::schema::Type;
use crate::value::Member;
use crate::Source;
use crate::Value;
use apollo_compiler::name;
use apollo_compiler::ty;
use apollo_compiler::Name;
use std::any::Any;
use std::sync::Arc;

/// Fields that are not declared on object types, but looked up by name
#[derive(Debug)]
pub(crate) struct MetaFields {
    /// `__schema: __Schema!`, only on the query root type
    pub(crate) schema: FieldDefinition,
    /// `__type(name: String!): __Type`, only on the query root type
    pub(crate) type_: FieldDefinition,
    /// `__typename: String!`, on every object type
    pub(crate) typename: FieldDefinition,
}

/// Internal values of the `__TypeKind` enum
#[derive(Debug, Clone, Copy)]
enum TypeKind {
    Scalar = 0,
    Object = 1,
    Interface = 2,
    Union = 3,
    Enum = 4,
    InputObject = 5,
    List = 6,
    NonNull = 7,
}

/// Source value of meta-type objects
#[derive(Debug)]
enum Introspected {
    Schema,
    Type(Type),
    Field(FieldDefinition),
    InputValue(InputValueDefinition),
    EnumValue(EnumValueDefinition),
    Directive(DirectiveDefinition),
}

impl Source for Introspected {
    fn member(&self, _name: &str) -> Option<Member> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<TypeKind> for Value {
    fn from(kind: TypeKind) -> Self {
        Value::Int(kind as i64)
    }
}

impl From<Introspected> for Value {
    fn from(introspected: Introspected) -> Self {
        Value::object(introspected)
    }
}

pub(crate) fn meta_fields() -> MetaFields {
    MetaFields {
        schema: FieldDefinition::new(name!("__schema"), ty!(__Schema!))
            .description("Access the current type schema of this server.")
            .resolve(|_info| Ok(Introspected::Schema.into())),
        type_: FieldDefinition::new(name!("__type"), ty!(__Type))
            .description("Request the type information of a single type.")
            .argument(InputValueDefinition::new(name!("name"), ty!(String!)))
            .resolve(|info| {
                let name = info.argument("name").as_str().unwrap_or_default();
                Ok(info
                    .schema()
                    .type_map()
                    .get_key_value(name)
                    .map(|(name, _)| named_type(name))
                    .into())
            }),
        typename: FieldDefinition::new(name!("__typename"), ty!(String!))
            .description("The name of the current Object type at runtime.")
            .resolve(|info| Ok(info.parent_type().name.as_str().into())),
    }
}

pub(crate) fn meta_types() -> Vec<ExtendedType> {
    let schema: Arc<dyn Resolver> = Arc::new(resolve_schema);
    let type_: Arc<dyn Resolver> = Arc::new(resolve_type);
    let field: Arc<dyn Resolver> = Arc::new(resolve_field);
    let input_value: Arc<dyn Resolver> = Arc::new(resolve_input_value);
    let enum_value: Arc<dyn Resolver> = Arc::new(resolve_enum_value);
    let directive: Arc<dyn Resolver> = Arc::new(resolve_directive);
    let def = |name: Name, ty: Type, resolver: &Arc<dyn Resolver>| {
        FieldDefinition::new(name, ty).resolver(resolver.clone())
    };
    let include_deprecated = || {
        InputValueDefinition::new(name!("includeDeprecated"), ty!(Boolean)).default_value(false)
    };

    let schema_type = ObjectType::new(name!("__Schema"))
        .description(
            "A GraphQL Schema defines the capabilities of a GraphQL server. \
             It exposes all available types and directives on the server, \
             as well as the entry points for query and mutation operations.",
        )
        .field(
            def(name!("types"), ty!([__Type!]!), &schema)
                .description("A list of all types supported by this server."),
        )
        .field(
            def(name!("queryType"), ty!(__Type!), &schema)
                .description("The type that query operations will be rooted at."),
        )
        .field(
            def(name!("mutationType"), ty!(__Type), &schema).description(
                "If this server supports mutation, the type that mutation operations will be rooted at.",
            ),
        )
        .field(
            def(name!("subscriptionType"), ty!(__Type), &schema)
                .description("Always null, subscriptions are not supported."),
        )
        .field(
            def(name!("directives"), ty!([__Directive!]!), &schema)
                .description("A list of all directives supported by this server."),
        );

    let type_type = ObjectType::new(name!("__Type"))
        .description(
            "The fundamental unit of any GraphQL Schema is the type. \
             Depending on the kind of a type, certain fields describe information about that type.",
        )
        .field(def(name!("kind"), ty!(__TypeKind!), &type_))
        .field(def(name!("name"), ty!(String), &type_))
        .field(def(name!("description"), ty!(String), &type_))
        .field(
            def(name!("fields"), ty!([__Field!]), &type_).argument(include_deprecated()),
        )
        .field(def(name!("interfaces"), ty!([__Type!]), &type_))
        .field(def(name!("possibleTypes"), ty!([__Type!]), &type_))
        .field(
            def(name!("enumValues"), ty!([__EnumValue!]), &type_)
                .argument(include_deprecated()),
        )
        .field(def(name!("inputFields"), ty!([__InputValue!]), &type_))
        .field(def(name!("ofType"), ty!(__Type), &type_));

    let field_type = ObjectType::new(name!("__Field"))
        .description(
            "Object and Interface types are described by a list of Fields, \
             each of which has a name, potentially a list of arguments, and a return type.",
        )
        .field(def(name!("name"), ty!(String!), &field))
        .field(def(name!("description"), ty!(String), &field))
        .field(def(name!("args"), ty!([__InputValue!]!), &field))
        .field(def(name!("type"), ty!(__Type!), &field))
        .field(def(name!("isDeprecated"), ty!(Boolean!), &field))
        .field(def(name!("deprecationReason"), ty!(String), &field));

    let input_value_type = ObjectType::new(name!("__InputValue"))
        .description(
            "Arguments provided to Fields or Directives and the input fields of an InputObject \
             are represented as Input Values which describe their type \
             and optionally a default value.",
        )
        .field(def(name!("name"), ty!(String!), &input_value))
        .field(def(name!("description"), ty!(String), &input_value))
        .field(def(name!("type"), ty!(__Type!), &input_value))
        .field(
            def(name!("defaultValue"), ty!(String), &input_value).description(
                "A JSON encoding of the default value used by this input value, if any.",
            ),
        );

    let enum_value_type = ObjectType::new(name!("__EnumValue"))
        .description(
            "One possible value for a given Enum. Enum values are unique values, \
             not a placeholder for a string or numeric value.",
        )
        .field(def(name!("name"), ty!(String!), &enum_value))
        .field(def(name!("description"), ty!(String), &enum_value))
        .field(def(name!("isDeprecated"), ty!(Boolean!), &enum_value))
        .field(def(name!("deprecationReason"), ty!(String), &enum_value));

    let directive_type = ObjectType::new(name!("__Directive"))
        .description(
            "A Directive provides a way to describe alternate runtime execution \
             and type validation behavior in a GraphQL document.",
        )
        .field(def(name!("name"), ty!(String!), &directive))
        .field(def(name!("description"), ty!(String), &directive))
        .field(def(name!("args"), ty!([__InputValue!]!), &directive))
        .field(def(name!("onOperation"), ty!(Boolean!), &directive))
        .field(def(name!("onFragment"), ty!(Boolean!), &directive))
        .field(def(name!("onField"), ty!(Boolean!), &directive));

    let kind = |name: Name, kind: TypeKind, description: &str| {
        EnumValueDefinition::new(name)
            .value(kind)
            .description(description)
    };
    let type_kind = EnumType::new(name!("__TypeKind"))
        .description("An enum describing what kind of type a given __Type is.")
        .value(kind(
            name!("SCALAR"),
            TypeKind::Scalar,
            "Indicates this type is a scalar.",
        ))
        .value(kind(
            name!("OBJECT"),
            TypeKind::Object,
            "Indicates this type is an object. `fields` and `interfaces` are valid fields.",
        ))
        .value(kind(
            name!("INTERFACE"),
            TypeKind::Interface,
            "Indicates this type is an interface. `fields` and `possibleTypes` are valid fields.",
        ))
        .value(kind(
            name!("UNION"),
            TypeKind::Union,
            "Indicates this type is a union. `possibleTypes` is a valid field.",
        ))
        .value(kind(
            name!("ENUM"),
            TypeKind::Enum,
            "Indicates this type is an enum. `enumValues` is a valid field.",
        ))
        .value(kind(
            name!("INPUT_OBJECT"),
            TypeKind::InputObject,
            "Indicates this type is an input object. `inputFields` is a valid field.",
        ))
        .value(kind(
            name!("LIST"),
            TypeKind::List,
            "Indicates this type is a list. `ofType` is a valid field.",
        ))
        .value(kind(
            name!("NON_NULL"),
            TypeKind::NonNull,
            "Indicates this type is a non-null. `ofType` is a valid field.",
        ));

    vec![
        ExtendedType::Object(Arc::new(schema_type)),
        ExtendedType::Object(Arc::new(type_type)),
        ExtendedType::Object(Arc::new(field_type)),
        ExtendedType::Object(Arc::new(input_value_type)),
        ExtendedType::Object(Arc::new(enum_value_type)),
        ExtendedType::Object(Arc::new(directive_type)),
        ExtendedType::Enum(Arc::new(type_kind)),
    ]
}

fn introspected<'a>(info: &ResolveInfo<'a>) -> Result<&'a Introspected, FieldError> {
    info.source().downcast_ref().ok_or_else(|| {
        FieldError::new(format!(
            "{} can only be resolved from an introspection field",
            info.parent_type().name
        ))
    })
}

fn named_type(name: &Name) -> Value {
    Introspected::Type(Type::Named(name.clone())).into()
}

fn include_deprecated(info: &ResolveInfo<'_>) -> bool {
    info.argument("includeDeprecated")
        .as_bool()
        .unwrap_or(false)
}

fn input_values(defs: &[InputValueDefinition]) -> Value {
    defs.iter()
        .map(|def| Value::from(Introspected::InputValue(def.clone())))
        .collect::<Vec<_>>()
        .into()
}

fn resolve_schema(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let schema = info.schema();
    Ok(match info.field_name().as_str() {
        "types" => schema
            .type_map()
            .keys()
            .map(named_type)
            .collect::<Vec<_>>()
            .into(),
        "queryType" => named_type(&schema.query_type.name),
        "mutationType" => schema
            .mutation_type
            .as_ref()
            .map(|def| named_type(&def.name))
            .into(),
        "directives" => schema
            .directives
            .values()
            .map(|def| Value::from(Introspected::Directive(def.clone())))
            .collect::<Vec<_>>()
            .into(),
        _ => Value::Null,
    })
}

fn resolve_type(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let Introspected::Type(ty) = introspected(info)? else {
        return Ok(Value::Null);
    };
    let field_name = info.field_name().as_str();
    // List and non-null wrappers only have `kind` and `ofType`
    let of_type = match ty {
        Type::Named(name) => {
            return Ok(match info.schema().types.get(name) {
                Some(def) => resolve_type_def(info, def),
                None => Value::Null,
            })
        }
        Type::NonNullNamed(name) => (TypeKind::NonNull, Type::Named(name.clone())),
        Type::NonNullList(inner) => (TypeKind::NonNull, Type::List(inner.clone())),
        Type::List(inner) => (TypeKind::List, (**inner).clone()),
    };
    Ok(match field_name {
        "kind" => of_type.0.into(),
        "ofType" => Introspected::Type(of_type.1).into(),
        _ => Value::Null,
    })
}

fn resolve_type_def(info: &ResolveInfo<'_>, def: &ExtendedType) -> Value {
    let schema = info.schema();
    match info.field_name().as_str() {
        "kind" => match def {
            ExtendedType::Scalar(_) => TypeKind::Scalar,
            ExtendedType::Object(_) => TypeKind::Object,
            ExtendedType::Interface(_) => TypeKind::Interface,
            ExtendedType::Union(_) => TypeKind::Union,
            ExtendedType::Enum(_) => TypeKind::Enum,
            ExtendedType::InputObject(_) => TypeKind::InputObject,
        }
        .into(),
        "name" => def.name().as_str().into(),
        "description" => def.description().into(),
        "fields" => {
            let Some(fields) = def.fields() else {
                return Value::Null;
            };
            let include_deprecated = include_deprecated(info);
            fields
                .values()
                .filter(|field| include_deprecated || field.deprecation_reason.is_none())
                .map(|field| Value::from(Introspected::Field(field.clone())))
                .collect::<Vec<_>>()
                .into()
        }
        "interfaces" => match def {
            ExtendedType::Object(def) => def
                .implements_interfaces
                .iter()
                .map(named_type)
                .collect::<Vec<_>>()
                .into(),
            _ => Value::Null,
        },
        "possibleTypes" if def.is_abstract() => schema
            .possible_types(def.name().as_str())
            .iter()
            .map(named_type)
            .collect::<Vec<_>>()
            .into(),
        "enumValues" => {
            let ExtendedType::Enum(def) = def else {
                return Value::Null;
            };
            let include_deprecated = include_deprecated(info);
            def.values
                .values()
                .filter(|value| include_deprecated || value.deprecation_reason.is_none())
                .map(|value| Value::from(Introspected::EnumValue(value.clone())))
                .collect::<Vec<_>>()
                .into()
        }
        "inputFields" => match def {
            ExtendedType::InputObject(def) => def
                .fields
                .values()
                .map(|field| Value::from(Introspected::InputValue(field.clone())))
                .collect::<Vec<_>>()
                .into(),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn resolve_field(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let Introspected::Field(def) = introspected(info)? else {
        return Ok(Value::Null);
    };
    Ok(match info.field_name().as_str() {
        "name" => def.name.as_str().into(),
        "description" => def.description.as_deref().into(),
        "args" => input_values(&def.arguments),
        "type" => Introspected::Type(def.ty.clone()).into(),
        "isDeprecated" => def.deprecation_reason.is_some().into(),
        "deprecationReason" => def.deprecation_reason.as_deref().into(),
        _ => Value::Null,
    })
}

fn resolve_input_value(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let Introspected::InputValue(def) = introspected(info)? else {
        return Ok(Value::Null);
    };
    Ok(match info.field_name().as_str() {
        "name" => def.name.as_str().into(),
        "description" => def.description.as_deref().into(),
        "type" => Introspected::Type(def.ty.clone()).into(),
        "defaultValue" => def
            .default_value
            .as_ref()
            .and_then(|value| serde_json::to_string(&value.to_json()).ok())
            .into(),
        _ => Value::Null,
    })
}

fn resolve_enum_value(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let Introspected::EnumValue(def) = introspected(info)? else {
        return Ok(Value::Null);
    };
    Ok(match info.field_name().as_str() {
        "name" => def.name.as_str().into(),
        "description" => def.description.as_deref().into(),
        "isDeprecated" => def.deprecation_reason.is_some().into(),
        "deprecationReason" => def.deprecation_reason.as_deref().into(),
        _ => Value::Null,
    })
}

fn resolve_directive(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let Introspected::Directive(def) = introspected(info)? else {
        return Ok(Value::Null);
    };
    Ok(match info.field_name().as_str() {
        "name" => def.name.as_str().into(),
        "description" => def.description.as_deref().into(),
        "args" => input_values(&def.arguments),
        "onOperation" => def.on_operation.into(),
        "onFragment" => def.on_fragment.into(),
        "onField" => def.on_field.into(),
        _ => Value::Null,
    })
}
