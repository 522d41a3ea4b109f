use super::scalars;
use super::DirectiveDefinition;
use super::EnumType;
use super::ExtendedType;
use super::FieldDefinition;
use super::InputObjectType;
use super::InputValueDefinition;
use super::InterfaceType;
use super::ObjectType;
use super::ScalarType;
use super::Schema;
use super::UnionType;
use crate::execution::introspection;
use apollo_compiler::name;
use apollo_compiler::ty;
use apollo_compiler::Name;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

/// Collects type definitions for a [`Schema`].
///
/// ```
/// use apollo_compiler::{name, ty};
/// use apollo_executor::schema::{FieldDefinition, ObjectType, Schema};
///
/// let schema = Schema::builder()
///     .query_type(name!("Query"))
///     .object(
///         ObjectType::new(name!("Query"))
///             .field(FieldDefinition::new(name!("hello"), ty!(String))),
///     )
///     .build()
///     .unwrap();
/// assert!(schema.get_type("Query").is_some());
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    query_type: Option<Name>,
    mutation_type: Option<Name>,
    types: Vec<ExtendedType>,
    directives: Vec<DirectiveDefinition>,
}

/// Returned by [`SchemaBuilder::build`] when type definitions are inconsistent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("the query root type is not set")]
    MissingQueryType,
    #[error("root operation type `{0}` must be an object type")]
    RootNotObject(Name),
    #[error("type `{0}` is defined more than once")]
    DuplicateType(Name),
    #[error("type name `{0}` must not begin with `__`, which is reserved for introspection")]
    ReservedName(Name),
    #[error("directive `@{0}` is defined more than once")]
    DuplicateDirective(Name),
    #[error("`{coordinate}` refers to undefined type `{name}`")]
    UndefinedType { coordinate: String, name: Name },
    #[error("union `{union}` may only contain object types, found `{member}`")]
    UnionMemberNotObject { union: Name, member: Name },
    #[error("`{object}` can only implement interface types, found `{name}`")]
    NotAnInterface { object: Name, name: Name },
    #[error("`{coordinate}` must have an output type, found input object `{name}`")]
    NotOutputType { coordinate: String, name: Name },
    #[error("`{coordinate}` must have an input type, found `{name}`")]
    NotInputType { coordinate: String, name: Name },
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_type(mut self, name: Name) -> Self {
        self.query_type = Some(name);
        self
    }

    pub fn mutation_type(mut self, name: Name) -> Self {
        self.mutation_type = Some(name);
        self
    }

    pub fn add_type(mut self, def: ExtendedType) -> Self {
        self.types.push(def);
        self
    }

    pub fn scalar(self, def: ScalarType) -> Self {
        self.add_type(ExtendedType::Scalar(Arc::new(def)))
    }

    pub fn object(self, def: ObjectType) -> Self {
        self.add_type(ExtendedType::Object(Arc::new(def)))
    }

    pub fn interface(self, def: InterfaceType) -> Self {
        self.add_type(ExtendedType::Interface(Arc::new(def)))
    }

    pub fn union(self, def: UnionType) -> Self {
        self.add_type(ExtendedType::Union(Arc::new(def)))
    }

    pub fn enum_type(self, def: EnumType) -> Self {
        self.add_type(ExtendedType::Enum(Arc::new(def)))
    }

    pub fn input_object(self, def: InputObjectType) -> Self {
        self.add_type(ExtendedType::InputObject(Arc::new(def)))
    }

    /// Adds a custom directive. Only `@skip` and `@include` affect execution.
    pub fn directive(mut self, def: DirectiveDefinition) -> Self {
        self.directives.push(def);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        if let Some(def) = self.types.iter().find(|def| def.name().starts_with("__")) {
            return Err(SchemaError::ReservedName(def.name().clone()));
        }
        let mut types = IndexMap::with_capacity(self.types.len());
        for def in self.types.into_iter().chain(introspection::meta_types()) {
            let name = def.name().clone();
            if types.insert(name.clone(), def).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }
        // User-defined scalars may replace built-in ones
        for def in scalars::built_in_scalars() {
            types
                .entry(def.name.clone())
                .or_insert_with(|| ExtendedType::Scalar(Arc::new(def)));
        }

        let mut directives = IndexMap::new();
        for def in built_in_directives().into_iter().chain(self.directives) {
            let name = def.name.clone();
            if directives.insert(name.clone(), def).is_some() {
                return Err(SchemaError::DuplicateDirective(name));
            }
        }

        check_references(&types, &directives)?;

        let query_type = self.query_type.ok_or(SchemaError::MissingQueryType)?;
        let query_type = root_object_type(&types, query_type)?;
        let mutation_type = self
            .mutation_type
            .map(|name| root_object_type(&types, name))
            .transpose()?;

        let mut possible_types = HashMap::<Name, Vec<Name>>::new();
        for def in types.values() {
            match def {
                ExtendedType::Object(def) => {
                    for interface in &def.implements_interfaces {
                        possible_types
                            .entry(interface.clone())
                            .or_default()
                            .push(def.name.clone())
                    }
                }
                ExtendedType::Union(def) => {
                    possible_types
                        .entry(def.name.clone())
                        .or_default()
                        .extend(def.members.iter().cloned());
                }
                _ => {}
            }
        }

        Ok(Schema {
            types,
            directives,
            query_type,
            mutation_type,
            possible_types,
            meta_fields: introspection::meta_fields(),
            type_map: OnceLock::new(),
        })
    }
}

fn root_object_type(
    types: &IndexMap<Name, ExtendedType>,
    name: Name,
) -> Result<Arc<ObjectType>, SchemaError> {
    match types.get(&name) {
        Some(ExtendedType::Object(def)) => Ok(def.clone()),
        Some(_) => Err(SchemaError::RootNotObject(name)),
        None => Err(SchemaError::UndefinedType {
            coordinate: "schema".to_owned(),
            name,
        }),
    }
}

fn built_in_directives() -> [DirectiveDefinition; 2] {
    let condition = |description: &str| {
        InputValueDefinition::new(name!("if"), ty!(Boolean!)).description(description)
    };
    [
        DirectiveDefinition::new(name!("include"))
            .description(
                "Directs the executor to include this field or fragment only when the `if` argument is true.",
            )
            .argument(condition("Included when true."))
            .on_fragment()
            .on_field(),
        DirectiveDefinition::new(name!("skip"))
            .description(
                "Directs the executor to skip this field or fragment when the `if` argument is true.",
            )
            .argument(condition("Skipped when true."))
            .on_fragment()
            .on_field(),
    ]
}

fn check_references(
    types: &IndexMap<Name, ExtendedType>,
    directives: &IndexMap<Name, DirectiveDefinition>,
) -> Result<(), SchemaError> {
    let lookup = |coordinate: &dyn Fn() -> String, name: &Name| {
        types.get(name).ok_or_else(|| SchemaError::UndefinedType {
            coordinate: coordinate(),
            name: name.clone(),
        })
    };
    let check_input = |coordinate: &dyn Fn() -> String,
                       def: &InputValueDefinition|
     -> Result<(), SchemaError> {
        let name = def.ty.inner_named_type();
        if lookup(coordinate, name)?.is_input_type() {
            Ok(())
        } else {
            Err(SchemaError::NotInputType {
                coordinate: coordinate(),
                name: name.clone(),
            })
        }
    };
    let check_fields = |parent: &Name,
                        fields: &IndexMap<Name, FieldDefinition>|
     -> Result<(), SchemaError> {
        for field in fields.values() {
            let coordinate = || format!("{parent}.{}", field.name);
            let name = field.ty.inner_named_type();
            if !lookup(&coordinate, name)?.is_output_type() {
                return Err(SchemaError::NotOutputType {
                    coordinate: coordinate(),
                    name: name.clone(),
                });
            }
            for arg in &field.arguments {
                check_input(&|| format!("{parent}.{}({}:)", field.name, arg.name), arg)?;
            }
        }
        Ok(())
    };

    for def in types.values() {
        match def {
            ExtendedType::Scalar(_) | ExtendedType::Enum(_) => {}
            ExtendedType::Object(def) => {
                for interface in &def.implements_interfaces {
                    let coordinate = || def.name.to_string();
                    if !matches!(
                        lookup(&coordinate, interface)?,
                        ExtendedType::Interface(_)
                    ) {
                        return Err(SchemaError::NotAnInterface {
                            object: def.name.clone(),
                            name: interface.clone(),
                        });
                    }
                }
                check_fields(&def.name, &def.fields)?
            }
            ExtendedType::Interface(def) => check_fields(&def.name, &def.fields)?,
            ExtendedType::Union(def) => {
                for member in &def.members {
                    let coordinate = || def.name.to_string();
                    if !matches!(lookup(&coordinate, member)?, ExtendedType::Object(_)) {
                        return Err(SchemaError::UnionMemberNotObject {
                            union: def.name.clone(),
                            member: member.clone(),
                        });
                    }
                }
            }
            ExtendedType::InputObject(def) => {
                for field in def.fields.values() {
                    check_input(&|| format!("{}.{}", def.name, field.name), field)?
                }
            }
        }
    }
    for def in directives.values() {
        for arg in &def.arguments {
            check_input(&|| format!("@{}({}:)", def.name, arg.name), arg)?
        }
    }
    Ok(())
}
