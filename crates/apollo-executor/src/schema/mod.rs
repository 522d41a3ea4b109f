//! Type system definitions and the [`Schema`] registry
//!
//! Named types reference each other by [`Name`], so that recursive schemas
//! can be declared in any order.
//! References are resolved and checked once in [`SchemaBuilder::build`].

use crate::execution::introspection::MetaFields;
use crate::execution::FieldError;
use crate::execution::ResolveInfo;
use crate::execution::Resolver;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::Name;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

mod builder;
pub(crate) mod scalars;

pub use self::builder::SchemaBuilder;
pub use self::builder::SchemaError;

/// A type reference, such as `[Int!]!`.
///
/// A non-null type always wraps a named type or a list type.
pub type Type = ast::Type;

/// A named type definition, as found in the schema registry
#[derive(Debug, Clone)]
pub enum ExtendedType {
    Scalar(Arc<ScalarType>),
    Object(Arc<ObjectType>),
    Interface(Arc<InterfaceType>),
    Union(Arc<UnionType>),
    Enum(Arc<EnumType>),
    InputObject(Arc<InputObjectType>),
}

/// Coercion rules of a custom scalar type
pub trait ScalarCoercion: Send + Sync {
    /// Coerce a runtime value, for output or for variable input.
    /// `None` means the value cannot be represented in this scalar type.
    fn coerce(&self, value: &Value) -> Option<Value>;

    /// Coerce a literal found in a query document
    fn coerce_literal(&self, value: &ast::Value) -> Option<Value>;
}

impl fmt::Debug for dyn ScalarCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScalarCoercion(..)")
    }
}

#[derive(Debug, Clone)]
pub struct ScalarType {
    pub name: Name,
    pub description: Option<String>,
    pub coercion: Arc<dyn ScalarCoercion>,
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: Name,
    pub description: Option<String>,
    pub values: IndexMap<Name, EnumValueDefinition>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub name: Name,
    pub description: Option<String>,
    /// The runtime value that resolvers return for this enum value.
    /// Defaults to the name as a string.
    pub value: Value,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub implements_interfaces: Vec<Name>,
    pub fields: IndexMap<Name, FieldDefinition>,
    pub is_type_of: Option<IsTypeOf>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, FieldDefinition>,
    pub resolve_type: Option<TypeResolver>,
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub name: Name,
    pub description: Option<String>,
    pub members: Vec<Name>,
    pub resolve_type: Option<TypeResolver>,
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub name: Name,
    pub description: Option<String>,
    pub fields: IndexMap<Name, InputValueDefinition>,
}

/// A field of an object or interface type
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    /// When `None`, the default resolver reads a same-named member of the source value
    pub resolver: Option<Arc<dyn Resolver>>,
    /// Passed as-is to the resolver through [`ResolveInfo::resolver_data`]
    pub resolver_data: Value,
    pub deprecation_reason: Option<String>,
}

/// A field argument, directive argument, or input object field
#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub ty: Type,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub name: Name,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDefinition>,
    pub on_operation: bool,
    pub on_fragment: bool,
    pub on_field: bool,
}

type IsTypeOfFn = dyn Fn(&Value) -> bool + Send + Sync;
type TypeResolverFn = dyn Fn(&Value) -> Option<Name> + Send + Sync;

/// Predicate telling whether a runtime value belongs to an object type
#[derive(Clone)]
pub struct IsTypeOf(Arc<IsTypeOfFn>);

/// Callback naming the object type of a runtime value of an abstract type
#[derive(Clone)]
pub struct TypeResolver(Arc<TypeResolverFn>);

/// A registry of named types, with query and mutation root types.
///
/// Built with [`Schema::builder`]. Immutable afterwards.
pub struct Schema {
    pub(crate) types: IndexMap<Name, ExtendedType>,
    pub(crate) directives: IndexMap<Name, DirectiveDefinition>,
    pub(crate) query_type: Arc<ObjectType>,
    pub(crate) mutation_type: Option<Arc<ObjectType>>,
    /// Keys are interface and union names, values are object type names
    pub(crate) possible_types: HashMap<Name, Vec<Name>>,
    pub(crate) meta_fields: MetaFields,
    type_map: OnceLock<IndexMap<Name, ExtendedType>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn query_type(&self) -> &Arc<ObjectType> {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&Arc<ObjectType>> {
        self.mutation_type.as_ref()
    }

    /// Every type definition registered with the builder,
    /// plus built-in scalars and introspection types, in registration order.
    pub fn types(&self) -> &IndexMap<Name, ExtendedType> {
        &self.types
    }

    pub fn directives(&self) -> &IndexMap<Name, DirectiveDefinition> {
        &self.directives
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDefinition> {
        self.directives.get(name)
    }

    /// Looks up a type reachable from the root types, by name
    pub fn get_type(&self, name: &str) -> Option<&ExtendedType> {
        self.type_map().get(name)
    }

    pub fn get_object(&self, name: &str) -> Option<&Arc<ObjectType>> {
        match self.types.get(name)? {
            ExtendedType::Object(def) => Some(def),
            _ => None,
        }
    }

    /// Object types that an interface or union type can resolve to
    pub fn possible_types(&self, abstract_type: &str) -> &[Name] {
        self.possible_types
            .get(abstract_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_possible_type(&self, abstract_type: &str, object_type: &str) -> bool {
        self.possible_types(abstract_type)
            .iter()
            .any(|name| name.as_str() == object_type)
    }

    /// Types reachable from the query root, the mutation root and `__Schema`,
    /// plus built-in scalars.
    ///
    /// Computed on first use.
    pub fn type_map(&self) -> &IndexMap<Name, ExtendedType> {
        self.type_map.get_or_init(|| {
            let mut map = IndexMap::new();
            self.collect_reachable(self.query_type.name.as_str(), &mut map);
            if let Some(mutation_type) = &self.mutation_type {
                self.collect_reachable(mutation_type.name.as_str(), &mut map);
            }
            self.collect_reachable("__Schema", &mut map);
            for name in scalars::BUILT_IN_SCALARS {
                if let Some((name, def)) = self.types.get_key_value(name) {
                    map.entry(name.clone()).or_insert_with(|| def.clone());
                }
            }
            map
        })
    }

    fn collect_reachable(&self, name: &str, map: &mut IndexMap<Name, ExtendedType>) {
        let Some((name, def)) = self.types.get_key_value(name) else {
            return;
        };
        if map.contains_key(name) {
            return;
        }
        map.insert(name.clone(), def.clone());
        match def {
            ExtendedType::Interface(_) | ExtendedType::Union(_) => {
                for possible in self.possible_types(name) {
                    self.collect_reachable(possible.as_str(), map)
                }
            }
            _ => {}
        }
        if let ExtendedType::Object(def) = def {
            for interface in &def.implements_interfaces {
                self.collect_reachable(interface.as_str(), map)
            }
        }
        let fields = match def {
            ExtendedType::Object(def) => &def.fields,
            ExtendedType::Interface(def) => &def.fields,
            ExtendedType::InputObject(def) => {
                for field in def.fields.values() {
                    self.collect_reachable(field.ty.inner_named_type().as_str(), map)
                }
                return;
            }
            _ => return,
        };
        for field in fields.values() {
            for arg in &field.arguments {
                self.collect_reachable(arg.ty.inner_named_type().as_str(), map)
            }
            self.collect_reachable(field.ty.inner_named_type().as_str(), map)
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("query_type", &self.query_type.name)
            .field(
                "mutation_type",
                &self.mutation_type.as_ref().map(|def| &def.name),
            )
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) => &def.name,
            Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(def) => def.description.as_deref(),
            Self::Object(def) => def.description.as_deref(),
            Self::Interface(def) => def.description.as_deref(),
            Self::Union(def) => def.description.as_deref(),
            Self::Enum(def) => def.description.as_deref(),
            Self::InputObject(def) => def.description.as_deref(),
        }
    }

    /// Fields of an object or interface type
    pub fn fields(&self) -> Option<&IndexMap<Name, FieldDefinition>> {
        match self {
            Self::Object(def) => Some(&def.fields),
            Self::Interface(def) => Some(&def.fields),
            _ => None,
        }
    }

    /// Returns whether this type can be used for arguments and variables
    pub fn is_input_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Returns whether this type can be used for fields
    pub fn is_output_type(&self) -> bool {
        !matches!(self, Self::InputObject(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }
}

impl ScalarType {
    pub fn new(name: Name, coercion: impl ScalarCoercion + 'static) -> Self {
        Self {
            name,
            description: None,
            coercion: Arc::new(coercion),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn coerce(&self, value: &Value) -> Option<Value> {
        self.coercion.coerce(value)
    }

    pub fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        self.coercion.coerce_literal(value)
    }
}

impl EnumType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            values: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn value(mut self, value: EnumValueDefinition) -> Self {
        self.values.insert(value.name.clone(), value);
        self
    }

    /// Serializes a runtime value to the name of the enum value with that internal value
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        self.values
            .values()
            .find(|def| def.value == *value)
            .map(|def| def.name.as_str().into())
    }

    /// Looks up an enum literal by name
    pub fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        match value {
            ast::Value::Enum(name) => self
                .values
                .get_key_value(name.as_str())
                .map(|(name, _)| name.as_str().into()),
            _ => None,
        }
    }
}

impl EnumValueDefinition {
    pub fn new(name: Name) -> Self {
        Self {
            value: name.as_str().into(),
            name,
            description: None,
            deprecation_reason: None,
        }
    }

    /// Sets the internal value
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }
}

impl ObjectType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            implements_interfaces: Vec::new(),
            fields: IndexMap::new(),
            is_type_of: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn implements(mut self, interface: Name) -> Self {
        self.implements_interfaces.push(interface);
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn is_type_of(mut self, predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.is_type_of = Some(IsTypeOf(Arc::new(predicate)));
        self
    }
}

impl InterfaceType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            fields: IndexMap::new(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn resolve_type(
        mut self,
        resolver: impl Fn(&Value) -> Option<Name> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(TypeResolver(Arc::new(resolver)));
        self
    }
}

impl UnionType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            members: Vec::new(),
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, member: Name) -> Self {
        self.members.push(member);
        self
    }

    pub fn resolve_type(
        mut self,
        resolver: impl Fn(&Value) -> Option<Name> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(TypeResolver(Arc::new(resolver)));
        self
    }
}

impl InputObjectType {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: InputValueDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

impl FieldDefinition {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            description: None,
            arguments: Vec::new(),
            ty,
            resolver: None,
            resolver_data: Value::Null,
            deprecation_reason: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets a resolver closure.
    ///
    /// ```
    /// use apollo_compiler::{name, ty};
    /// use apollo_executor::schema::FieldDefinition;
    ///
    /// let hello = FieldDefinition::new(name!("hello"), ty!(String))
    ///     .resolve(|_info| Ok("world".into()));
    /// ```
    pub fn resolve(
        self,
        resolver: impl Fn(&ResolveInfo<'_>) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.resolver(Arc::new(resolver))
    }

    pub fn resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn resolver_data(mut self, data: impl Into<Value>) -> Self {
        self.resolver_data = data.into();
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn argument_by_name(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|arg| arg.name.as_str() == name)
    }
}

impl InputValueDefinition {
    pub fn new(name: Name, ty: Type) -> Self {
        Self {
            name,
            description: None,
            ty,
            default_value: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl DirectiveDefinition {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: None,
            arguments: Vec::new(),
            on_operation: false,
            on_fragment: false,
            on_field: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn on_operation(mut self) -> Self {
        self.on_operation = true;
        self
    }

    pub fn on_fragment(mut self) -> Self {
        self.on_fragment = true;
        self
    }

    pub fn on_field(mut self) -> Self {
        self.on_field = true;
        self
    }
}

impl IsTypeOf {
    pub fn check(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl TypeResolver {
    pub fn resolve(&self, value: &Value) -> Option<Name> {
        (self.0)(value)
    }
}

impl fmt::Debug for IsTypeOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IsTypeOf(..)")
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeResolver(..)")
    }
}
