use crate::schema::FieldDefinition;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::Type;
use crate::value::Member;
use crate::JsonMap;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::Name;
use apollo_compiler::Node;
use indexmap::IndexMap;

/// Coerced argument values of a field, for every declared argument in declaration order
pub type Arguments = IndexMap<Name, Value>;

/// Produces the raw value of a field, before it is completed against the field type.
///
/// Implemented for closures taking a [`ResolveInfo`].
pub trait Resolver: Send + Sync {
    fn resolve(&self, info: &ResolveInfo<'_>) -> Result<Value, FieldError>;
}

impl<F> Resolver for F
where
    F: Fn(&ResolveInfo<'_>) -> Result<Value, FieldError> + Send + Sync,
{
    fn resolve(&self, info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
        self(info)
    }
}

impl std::fmt::Debug for dyn Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// Everything a [`Resolver`] knows about the field being resolved
pub struct ResolveInfo<'a> {
    pub(crate) source: &'a Value,
    pub(crate) arguments: &'a Arguments,
    pub(crate) root_value: &'a Value,
    pub(crate) operation: &'a Node<ast::OperationDefinition>,
    pub(crate) fields: &'a [&'a Node<ast::Field>],
    pub(crate) field_definition: &'a FieldDefinition,
    pub(crate) parent_type: &'a ObjectType,
    pub(crate) schema: &'a Schema,
}

/// A field error returned by a resolver.
///
/// The message is reported as-is in the response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    /// Added to the `extensions` of the response error
    pub extensions: JsonMap,
}

impl<'a> ResolveInfo<'a> {
    /// The parent value that this field is resolved on
    pub fn source(&self) -> &'a Value {
        self.source
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    /// Returns the coerced value of an argument, or null if it was not declared
    pub fn argument(&self, name: &str) -> &'a Value {
        const NULL: &Value = &Value::Null;
        self.arguments.get(name).unwrap_or(NULL)
    }

    /// The value that execution of the operation started with
    pub fn root_value(&self) -> &'a Value {
        self.root_value
    }

    /// The operation being executed
    pub fn operation(&self) -> &'a Node<ast::OperationDefinition> {
        self.operation
    }

    /// The first field node in the query document with this field's response key
    pub fn field(&self) -> &'a Node<ast::Field> {
        self.fields[0]
    }

    /// Every field node in the query document with this field's response key
    pub fn fields(&self) -> &'a [&'a Node<ast::Field>] {
        self.fields
    }

    pub fn field_name(&self) -> &'a Name {
        &self.field_definition.name
    }

    pub fn field_definition(&self) -> &'a FieldDefinition {
        self.field_definition
    }

    pub fn return_type(&self) -> &'a Type {
        &self.field_definition.ty
    }

    pub fn parent_type(&self) -> &'a ObjectType {
        self.parent_type
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Opaque data attached to the field definition
    pub fn resolver_data(&self) -> &'a Value {
        &self.field_definition.resolver_data
    }
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: JsonMap::new(),
        }
    }

    pub fn with_extension(
        mut self,
        key: impl Into<serde_json_bytes::ByteString>,
        value: impl Into<crate::JsonValue>,
    ) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Used for fields without an explicit resolver.
///
/// Reads the same-named key of a map, or member of an object.
/// Methods are called with the source as argument.
/// A member named `ofType` is never read from an object.
pub(crate) fn default_resolve(info: &ResolveInfo<'_>) -> Result<Value, FieldError> {
    let name = info.field_name().as_str();
    match info.source() {
        Value::Map(map) => Ok(map.get(name).cloned().unwrap_or_default()),
        Value::Object(object) if name != "ofType" => match object.member(name) {
            Some(Member::Property(value)) => Ok(value),
            Some(Member::Method(method)) => method.call(info.source()),
            None => Ok(Value::Null),
        },
        _ => Ok(Value::Null),
    }
}
