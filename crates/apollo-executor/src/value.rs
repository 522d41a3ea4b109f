//! Runtime values produced by resolvers and consumed by input coercion.

use crate::execution::FieldError;
use crate::JsonMap;
use crate::JsonValue;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An ordered map with string keys, as found in [`Value::Map`]
pub type ValueMap = IndexMap<String, Value>;

/// A dynamically-typed value flowing through resolvers.
///
/// Scalars, lists and maps are plain data.
/// Application objects that need callable members or runtime type checks
/// are wrapped in [`Value::Object`].
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Object(Arc<dyn Source>),
}

/// An application object that the default resolver can read members from.
pub trait Source: fmt::Debug + Send + Sync + 'static {
    /// Returns the member with the given name, if any
    fn member(&self, name: &str) -> Option<Member>;

    /// Used by `is_type_of` predicates to downcast to the concrete type.
    /// Implementations return `self`.
    fn as_any(&self) -> &dyn Any;
}

/// What the default resolver finds when looking up a field name on a [`Source`]
#[derive(Clone, Debug)]
pub enum Member {
    /// Returned as-is
    Property(Value),
    /// Invoked with the source value as its sole argument
    Method(Method),
}

type MethodFn = dyn Fn(&Value) -> Result<Value, FieldError> + Send + Sync;

/// A callable member of a [`Source`]
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    pub fn new(
        method: impl Fn(&Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(method))
    }

    pub fn call(&self, source: &Value) -> Result<Value, FieldError> {
        (self.0)(source)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// A ready-made [`Source`] with ordered properties and methods.
///
/// ```
/// use apollo_executor::{Record, Value};
///
/// let record = Record::new()
///     .property("a", "Apple")
///     .method("b", |_source: &Value| Ok("Banana".into()));
/// let source = Value::object(record);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Record {
    members: IndexMap<String, Member>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members
            .insert(name.into(), Member::Property(value.into()));
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Value) -> Result<Value, FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.members
            .insert(name.into(), Member::Method(Method::new(method)));
        self
    }
}

impl Source for Record {
    fn member(&self, name: &str) -> Option<Member> {
        self.members.get(name).cloned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Value {
    pub fn object(source: impl Source) -> Self {
        Self::Object(Arc::new(source))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// If this is a [`Value::Object`] of type `T`, returns a reference to it
    pub fn downcast_ref<T: Source>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Truthiness: false for null, `false`, zero, empty strings and `"0"`, empty lists and maps
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::String(value) => !value.is_empty() && value != "0",
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Converts plain data to JSON.
    ///
    /// Opaque objects have no JSON representation and become null,
    /// as do non-finite floats.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null | Value::Object(_) => JsonValue::Null,
            Value::Boolean(value) => (*value).into(),
            Value::Int(value) => (*value).into(),
            Value::Float(value) => (*value).into(),
            Value::String(value) => value.as_str().into(),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, value)| (key.as_str().into(), value.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(value) => Value::Boolean(*value),
            JsonValue::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Value::Int(int)
                } else {
                    Value::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(value) => Value::String(value.as_str().to_owned()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Map(Self::map_from_json(map)),
        }
    }

    pub(crate) fn map_from_json(map: &JsonMap) -> ValueMap {
        map.iter()
            .map(|(key, value)| (key.as_str().to_owned(), Value::from_json(value)))
            .collect()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Boolean(value) => fmt::Debug::fmt(value, f),
            Value::Int(value) => fmt::Debug::fmt(value, f),
            Value::Float(value) => fmt::Debug::fmt(value, f),
            Value::String(value) => fmt::Debug::fmt(value, f),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map).finish(),
            Value::Object(object) => fmt::Debug::fmt(object, f),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        Value::from_json(json)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json_bytes::json;

    #[derive(Debug)]
    struct Dog;

    impl Source for Dog {
        fn member(&self, _name: &str) -> Option<Member> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn json_conversion_keeps_order_and_types() {
        let json = json!({"z": 1, "a": [true, null, 1.5, "s"], "m": {"k": "v"}});
        let value = Value::from_json(&json);
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(value.as_map().unwrap()["z"], Value::Int(1));
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(Dog);
        let b = Value::object(Dog);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.downcast_ref::<Dog>().is_some());
        assert!(Value::from("Dog").downcast_ref::<Dog>().is_none());
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("false").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(Value::object(Dog).is_truthy());
    }

    #[test]
    fn record_members() {
        let record = Record::new()
            .property("a", "Apple")
            .method("b", |_| Ok("Banana".into()));
        assert!(matches!(record.member("a"), Some(Member::Property(Value::String(s))) if s == "Apple"));
        let Some(Member::Method(method)) = record.member("b") else {
            panic!("expected a method")
        };
        assert_eq!(method.call(&Value::Null).unwrap(), Value::from("Banana"));
        assert!(record.member("c").is_none());
    }
}
