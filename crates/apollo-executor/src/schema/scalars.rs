//! Built-in scalar types: `Int`, `Float`, `String`, `Boolean`, `ID`

use super::ScalarCoercion;
use super::ScalarType;
use crate::Value;
use apollo_compiler::ast;
use apollo_compiler::name;

pub(crate) const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Constructed once per schema
pub(crate) fn built_in_scalars() -> [ScalarType; 5] {
    [
        ScalarType::new(name!("Int"), IntCoercion).description(
            "The `Int` scalar type represents non-fractional signed whole numeric values. \
             Int can represent values between -(2^31) and 2^31 - 1.",
        ),
        ScalarType::new(name!("Float"), FloatCoercion).description(
            "The `Float` scalar type represents signed double-precision fractional values.",
        ),
        ScalarType::new(name!("String"), StringCoercion).description(
            "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
        ),
        ScalarType::new(name!("Boolean"), BooleanCoercion)
            .description("The `Boolean` scalar type represents `true` or `false`."),
        ScalarType::new(name!("ID"), IdCoercion).description(
            "The `ID` scalar type represents a unique identifier, serialized as a string.",
        ),
    ]
}

struct IntCoercion;
struct FloatCoercion;
struct StringCoercion;
struct BooleanCoercion;
struct IdCoercion;

/// Numbers, booleans and numeric strings
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(value) => Some(*value as f64),
        Value::Float(value) => Some(*value),
        Value::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(value) => Some(*value),
        _ => {
            let float = to_f64(value)?.trunc();
            // `i64::MAX as f64` rounds up to 2^63, which is already out of range
            (float.is_finite() && float.abs() < i64::MAX as f64).then_some(float as i64)
        }
    }
}

impl ScalarCoercion for IntCoercion {
    fn coerce(&self, value: &Value) -> Option<Value> {
        to_i64(value).map(Value::Int)
    }

    fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        match value {
            ast::Value::Int(int) => int.as_str().parse::<i64>().ok().map(Value::Int),
            _ => None,
        }
    }
}

impl ScalarCoercion for FloatCoercion {
    fn coerce(&self, value: &Value) -> Option<Value> {
        to_f64(value).filter(|float| float.is_finite()).map(Value::Float)
    }

    fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        let float: f64 = match value {
            ast::Value::Int(int) => int.as_str().parse().ok()?,
            ast::Value::Float(float) => float.as_str().parse().ok()?,
            _ => return None,
        };
        float.is_finite().then_some(Value::Float(float))
    }
}

impl ScalarCoercion for StringCoercion {
    fn coerce(&self, value: &Value) -> Option<Value> {
        match value {
            Value::String(_) => Some(value.clone()),
            Value::Boolean(value) => Some(value.to_string().into()),
            Value::Int(value) => Some(value.to_string().into()),
            Value::Float(value) => Some(value.to_string().into()),
            _ => None,
        }
    }

    fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        match value {
            ast::Value::String(value) => Some(value.as_str().into()),
            _ => None,
        }
    }
}

impl ScalarCoercion for BooleanCoercion {
    fn coerce(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Boolean(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
                Some(Value::Boolean(value.is_truthy()))
            }
            _ => None,
        }
    }

    fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        match value {
            ast::Value::Boolean(value) => Some(Value::Boolean(*value)),
            _ => None,
        }
    }
}

impl ScalarCoercion for IdCoercion {
    fn coerce(&self, value: &Value) -> Option<Value> {
        match value {
            Value::String(_) => Some(value.clone()),
            Value::Int(value) => Some(value.to_string().into()),
            Value::Float(value) => Some(value.to_string().into()),
            _ => None,
        }
    }

    fn coerce_literal(&self, value: &ast::Value) -> Option<Value> {
        match value {
            ast::Value::String(value) => Some(value.as_str().into()),
            ast::Value::Int(value) => Some(value.as_str().into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_compiler::Node;

    fn int_literal(value: i32) -> ast::Value {
        ast::Value::from(value)
    }

    fn string_literal(value: &str) -> ast::Value {
        ast::Value::String(value.to_owned())
    }

    #[test]
    fn int_output_coercion() {
        assert_eq!(IntCoercion.coerce(&Value::Int(1)), Some(Value::Int(1)));
        assert_eq!(IntCoercion.coerce(&Value::Float(-1.9)), Some(Value::Int(-1)));
        assert_eq!(IntCoercion.coerce(&Value::Boolean(true)), Some(Value::Int(1)));
        assert_eq!(IntCoercion.coerce(&"12".into()), Some(Value::Int(12)));
        assert_eq!(IntCoercion.coerce(&"abc".into()), None);
        assert_eq!(
            IntCoercion.coerce(&Value::Int(9876504321)),
            Some(Value::Int(9876504321))
        );
        assert_eq!(
            IntCoercion.coerce(&Value::Float(-9876504321.0)),
            Some(Value::Int(-9876504321))
        );
        assert_eq!(IntCoercion.coerce(&Value::Float(1e100)), None);
        assert_eq!(IntCoercion.coerce(&Value::Float(-1e100)), None);
        assert_eq!(IntCoercion.coerce(&Value::Float(f64::NAN)), None);
        assert_eq!(IntCoercion.coerce(&Value::Null), None);
    }

    #[test]
    fn int_literal_coercion() {
        assert_eq!(IntCoercion.coerce_literal(&int_literal(42)), Some(Value::Int(42)));
        assert_eq!(
            IntCoercion.coerce_literal(&string_literal("42")),
            None
        );
    }

    #[test]
    fn float_coercion() {
        assert_eq!(FloatCoercion.coerce(&Value::Int(1)), Some(Value::Float(1.0)));
        assert_eq!(FloatCoercion.coerce(&"-1.1".into()), Some(Value::Float(-1.1)));
        assert_eq!(FloatCoercion.coerce(&"one".into()), None);
        assert_eq!(FloatCoercion.coerce_literal(&int_literal(2)), Some(Value::Float(2.0)));
    }

    #[test]
    fn string_coercion() {
        assert_eq!(StringCoercion.coerce(&"s".into()), Some("s".into()));
        assert_eq!(StringCoercion.coerce(&Value::Boolean(true)), Some("true".into()));
        assert_eq!(StringCoercion.coerce(&Value::Boolean(false)), Some("false".into()));
        assert_eq!(StringCoercion.coerce(&Value::Int(-1)), Some("-1".into()));
        assert_eq!(StringCoercion.coerce(&Value::Float(1.5)), Some("1.5".into()));
        assert_eq!(StringCoercion.coerce(&Value::List(vec![])), None);
        assert_eq!(StringCoercion.coerce_literal(&int_literal(1)), None);
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(BooleanCoercion.coerce(&Value::Int(0)), Some(Value::Boolean(false)));
        assert_eq!(BooleanCoercion.coerce(&"x".into()), Some(Value::Boolean(true)));
        assert_eq!(BooleanCoercion.coerce(&Value::Null), None);
        assert_eq!(
            BooleanCoercion.coerce_literal(&ast::Value::Boolean(true)),
            Some(Value::Boolean(true))
        );
        let list = ast::Value::List(vec![Node::new(ast::Value::Boolean(true))]);
        assert_eq!(BooleanCoercion.coerce_literal(&list), None);
    }

    #[test]
    fn id_coercion() {
        assert_eq!(IdCoercion.coerce(&Value::Int(4)), Some("4".into()));
        assert_eq!(IdCoercion.coerce_literal(&int_literal(4)), Some("4".into()));
        assert_eq!(
            IdCoercion.coerce_literal(&string_literal("a1")),
            Some("a1".into())
        );
        assert_eq!(IdCoercion.coerce_literal(&ast::Value::Boolean(true)), None);
    }
}
