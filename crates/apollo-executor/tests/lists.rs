use crate::run;
use apollo_compiler::name;
use apollo_compiler::ty;
use apollo_executor::schema::FieldDefinition;
use apollo_executor::schema::ObjectType;
use apollo_executor::schema::Schema;
use apollo_executor::schema::Type;
use apollo_executor::Value;
use pretty_assertions::assert_eq;
use serde_json::json;

/// Executes `{ nest { test } }` where `test` has type `ty` and resolves to `value`
fn check(ty: Type, value: Value, expected: serde_json::Value) {
    let schema = Schema::builder()
        .query_type(name!("Query"))
        .object(
            ObjectType::new(name!("Query"))
                .field(FieldDefinition::new(name!("nest"), ty!(DataType))),
        )
        .object(ObjectType::new(name!("DataType")).field(FieldDefinition::new(name!("test"), ty)))
        .build()
        .unwrap();
    let nest: Value = [("test", value)].into_iter().collect();
    let root_value: Value = [("nest", nest)].into_iter().collect();
    assert_eq!(run(&schema, root_value, "{ nest { test } }"), expected);
}

fn list(items: &[Option<i32>]) -> Value {
    items.iter().copied().collect::<Vec<_>>().into()
}

fn data(test: serde_json::Value) -> serde_json::Value {
    json!({"data": {"nest": {"test": test}}})
}

fn error(message: &str, path: serde_json::Value) -> serde_json::Value {
    json!({
        "message": message,
        "locations": [{"line": 1, "column": 10}],
        "path": path,
    })
}

const NON_NULL: &str = "Cannot return null for non-nullable type.";

#[test]
fn nullable_list_of_nullable_items() {
    check(ty!([Int]), list(&[Some(1), Some(2)]), data(json!([1, 2])));
    check(
        ty!([Int]),
        list(&[Some(1), None, Some(2)]),
        data(json!([1, null, 2])),
    );
    check(ty!([Int]), Value::Null, data(json!(null)));
}

#[test]
fn nullable_list_of_non_null_items() {
    check(ty!([Int!]), list(&[Some(1), Some(2)]), data(json!([1, 2])));
    check(
        ty!([Int!]),
        list(&[Some(1), None, Some(2)]),
        json!({
            "errors": [error(NON_NULL, json!(["nest", "test", 1]))],
            "data": {"nest": {"test": null}},
        }),
    );
    check(ty!([Int!]), Value::Null, data(json!(null)));
}

#[test]
fn non_null_list_of_nullable_items() {
    check(ty!([Int]!), list(&[Some(1), Some(2)]), data(json!([1, 2])));
    check(
        ty!([Int]!),
        list(&[Some(1), None, Some(2)]),
        data(json!([1, null, 2])),
    );
    check(
        ty!([Int]!),
        Value::Null,
        json!({
            "errors": [error(NON_NULL, json!(["nest", "test"]))],
            "data": {"nest": null},
        }),
    );
}

#[test]
fn non_null_list_of_non_null_items() {
    check(ty!([Int!]!), list(&[Some(1), Some(2)]), data(json!([1, 2])));
    check(
        ty!([Int!]!),
        list(&[Some(1), None, Some(2)]),
        json!({
            "errors": [error(NON_NULL, json!(["nest", "test", 1]))],
            "data": {"nest": null},
        }),
    );
    check(
        ty!([Int!]!),
        Value::Null,
        json!({
            "errors": [error(NON_NULL, json!(["nest", "test"]))],
            "data": {"nest": null},
        }),
    );
}

#[test]
fn nested_lists() {
    let nested = Value::from(vec![list(&[Some(1)]), Value::Null, list(&[Some(2), None])]);
    check(
        ty!([[Int]]),
        nested.clone(),
        data(json!([[1], null, [2, null]])),
    );
    check(
        ty!([[Int!]]!),
        nested,
        json!({
            "errors": [error(NON_NULL, json!(["nest", "test", 2, 1]))],
            "data": {"nest": {"test": [[1], null, null]}},
        }),
    );
}

#[test]
fn non_list_value_for_a_list_type() {
    check(
        ty!([Int]),
        Value::Int(5),
        json!({
            "errors": [error(
                "User Error: expected iterable, but did not find one.",
                json!(["nest", "test"]),
            )],
            "data": {"nest": {"test": null}},
        }),
    );
}
