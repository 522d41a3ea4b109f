use crate::json_map;
use crate::run;
use crate::run_with;
use apollo_compiler::name;
use apollo_compiler::ty;
use apollo_compiler::Name;
use apollo_executor::schema::FieldDefinition;
use apollo_executor::schema::InputObjectType;
use apollo_executor::schema::InputValueDefinition;
use apollo_executor::schema::ObjectType;
use apollo_executor::schema::Schema;
use apollo_executor::schema::Type;
use apollo_executor::serde_json_bytes::json as bytes_json;
use apollo_executor::Execution;
use apollo_executor::Value;
use pretty_assertions::assert_eq;
use serde_json::json;

/// A field returning its `input` argument serialized as JSON
fn echo(name: Name, ty: Type) -> FieldDefinition {
    FieldDefinition::new(name, ty!(String))
        .argument(InputValueDefinition::new(name!("input"), ty))
        .resolve(|info| Ok(serde_json::to_string(&info.argument("input").to_json()).unwrap().into()))
}

fn schema() -> Schema {
    let test_input_object = InputObjectType::new(name!("TestInputObject"))
        .field(InputValueDefinition::new(name!("a"), ty!(String)))
        .field(InputValueDefinition::new(name!("b"), ty!([String])))
        .field(InputValueDefinition::new(name!("c"), ty!(String!)));
    let test_type = ObjectType::new(name!("TestType"))
        .field(echo(name!("fieldWithObjectInput"), ty!(TestInputObject)))
        .field(echo(name!("fieldWithNullableStringInput"), ty!(String)))
        .field(echo(name!("fieldWithNonNullableStringInput"), ty!(String!)))
        .field(
            FieldDefinition::new(name!("fieldWithDefaultArgumentValue"), ty!(String))
                .argument(
                    InputValueDefinition::new(name!("input"), ty!(String))
                        .default_value("Hello World"),
                )
                .resolve(|info| {
                    Ok(serde_json::to_string(&info.argument("input").to_json()).unwrap().into())
                }),
        )
        .field(echo(name!("list"), ty!([String])))
        .field(echo(name!("nnList"), ty!([String]!)))
        .field(echo(name!("listNN"), ty!([String!])));
    Schema::builder()
        .query_type(name!("TestType"))
        .input_object(test_input_object)
        .object(test_type)
        .build()
        .unwrap()
}

fn run_with_variables(query: &str, variables: apollo_executor::JsonValue) -> serde_json::Value {
    let execution = Execution::new().variable_values(json_map(variables));
    run_with(&schema(), execution, query)
}

fn invalid_variable(name: &str, column: usize) -> serde_json::Value {
    json!({
        "errors": [{
            "message": format!("Variable \"${name}\" expected value of different type."),
            "locations": [{"line": 1, "column": column}],
        }],
    })
}

#[test]
fn executes_with_complex_input_literals() {
    let query = r#"{ fieldWithObjectInput(input: {a: "foo", b: ["bar"], c: "baz"}) }"#;
    assert_eq!(
        run(&schema(), Value::Null, query),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}})
    );
}

#[test]
fn properly_coerces_single_value_to_list_in_literals() {
    let query = r#"{ fieldWithObjectInput(input: {a: "foo", b: "bar", c: "baz"}) }"#;
    assert_eq!(
        run(&schema(), Value::Null, query),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}})
    );
}

#[test]
fn input_object_fields_follow_declaration_order() {
    let query = r#"{ fieldWithObjectInput(input: {c: "baz", a: "foo"}) }"#;
    assert_eq!(
        run(&schema(), Value::Null, query),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":null,"c":"baz"}"#}})
    );
}

#[test]
fn executes_with_complex_input_variables() {
    let query = "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }";
    let response = run_with_variables(
        query,
        bytes_json!({"input": {"a": "foo", "b": ["bar"], "c": "baz"}}),
    );
    assert_eq!(
        response,
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}})
    );

    let response = run_with_variables(query, bytes_json!({"input": {"a": "foo", "b": "bar", "c": "baz"}}));
    assert_eq!(
        response,
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}})
    );
}

#[test]
fn uses_the_variable_default_value_when_not_provided() {
    let query = r#"
        query q($input: TestInputObject = {a: "foo", b: ["bar"], c: "baz"}) {
            fieldWithObjectInput(input: $input)
        }
    "#;
    assert_eq!(
        run_with_variables(query, bytes_json!({})),
        json!({"data": {"fieldWithObjectInput": r#"{"a":"foo","b":["bar"],"c":"baz"}"#}})
    );
}

#[test]
fn errors_on_null_for_nested_non_null() {
    let query = "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }";
    let response = run_with_variables(
        query,
        bytes_json!({"input": {"a": "foo", "b": "bar", "c": null}}),
    );
    assert_eq!(response, invalid_variable("input", 9));
}

#[test]
fn errors_on_incorrect_type() {
    let query = "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }";
    let response = run_with_variables(query, bytes_json!({"input": "foo bar"}));
    assert_eq!(response, invalid_variable("input", 9));
}

#[test]
fn errors_on_omission_of_nested_non_null() {
    let query = "query q($input: TestInputObject) { fieldWithObjectInput(input: $input) }";
    let response = run_with_variables(query, bytes_json!({"input": {"a": "foo", "b": "bar"}}));
    assert_eq!(response, invalid_variable("input", 9));
}

#[test]
fn nullable_inputs_allow_absent_and_null_values() {
    let query = "query q($value: String) { fieldWithNullableStringInput(input: $value) }";
    let expected = json!({"data": {"fieldWithNullableStringInput": "null"}});
    assert_eq!(run_with_variables(query, bytes_json!({})), expected);
    assert_eq!(run_with_variables(query, bytes_json!({"value": null})), expected);
    assert_eq!(
        run(&schema(), Value::Null, "{ fieldWithNullableStringInput }"),
        expected
    );
    assert_eq!(
        run(&schema(), Value::Null, "{ fieldWithNullableStringInput(input: null) }"),
        expected
    );
    // Not declared by the operation
    assert_eq!(
        run(
            &schema(),
            Value::Null,
            "query q { fieldWithNullableStringInput(input: $value) }"
        ),
        expected
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"value": "a"})),
        json!({"data": {"fieldWithNullableStringInput": r#""a""#}})
    );
}

#[test]
fn non_null_variables_must_be_provided() {
    let query = "query q($value: String!) { fieldWithNonNullableStringInput(input: $value) }";
    assert_eq!(
        run_with_variables(query, bytes_json!({})),
        invalid_variable("value", 9)
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"value": null})),
        invalid_variable("value", 9)
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"value": "a"})),
        json!({"data": {"fieldWithNonNullableStringInput": r#""a""#}})
    );
}

#[test]
fn argument_defaults() {
    let schema = schema();
    assert_eq!(
        run(&schema, Value::Null, "{ fieldWithDefaultArgumentValue }"),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hello World""#}})
    );
    assert_eq!(
        run(
            &schema,
            Value::Null,
            r#"{ fieldWithDefaultArgumentValue(input: "Hi") }"#
        ),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hi""#}})
    );
    // A literal that cannot be coerced becomes null, which takes the default
    assert_eq!(
        run(
            &schema,
            Value::Null,
            "{ fieldWithDefaultArgumentValue(input: WRONG_TYPE) }"
        ),
        json!({"data": {"fieldWithDefaultArgumentValue": r#""Hello World""#}})
    );
}

#[test]
fn lists_from_variables() {
    let query = "query q($input: [String]) { list(input: $input) }";
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": ["A", null, "B"]})),
        json!({"data": {"list": r#"["A",null,"B"]"#}})
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": "A"})),
        json!({"data": {"list": r#"["A"]"#}})
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": null})),
        json!({"data": {"list": "null"}})
    );

    let query = "query q($input: [String]!) { nnList(input: $input) }";
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": null})),
        invalid_variable("input", 9)
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": ["A", null]})),
        json!({"data": {"nnList": r#"["A",null]"#}})
    );

    let query = "query q($input: [String!]) { listNN(input: $input) }";
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": ["A", null, "B"]})),
        invalid_variable("input", 9)
    );
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": ["A", "B"]})),
        json!({"data": {"listNN": r#"["A","B"]"#}})
    );
}

#[test]
fn undeclared_variables_are_ignored() {
    let query = r#"{ fieldWithNullableStringInput(input: "a") }"#;
    assert_eq!(
        run_with_variables(query, bytes_json!({"unused": [1, 2]})),
        json!({"data": {"fieldWithNullableStringInput": r#""a""#}})
    );
}

#[test]
fn literal_arguments_take_precedence_over_variables_of_the_same_name() {
    let query = r#"
        query ($input: String) {
            fromVariable: fieldWithNullableStringInput(input: $input)
            fromLiteral: fieldWithNullableStringInput(input: "literal")
        }
    "#;
    assert_eq!(
        run_with_variables(query, bytes_json!({"input": "variable"})),
        json!({"data": {
            "fromVariable": r#""variable""#,
            "fromLiteral": r#""literal""#,
        }})
    );
}
