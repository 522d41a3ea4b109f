use apollo_compiler::name;
use apollo_compiler::ty;
use apollo_executor::schema::FieldDefinition;
use apollo_executor::schema::InputValueDefinition;
use apollo_executor::schema::ObjectType;
use apollo_executor::schema::Schema;
use apollo_executor::serde_json_bytes::json as bytes_json;
use apollo_executor::Execution;
use apollo_executor::GraphQLError;
use apollo_executor::GraphQLLocation;
use apollo_executor::PathElement;
use apollo_executor::Request;
use apollo_executor::RequestError;
use apollo_executor::Response;
use apollo_executor::ResponseData;
use apollo_executor::Value;
use pretty_assertions::assert_eq;
use serde_json::json;

fn schema() -> Schema {
    Schema::builder()
        .query_type(name!("Query"))
        .object(
            ObjectType::new(name!("Query"))
                .field(
                    FieldDefinition::new(name!("greeting"), ty!(String))
                        .argument(InputValueDefinition::new(name!("name"), ty!(String)))
                        .resolve(|info| {
                            let name = info.argument("name").as_str().unwrap_or("stranger");
                            Ok(format!("Hello, {name}!").into())
                        }),
                )
                .field(
                    FieldDefinition::new(name!("failing"), ty!(String!))
                        .resolve(|_| Err("no way".into())),
                ),
        )
        .build()
        .unwrap()
}

#[test]
fn deserializes_from_a_json_body() {
    let request: Request = serde_json::from_value(json!({
        "query": "query Greet($name: String) { greeting(name: $name) }",
        "operationName": "Greet",
        "variables": {"name": "Leia"},
    }))
    .unwrap();
    assert_eq!(
        request,
        Request::new("query Greet($name: String) { greeting(name: $name) }")
            .operation_name("Greet")
            .variables(crate::json_map(bytes_json!({"name": "Leia"})))
    );
    let response = request.execute(&schema(), Value::Null);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"data": {"greeting": "Hello, Leia!"}})
    );
}

#[test]
fn optional_members_can_be_omitted() {
    let request: Request = serde_json::from_str(r#"{"query": "{ greeting }"}"#).unwrap();
    assert_eq!(request, Request::new("{ greeting }"));
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"query": "{ greeting }"})
    );
    let response = request.execute(&schema(), Value::Null);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"data": {"greeting": "Hello, stranger!"}})
    );
}

#[test]
fn syntax_errors_abort_the_request() {
    let response = Request::new("{ greeting ").execute(&schema(), Value::Null);
    assert_eq!(response.data, ResponseData::Absent);
    assert!(!response.errors.is_empty());
    for error in &response.errors {
        assert!(!error.message.is_empty());
        assert!(error.path.is_empty());
    }
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("data").is_none());
}

#[test]
fn execute_with_uses_the_given_configuration() {
    let request = Request::new("query A { greeting } query B { greeting(name: \"B\") }")
        .operation_name("A");
    let response = request.execute_with(&schema(), request.execution().operation_name("B"));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"data": {"greeting": "Hello, B!"}})
    );

    let response = request.execute_with(&schema(), Execution::new());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"errors": [{
            "message": "Must provide operation name if query contains multiple operations.",
        }]})
    );
}

#[test]
fn null_data_is_serialized() {
    let response = Request::new("{ greeting failing }").execute(&schema(), Value::Null);
    assert_eq!(response.data, ResponseData::Null);
    assert!(response.data().is_none());
    assert_eq!(
        response.errors,
        [GraphQLError {
            message: "no way".to_owned(),
            locations: vec![GraphQLLocation { line: 1, column: 12 }],
            path: vec![PathElement::Field("failing".to_owned())],
            extensions: Default::default(),
        }]
    );
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "errors": [{
                "message": "no way",
                "locations": [{"line": 1, "column": 12}],
                "path": ["failing"],
            }],
            "data": null,
        })
    );
}

#[test]
fn responses_round_trip_through_json() {
    let response = Request::new("{ greeting }").execute(&schema(), Value::Null);
    let json = serde_json::to_string(&response).unwrap();
    let parsed: Response = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, response);
    assert_eq!(
        parsed.data().unwrap().get("greeting"),
        Some(&apollo_executor::JsonValue::from("Hello, stranger!"))
    );
}

#[test]
fn request_errors_become_response_errors() {
    let error = RequestError::new("Must provide an operation.");
    assert_eq!(error.to_string(), "Must provide an operation.");
    assert_eq!(error.location(), None);
    let response = Response::from_request_error(error);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"errors": [{"message": "Must provide an operation."}]})
    );
}
