mod lists;
mod request;
mod variables;

use apollo_compiler::ast;
use apollo_executor::schema::Schema;
use apollo_executor::Execution;
use apollo_executor::JsonMap;
use apollo_executor::JsonValue;
use apollo_executor::Value;

/// Parses and executes `query`, returning the serialized response
fn run(schema: &Schema, root_value: impl Into<Value>, query: &str) -> serde_json::Value {
    run_with(schema, Execution::new().root_value(root_value), query)
}

fn run_with(schema: &Schema, execution: Execution, query: &str) -> serde_json::Value {
    let document = ast::Document::parse(query, "query.graphql").unwrap();
    serde_json::to_value(execution.execute(schema, &document)).unwrap()
}

fn json_map(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}
