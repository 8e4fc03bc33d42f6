mod common;

use std::collections::HashSet;

use opgraph::demo;
use opgraph::object::compile_class;
use serde_json::Value;

const EXAMPLE_FIXTURE: &str = concat!(
    r#"{"/app/example":{"#,
    r#""bump":{"/state/scalar/op":[["_return",{"/state/scalar/ref/if":["#,
    r#"{"$version/gt":[{"$self/current":[null]}]},"#,
    r#"{"$self/rev":[null,{"$version":[]}]},"#,
    r#"{"/error/bad_request":"Version too old"}]}]]},"#,
    r#""current":{"/state/scalar/op/get":["key",[["_return",{"$self/rev/subject":[null]}]]]},"#,
    r#""history":{"/state/scalar/op/get":["key",[["_return",{"$self/rev":[null]}]]]},"#,
    r#""rev":{"/state/chain/sync":[{"/state/scalar/value/number":[0]}]}"#,
    r#"}}"#,
);

/// Every `[[name, op], ...]` context inside an op definition.
fn contexts(json: &Value) -> Vec<&Vec<Value>> {
    let mut found = Vec::new();
    collect_contexts(json, &mut found);
    found
}

fn collect_contexts<'a>(json: &'a Value, found: &mut Vec<&'a Vec<Value>>) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("/state/scalar/op", Value::Array(context)) => found.push(context),
                    ("/state/scalar/op/get" | "/state/scalar/op/put" | "/state/scalar/op/delete", Value::Array(form)) => {
                        if let Some(Value::Array(context)) = form.last() {
                            found.push(context);
                        }
                    }
                    _ => collect_contexts(value, found),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_contexts(item, found)),
        _ => {}
    }
}

fn conditionals(json: &Value) -> Vec<&Value> {
    match json {
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, value)| {
                let own = (key == "/state/scalar/ref/if").then_some(value);
                own.into_iter().chain(conditionals(value))
            })
            .collect(),
        Value::Array(items) => items.iter().flat_map(conditionals).collect(),
        _ => Vec::new(),
    }
}

#[test]
fn example_cluster_reproduces_the_fixture_byte_for_byte() {
    let graph = compile_class(&demo::example_cluster().unwrap()).unwrap();
    let bytes = graph.to_bytes().unwrap();

    assert_eq!(String::from_utf8(bytes).unwrap(), EXAMPLE_FIXTURE);
}

#[test]
fn fresh_definitions_share_a_fingerprint() {
    let first = compile_class(&demo::example_cluster().unwrap()).unwrap();
    let second = compile_class(&demo::example_cluster().unwrap()).unwrap();

    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    assert_eq!(
        first.fingerprint().unwrap(),
        opgraph::object::hash_bytes(EXAMPLE_FIXTURE.as_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    );
}

#[test]
fn every_context_is_single_assignment_and_ends_with_return() {
    let host = opgraph::scalar::Link::parse(demo::DEFAULT_HOST).unwrap();
    let (left, right) = demo::balance_clusters(&host).unwrap();

    for class in [demo::example_cluster().unwrap(), left, right, demo::table_cluster(&host).unwrap()] {
        let json = common::compile_json(&class);
        let found = contexts(&json);
        assert!(!found.is_empty(), "{}", class.link());

        for context in found {
            let names: Vec<&str> = context
                .iter()
                .filter_map(|entry| entry.get(0).and_then(Value::as_str))
                .collect();

            assert_eq!(names.len(), context.len());
            assert_eq!(names.last(), Some(&"_return"), "{}", class.link());
            assert_eq!(
                names.iter().collect::<HashSet<_>>().len(),
                names.len(),
                "duplicate name in {}",
                class.link()
            );
        }
    }
}

#[test]
fn conditionals_have_three_branches() {
    let host = opgraph::scalar::Link::parse(demo::DEFAULT_HOST).unwrap();
    let (left, _) = demo::balance_clusters(&host).unwrap();

    for class in [demo::example_cluster().unwrap(), left] {
        let json = common::compile_json(&class);
        let found = conditionals(&json);
        assert!(!found.is_empty());
        for conditional in found {
            assert_eq!(conditional.as_array().map(Vec::len), Some(3));
        }
    }
}
