#![allow(dead_code)]

use opgraph::diagnostics::Diagnostic;
use opgraph::object::{ClassDef, compile_class};

/// Compile `class` and render it, panicking with the report if it fails.
pub fn compile_json(class: &ClassDef) -> serde_json::Value {
    match compile_class(class) {
        Ok(graph) => graph.to_json().unwrap_or_else(|err| panic!("{}", err)),
        Err(errors) => panic!("{}", opgraph::diagnostics::render_report(&errors)),
    }
}

/// Compile `class`, expecting it to fail, and return `(method, code)` per diagnostic.
pub fn compile_errors(class: &ClassDef) -> Vec<(String, String)> {
    match compile_class(class) {
        Ok(graph) => panic!("expected `{}` to fail", graph.link()),
        Err(errors) => errors.iter().map(located_code).collect(),
    }
}

fn located_code(diagnostic: &Diagnostic) -> (String, String) {
    (
        diagnostic.method().unwrap_or_default().to_string(),
        diagnostic.code().unwrap_or_default().to_string(),
    )
}
