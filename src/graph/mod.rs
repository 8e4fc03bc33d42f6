//! Method tracing and the context compiler.
//!
//! A traced method body becomes a [`Context`]; the resolution pass checks every
//! reference in it and [`OpDef`] renders the resolved context in wire form.

pub mod context;
pub mod effects;
pub mod op_def;
pub mod resolve;
pub mod suggestions;
pub mod symbol_table;
pub mod tracer;

pub use context::Context;
pub use effects::check_ordering;
pub use op_def::OpDef;
pub use resolve::{resolve_context, resolve_standalone};
pub use tracer::{KEY, MethodStub, Params, VALUE, compile_method, trace};

#[cfg(test)]
mod graph_test;
