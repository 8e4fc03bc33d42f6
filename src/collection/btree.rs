use super::BTreeSchema;
use crate::diagnostics::CompileResult;
use crate::graph::Context;
use crate::scalar::{Expr, Value};

/// Ops against an addressable BTree: a context name or a class field.
#[derive(Debug, Clone)]
pub struct BTreeRef {
    subject: Expr,
    schema: BTreeSchema,
}

impl BTreeRef {
    pub fn new(subject: Expr, schema: BTreeSchema) -> Self {
        Self { subject, schema }
    }

    /// Create an empty BTree bound to `name` in `cx`.
    pub fn bind(cx: &mut Context, name: &str, schema: &BTreeSchema) -> CompileResult<Self> {
        let subject = cx.define(name, schema.create())?;
        Ok(Self::new(subject, schema.clone()))
    }

    pub fn expr(&self) -> Expr {
        self.subject.clone()
    }

    pub fn schema(&self) -> &BTreeSchema {
        &self.schema
    }

    /// The keys which begin with `prefix`.
    pub fn slice(&self, prefix: impl Into<Expr>) -> Expr {
        self.subject.get(prefix)
    }

    pub fn count(&self) -> Expr {
        self.subject.attr("count").get(Value::None)
    }

    /// Delete every key.
    pub fn delete(&self) -> Expr {
        self.subject.delete(Value::None)
    }

    /// Insert `key`; inserting a key already present is a no-op.
    pub fn insert(&self, key: impl Into<Expr>) -> Expr {
        self.subject.attr("insert").put(Value::None, key)
    }

    /// The same range with its keys in reverse order.
    pub fn reverse(&self) -> Expr {
        self.subject.get(Expr::tuple([Expr::none(), Expr::from(true)]))
    }
}
