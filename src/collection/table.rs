use super::TableSchema;
use crate::diagnostics::{CompileResult, Diagnostic, UNKNOWN_COLUMN};
use crate::graph::Context;
use crate::scalar::{Expr, Value};

/// A bound on one column in a [`TableRef::where_`] clause.
#[derive(Debug, Clone)]
pub enum Bound {
    Eq(Expr),
    /// Half-open range `[start, end)`.
    Range(Expr, Expr),
}

impl Bound {
    pub fn eq(value: impl Into<Expr>) -> Self {
        Self::Eq(value.into())
    }

    pub fn range(start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Self::Range(start.into(), end.into())
    }
}

impl From<Bound> for Expr {
    fn from(bound: Bound) -> Self {
        match bound {
            Bound::Eq(value) => value,
            Bound::Range(start, end) => Expr::tuple([start, end]),
        }
    }
}

/// Ops against an addressable table: a context name or a class field.
#[derive(Debug, Clone)]
pub struct TableRef {
    subject: Expr,
    schema: TableSchema,
}

impl TableRef {
    pub fn new(subject: Expr, schema: TableSchema) -> Self {
        Self { subject, schema }
    }

    /// Create an empty table bound to `name` in `cx`.
    pub fn bind(cx: &mut Context, name: &str, schema: &TableSchema) -> CompileResult<Self> {
        let subject = cx.define(name, schema.create())?;
        Ok(Self::new(subject, schema.clone()))
    }

    pub fn expr(&self) -> Expr {
        self.subject.clone()
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Insert a new row; fails on the host if `key` is already present.
    pub fn insert(&self, key: impl Into<Expr>, values: impl Into<Expr>) -> Expr {
        self.subject.attr("insert").put(key, values)
    }

    /// Insert or replace the row at `key`.
    pub fn upsert(&self, key: impl Into<Expr>, values: impl Into<Expr>) -> Expr {
        self.subject.put(key, values)
    }

    /// The row at `key`.
    pub fn get(&self, key: impl Into<Expr>) -> Expr {
        self.subject.get(key)
    }

    pub fn count(&self) -> Expr {
        self.subject.attr("count").get(Value::None)
    }

    /// The rows matching every bound. Each bound must name a declared column.
    pub fn where_(&self, bounds: Vec<(&str, Bound)>) -> Expr {
        for (column, _) in &bounds {
            if self.schema.column(column).is_none() {
                return Expr::Invalid(Box::new(
                    Diagnostic::make_error(&UNKNOWN_COLUMN, &["where", *column])
                        .with_reference(*column),
                ));
            }
        }

        self.subject
            .attr("where")
            .post(bounds.into_iter().map(|(column, bound)| (column, Expr::from(bound))))
    }

    /// Delete every row.
    pub fn delete(&self) -> Expr {
        self.subject.delete(Value::None)
    }
}
