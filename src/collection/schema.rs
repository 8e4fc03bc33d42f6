//! Collection schemas.
//!
//! A schema is immutable once constructed and is validated up front, so every
//! [`BTreeSchema`] and [`TableSchema`] value is well formed.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::diagnostics::{
    CompileResult, DUPLICATE_COLUMN, Diagnostic, EMPTY_INDEX, EMPTY_KEY, INVALID_LOAD,
    UNKNOWN_COLUMN,
};
use crate::scalar::{Expr, Link, ValueType, validate_segment};

/// A named, typed column: `[name, type]` or `[name, type, max_size]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    dtype: ValueType,
    max_size: Option<u64>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ValueType) -> Self {
        Self {
            name: name.into(),
            dtype,
            max_size: None,
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ValueType {
        self.dtype
    }

    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    pub fn to_expr(&self) -> Expr {
        let mut form = vec![Expr::from(self.name.as_str()), Expr::from(self.dtype.link())];
        if let Some(max_size) = self.max_size {
            form.push(max_size.into());
        }
        Expr::Tuple(form)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_expr().serialize(serializer)
    }
}

/// Column names must be valid segments, since they become `where` parameter names.
fn check_unique<'a>(columns: impl IntoIterator<Item = &'a Column>) -> CompileResult<()> {
    let mut seen = HashSet::new();
    for column in columns {
        validate_segment(column.name())?;
        if !seen.insert(column.name()) {
            return Err(Box::new(
                Diagnostic::make_error(&DUPLICATE_COLUMN, &[column.name()])
                    .with_reference(column.name()),
            ));
        }
    }
    Ok(())
}

fn empty_key(kind: &str) -> Box<Diagnostic> {
    Box::new(Diagnostic::make_error(&EMPTY_KEY, &[kind]))
}

/// `POST {class}/copy_from {"schema": ..., "source": ...}`
fn copy_from(class: Link, schema: Expr, source: Expr) -> Expr {
    Expr::from(class)
        .attr("copy_from")
        .post([("schema", schema), ("source", source)])
}

/// `PUT {class} schema data`; `data` must not reference anything.
fn load(class: Link, schema: Expr, data: Expr) -> Expr {
    if data.is_literal() {
        Expr::from(class).put(schema, data)
    } else {
        let form = serde_json::to_string(&data).unwrap_or_else(|_| format!("{:?}", data));
        Expr::Invalid(Box::new(Diagnostic::make_error(&INVALID_LOAD, &[form.as_str()])))
    }
}

pub(crate) fn btree_link() -> Link {
    Link::from_path(&["state", "collection", "btree"])
}

pub(crate) fn table_link() -> Link {
    Link::from_path(&["state", "collection", "table"])
}

/// The ordered columns of a BTree; every column is part of the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTreeSchema {
    columns: Vec<Column>,
}

impl BTreeSchema {
    pub fn new(columns: Vec<Column>) -> CompileResult<Self> {
        if columns.is_empty() {
            return Err(empty_key("BTree"));
        }

        check_unique(&columns)?;
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn to_expr(&self) -> Expr {
        Expr::Tuple(self.columns.iter().map(Column::to_expr).collect())
    }

    /// A new, empty BTree with this schema.
    pub fn create(&self) -> Expr {
        Expr::construct(btree_link(), [self.to_expr()])
    }

    /// A new BTree with this schema filled from `source`.
    pub fn copy_from(&self, source: impl Into<Expr>) -> Expr {
        copy_from(btree_link(), self.to_expr(), source.into())
    }

    /// A new BTree with this schema holding the literal rows in `data`.
    pub fn load(&self, data: impl Into<Expr>) -> Expr {
        load(btree_link(), self.to_expr(), data.into())
    }
}

impl Serialize for BTreeSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_expr().serialize(serializer)
    }
}

/// Key columns, value columns and named auxiliary indices:
/// `[[key...], [values...], {index: [columns...]}]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    key: Vec<Column>,
    values: Vec<Column>,
    indices: Vec<(String, Vec<String>)>,
}

impl TableSchema {
    /// Indices are given as `(name, columns)`. A repeated index name replaces the
    /// earlier definition.
    pub fn new(
        key: Vec<Column>,
        values: Vec<Column>,
        indices: Vec<(&str, Vec<&str>)>,
    ) -> CompileResult<Self> {
        if key.is_empty() {
            return Err(empty_key("Table"));
        }

        check_unique(key.iter().chain(&values))?;

        let mut schema = Self {
            key,
            values,
            indices: Vec::with_capacity(indices.len()),
        };

        for (name, columns) in indices {
            validate_segment(name)?;
            if columns.is_empty() {
                return Err(Box::new(
                    Diagnostic::make_error(&EMPTY_INDEX, &[name]).with_reference(name),
                ));
            }

            for column in &columns {
                if schema.column(column).is_none() {
                    return Err(Box::new(
                        Diagnostic::make_error(&UNKNOWN_COLUMN, &[name, *column])
                            .with_reference(*column),
                    ));
                }
            }

            let columns = columns.into_iter().map(str::to_string).collect();
            match schema.indices.iter_mut().find(|(existing, _)| existing == name) {
                Some(index) => index.1 = columns,
                None => schema.indices.push((name.to_string(), columns)),
            }
        }

        Ok(schema)
    }

    pub fn key(&self) -> &[Column] {
        &self.key
    }

    pub fn values(&self) -> &[Column] {
        &self.values
    }

    pub fn indices(&self) -> &[(String, Vec<String>)] {
        &self.indices
    }

    /// Key columns followed by value columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.key.iter().chain(&self.values)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().find(|column| column.name() == name)
    }

    pub fn to_expr(&self) -> Expr {
        let indices = self.indices.iter().map(|(name, columns)| {
            let columns = columns.iter().map(|c| Expr::from(c.as_str()));
            (name.as_str(), Expr::tuple(columns))
        });

        Expr::tuple([
            Expr::Tuple(self.key.iter().map(Column::to_expr).collect()),
            Expr::Tuple(self.values.iter().map(Column::to_expr).collect()),
            Expr::map(indices),
        ])
    }

    /// A new, empty table with this schema.
    pub fn create(&self) -> Expr {
        Expr::construct(table_link(), [self.to_expr()])
    }

    pub fn copy_from(&self, source: impl Into<Expr>) -> Expr {
        copy_from(table_link(), self.to_expr(), source.into())
    }

    pub fn load(&self, data: impl Into<Expr>) -> Expr {
        load(table_link(), self.to_expr(), data.into())
    }
}

impl Serialize for TableSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_expr().serialize(serializer)
    }
}
