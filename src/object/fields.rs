use serde::{Serialize, Serializer};

use super::Chain;
use crate::diagnostics::{CompileResult, DUPLICATE_MEMBER, Diagnostic};
use crate::scalar::{Expr, Value, validate_name};

/// The initial form of one class field.
#[derive(Debug, Clone)]
pub enum Field {
    Chain(Chain),
    State(Expr),
}

impl Field {
    pub fn initial(&self) -> &Expr {
        match self {
            Self::Chain(chain) => chain.initial(),
            Self::State(expr) => expr,
        }
    }
}

impl From<Chain> for Field {
    fn from(chain: Chain) -> Self {
        Self::Chain(chain)
    }
}

impl From<Expr> for Field {
    fn from(state: Expr) -> Self {
        Self::State(state)
    }
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        Self::State(Expr::Value(value))
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Chain(chain) => chain.serialize(serializer),
            Self::State(expr) => expr.serialize(serializer),
        }
    }
}

/// The fields a class declares in its `configure` closure, in declaration order.
#[derive(Debug, Clone)]
pub struct Fields {
    class: String,
    entries: Vec<(String, Field)>,
}

impl Fields {
    pub(crate) fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, name: &str, field: impl Into<Field>) -> CompileResult<()> {
        validate_name(name)?;

        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(Box::new(
                Diagnostic::make_error(&DUPLICATE_MEMBER, &[self.class.as_str(), name])
                    .with_reference(name),
            ));
        }

        self.entries.push((name.to_string(), field.into()));
        Ok(())
    }

    pub fn entries(&self) -> &[(String, Field)] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Field)> {
        self.entries
    }
}
