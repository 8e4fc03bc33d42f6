//! Chains: the persistent, replicated fields of a class.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::scalar::{Expr, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// Keeps the full mutation history.
    Sync,
    /// Keeps periodic snapshots of its subject.
    Block,
}

impl ChainKind {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Sync => "/state/chain/sync",
            Self::Block => "/state/chain/block",
        }
    }
}

/// A chain wrapping the initial value of its subject, e.g. `Chain::sync(UInt(10))`.
#[derive(Debug, Clone)]
pub struct Chain {
    kind: ChainKind,
    initial: Expr,
}

impl Chain {
    pub fn sync(initial: impl Into<Expr>) -> Self {
        Self {
            kind: ChainKind::Sync,
            initial: initial.into(),
        }
    }

    pub fn block(initial: impl Into<Expr>) -> Self {
        Self {
            kind: ChainKind::Block,
            initial: initial.into(),
        }
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    pub fn initial(&self) -> &Expr {
        &self.initial
    }
}

impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind.path(), &[&self.initial])?;
        map.end()
    }
}

/// Ops against a chain member of the enclosing class, e.g. `$self/rev`.
#[derive(Debug, Clone)]
pub struct ChainRef {
    subject: Expr,
}

impl ChainRef {
    pub(crate) fn new(subject: Expr) -> Self {
        Self { subject }
    }

    /// A reference to the chain itself.
    pub fn expr(&self) -> Expr {
        self.subject.clone()
    }

    /// The current value of the chain's subject.
    pub fn subject(&self) -> Expr {
        self.subject.attr("subject").get(Value::None)
    }

    /// The chain's mutation history.
    pub fn history(&self) -> Expr {
        self.subject.get(Value::None)
    }

    /// Replace the chain's subject with `value`.
    pub fn set(&self, value: impl Into<Expr>) -> Expr {
        self.subject.put(Value::None, value)
    }
}
