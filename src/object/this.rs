use super::ChainRef;
use crate::collection::{BTreeRef, BTreeSchema, TableRef, TableSchema};
use crate::scalar::{Expr, Link};

/// The enclosing class instance as seen from a method body: `$self`.
#[derive(Debug, Clone)]
pub struct This {
    link: Link,
}

impl This {
    pub(crate) fn new(link: Link) -> Self {
        Self { link }
    }

    /// The link of the class this method belongs to.
    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn expr(&self) -> Expr {
        Expr::This(Vec::new())
    }

    /// A reference to the field or method `name`, e.g. `$self/weight`.
    pub fn member(&self, name: &str) -> Expr {
        Expr::This(vec![name.to_string()])
    }

    pub fn chain(&self, name: &str) -> ChainRef {
        ChainRef::new(self.member(name))
    }

    pub fn btree(&self, name: &str, schema: &BTreeSchema) -> BTreeRef {
        BTreeRef::new(self.member(name), schema.clone())
    }

    pub fn table(&self, name: &str, schema: &TableSchema) -> TableRef {
        TableRef::new(self.member(name), schema.clone())
    }

    /// Call this class's GET method `method`.
    pub fn get(&self, method: &str, key: impl Into<Expr>) -> Expr {
        self.member(method).get(key)
    }

    pub fn put(&self, method: &str, key: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
        self.member(method).put(key, value)
    }

    pub fn post<K: Into<String>>(&self, method: &str, params: impl IntoIterator<Item = (K, Expr)>) -> Expr {
        self.member(method).post(params)
    }

    pub fn delete(&self, method: &str, key: impl Into<Expr>) -> Expr {
        self.member(method).delete(key)
    }
}
