//! Handles to other clusters, possibly on other hosts.

use std::collections::BTreeMap;

use crate::diagnostics::{CompileResult, Diagnostic, UNKNOWN_REMOTE_METHOD};
use crate::scalar::{Expr, Link, MethodKind, validate_segment};

/// Builds op references against the methods of a cluster at a fixed link.
///
/// Calls are checked against the declared method kinds; a call to an undeclared
/// method, or with the wrong kind, produces an expression that fails resolution.
#[derive(Debug, Clone)]
pub struct ClusterHandle {
    link: Link,
    methods: BTreeMap<String, MethodKind>,
}

impl ClusterHandle {
    pub fn new(link: Link) -> Self {
        Self {
            link,
            methods: BTreeMap::new(),
        }
    }

    pub fn parse(link: &str) -> CompileResult<Self> {
        Link::parse(link).map(Self::new)
    }

    /// Declare the method `name`; it becomes one segment of the call's link.
    pub fn with_method(mut self, name: impl Into<String>, kind: MethodKind) -> CompileResult<Self> {
        let name = name.into();
        validate_segment(&name)?;
        self.methods.insert(name, kind);
        Ok(self)
    }

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, MethodKind)> {
        self.methods.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// A reference to the cluster itself.
    pub fn expr(&self) -> Expr {
        self.link.clone().into()
    }

    fn method(&self, name: &str, kind: MethodKind) -> Result<Expr, Box<Diagnostic>> {
        match self.methods.get(name) {
            Some(declared) if *declared == kind => Ok(self.link.append(name).into()),
            _ => {
                let (cluster, kind) = (self.link.to_string(), kind.to_string());
                let target = self.link.append(name).to_string();
                Err(Box::new(
                    Diagnostic::make_error(&UNKNOWN_REMOTE_METHOD, &[cluster.as_str(), kind.as_str(), name])
                        .with_reference(target),
                ))
            }
        }
    }

    pub fn get(&self, name: &str, key: impl Into<Expr>) -> Expr {
        match self.method(name, MethodKind::Get) {
            Ok(subject) => subject.get(key),
            Err(diagnostic) => Expr::Invalid(diagnostic),
        }
    }

    pub fn put(&self, name: &str, key: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
        match self.method(name, MethodKind::Put) {
            Ok(subject) => subject.put(key, value),
            Err(diagnostic) => Expr::Invalid(diagnostic),
        }
    }

    pub fn post<K: Into<String>>(&self, name: &str, params: impl IntoIterator<Item = (K, Expr)>) -> Expr {
        match self.method(name, MethodKind::Post) {
            Ok(subject) => subject.post(params),
            Err(diagnostic) => Expr::Invalid(diagnostic),
        }
    }

    pub fn delete(&self, name: &str, key: impl Into<Expr>) -> Expr {
        match self.method(name, MethodKind::Delete) {
            Ok(subject) => subject.delete(key),
            Err(diagnostic) => Expr::Invalid(diagnostic),
        }
    }
}
