use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};

use super::Context;
use crate::scalar::MethodKind;

/// A compiled method: its kind, its parameter names and its resolved context.
///
/// Serializes as the host's op definition form:
///
/// ```text
/// GET     {"/state/scalar/op/get": ["key", [[name, op], ...]]}
/// PUT     {"/state/scalar/op/put": ["key", "value", [...]]}
/// POST    {"/state/scalar/op": [[name, op], ...]}
/// DELETE  {"/state/scalar/op/delete": ["key", [...]]}
/// ```
#[derive(Debug, Clone)]
pub struct OpDef {
    kind: MethodKind,
    params: Vec<String>,
    context: Context,
}

impl OpDef {
    pub fn new(kind: MethodKind, params: Vec<String>, context: Context) -> Self {
        Self {
            kind,
            params,
            context,
        }
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn path(&self) -> &'static str {
        match self.kind {
            MethodKind::Get => "/state/scalar/op/get",
            MethodKind::Put => "/state/scalar/op/put",
            MethodKind::Post => "/state/scalar/op",
            MethodKind::Delete => "/state/scalar/op/delete",
        }
    }
}

/// Key and value names followed by the context, for GET, PUT and DELETE.
struct Signature<'a>(&'a [String], &'a Context);

impl Serialize for Signature<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len() + 1))?;
        for param in self.0 {
            seq.serialize_element(param)?;
        }
        seq.serialize_element(self.1)?;
        seq.end()
    }
}

impl Serialize for OpDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self.kind {
            // POST parameters arrive as a named map, so only the context is sent
            MethodKind::Post => map.serialize_entry(self.path(), &self.context)?,
            _ => map.serialize_entry(self.path(), &Signature(&self.params, &self.context))?,
        }
        map.end()
    }
}
