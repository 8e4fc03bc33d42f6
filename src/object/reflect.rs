//! Class reflection: enumerate a class's fields and methods and compile each
//! one into the class's wire form.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Serialize, Serializer, ser::SerializeMap};
use sha2::{Digest, Sha256};
use tracing::{debug, debug_span};

use super::{ClassDef, Field, Fields, Manifest, MemberKind, This};
use crate::diagnostics::{CompileResult, DUPLICATE_MEMBER, Diagnostic, SERIALIZATION};
use crate::graph::{OpDef, compile_method, resolve_standalone};
use crate::scalar::{Link, validate_name};

#[derive(Debug, Clone)]
pub enum Member {
    Field(Field),
    Method(OpDef),
}

impl Serialize for Member {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(field) => field.serialize(serializer),
            Self::Method(op_def) => op_def.serialize(serializer),
        }
    }
}

/// A compiled class: `{link: {member: form, ...}}` with members sorted by name.
#[derive(Debug, Clone)]
pub struct ClassGraph {
    link: Link,
    members: BTreeMap<String, Member>,
}

impl ClassGraph {
    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn members(&self) -> &BTreeMap<String, Member> {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn to_json(&self) -> CompileResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|err| self.serialization_error(err))
    }

    pub fn to_bytes(&self) -> CompileResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| self.serialization_error(err))
    }

    pub fn to_string_pretty(&self) -> CompileResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| self.serialization_error(err))
    }

    /// Hex-encoded SHA-256 of the serialized class.
    pub fn fingerprint(&self) -> CompileResult<String> {
        Ok(to_hex(&hash_bytes(&self.to_bytes()?)))
    }

    fn serialization_error(&self, err: serde_json::Error) -> Box<Diagnostic> {
        let (class, err) = (self.link.to_string(), err.to_string());
        Box::new(
            Diagnostic::make_error(&SERIALIZATION, &[class.as_str(), err.as_str()])
                .in_class(class.as_str()),
        )
    }
}

impl Serialize for ClassGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.link.to_string(), &self.members)?;
        map.end()
    }
}

pub fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

fn to_hex(bytes: &[u8; 32]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compile every member of `class`.
///
/// A failing member contributes one diagnostic and does not stop its siblings
/// from compiling, so a single call reports every broken member.
pub fn compile_class(class: &ClassDef) -> Result<ClassGraph, Vec<Diagnostic>> {
    let class_name = class.link().to_string();
    let _span = debug_span!("compile_class", class = %class_name).entered();

    let mut diagnostics = Vec::new();
    let locate = |diagnostic: Box<Diagnostic>, member: &str| {
        (*diagnostic).in_class(class_name.as_str()).in_method(member)
    };

    let mut fields = Fields::new(class_name.as_str());
    for configure in class.configurators() {
        if let Err(diagnostic) = configure(&mut fields) {
            let member = diagnostic.reference().unwrap_or("configure").to_string();
            diagnostics.push(locate(diagnostic, &member));
        }
    }

    let mut manifest = Manifest::new(class_name.as_str());
    for (name, _) in fields.entries() {
        manifest.insert(name, MemberKind::Field);
    }

    let mut methods = Vec::new();
    for (name, stub) in class.methods() {
        if let Err(diagnostic) = validate_name(name) {
            diagnostics.push(locate(diagnostic, name));
        } else if manifest.insert(name, MemberKind::Method(stub.kind())) {
            methods.push((name, stub));
        } else {
            let diagnostic = Diagnostic::make_error(&DUPLICATE_MEMBER, &[class_name.as_str(), name])
                .with_reference(name);
            diagnostics.push(locate(Box::new(diagnostic), name));
        }
    }

    debug!(fields = fields.entries().len(), methods = methods.len(), "reflected class");

    let mut members = BTreeMap::new();

    for (name, field) in fields.into_entries() {
        match resolve_standalone(field.initial(), None) {
            Ok(()) => {
                members.insert(name, Member::Field(field));
            }
            Err(diagnostic) => diagnostics.push(locate(diagnostic, &name)),
        }
    }

    let this = This::new(class.link().clone());
    for (name, stub) in methods {
        match compile_method(stub, name, &this, &manifest) {
            Ok(op_def) => {
                members.insert(name.to_string(), Member::Method(op_def));
            }
            Err(diagnostic) => diagnostics.push(locate(diagnostic, name)),
        }
    }

    if diagnostics.is_empty() {
        debug!(members = members.len(), "compiled class");
        Ok(ClassGraph {
            link: class.link().clone(),
            members,
        })
    } else {
        debug!(errors = diagnostics.len(), "class failed to compile");
        Err(diagnostics)
    }
}

/// Compile independent classes in parallel. Results follow the input order.
pub fn compile_classes(classes: &[ClassDef]) -> Vec<Result<ClassGraph, Vec<Diagnostic>>> {
    classes.par_iter().map(compile_class).collect()
}
