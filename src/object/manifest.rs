use std::collections::BTreeMap;

use crate::scalar::MethodKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method(MethodKind),
}

/// The members of one class, as seen by the resolution pass.
#[derive(Debug, Clone)]
pub struct Manifest {
    class: String,
    members: BTreeMap<String, MemberKind>,
}

impl Manifest {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            members: BTreeMap::new(),
        }
    }

    /// Add a member. Returns false, leaving the manifest unchanged, if the name is taken.
    pub fn insert(&mut self, name: &str, kind: MemberKind) -> bool {
        if self.members.contains_key(name) {
            return false;
        }

        self.members.insert(name.to_string(), kind);
        true
    }

    pub fn member(&self, name: &str) -> Option<MemberKind> {
        self.members.get(name).copied()
    }

    pub fn names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
