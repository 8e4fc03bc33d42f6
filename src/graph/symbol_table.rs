use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    /// A method parameter such as `key` or a declared POST parameter.
    Parameter,
    /// A context entry.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub symbol_scope: SymbolScope,
    pub index: usize,
}

impl Binding {
    pub fn new(name: impl Into<String>, symbol_scope: SymbolScope, index: usize) -> Self {
        Self {
            name: name.into(),
            symbol_scope,
            index,
        }
    }
}

/// Names visible while resolving one context, chained to the enclosing contexts.
///
/// Besides the names already bound, each scope remembers the names its context
/// binds *later* and the entry currently being resolved, so that a lookup miss
/// can be classified as a forward reference or a cycle.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub outer: Option<Box<SymbolTable>>,
    store: HashMap<String, Binding>,
    pending: HashSet<String>,
    current: Option<String>,
    pub num_definitions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: SymbolTable) -> Self {
        Self {
            outer: Some(Box::new(outer)),
            ..Self::default()
        }
    }

    /// Detach the enclosing scope, discarding this one.
    pub fn into_outer(self) -> Option<SymbolTable> {
        self.outer.map(|outer| *outer)
    }

    /// Record the names this scope's context will bind, in any order.
    pub fn declare_pending<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.pending.extend(names.into_iter().map(str::to_string));
    }

    pub fn define_parameter(&mut self, name: &str) -> Binding {
        self.insert(name, SymbolScope::Parameter)
    }

    pub fn define(&mut self, name: &str) -> Binding {
        self.pending.remove(name);
        self.insert(name, SymbolScope::Local)
    }

    fn insert(&mut self, name: &str, symbol_scope: SymbolScope) -> Binding {
        let binding = Binding::new(name, symbol_scope, self.num_definitions);
        self.store.insert(name.to_string(), binding.clone());
        self.num_definitions += 1;
        binding
    }

    /// Mark `name` as the entry being resolved in this scope.
    pub fn enter(&mut self, name: &str) {
        self.current = Some(name.to_string());
    }

    pub fn leave(&mut self) {
        self.current = None;
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Option<&Binding> {
        match self.store.get(name) {
            Some(binding) => Some(binding),
            None => self.outer.as_ref().and_then(|outer| outer.resolve(name)),
        }
    }

    /// Returns true if `name` is bound later in this or an enclosing context.
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains(name) || self.outer.as_ref().is_some_and(|outer| outer.is_pending(name))
    }

    /// Returns true if `name` is being resolved in this or an enclosing context.
    pub fn is_current(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
            || self.outer.as_ref().is_some_and(|outer| outer.is_current(name))
    }

    /// Returns true if `name` is bound, pending or being resolved anywhere in the chain.
    pub fn is_known(&self, name: &str) -> bool {
        self.resolve(name).is_some() || self.is_pending(name) || self.is_current(name)
    }

    /// Get all symbol names visible from this scope
    ///
    /// Used for generating "did you mean?" suggestions.
    pub fn all_symbol_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.store.keys().cloned().collect();

        if let Some(outer) = &self.outer {
            names.extend(outer.all_symbol_names());
        }

        names.sort();
        names.dedup();
        names
    }
}
