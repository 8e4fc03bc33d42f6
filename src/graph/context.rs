//! Ordered, single-assignment blocks of named expressions.

use serde::{Serialize, Serializer, ser::SerializeSeq};

use super::resolve::resolve_context;
use crate::diagnostics::{CompileResult, DUPLICATE_NAME, Diagnostic, SERIALIZATION};
use crate::scalar::{ANONYMOUS_PREFIX, Expr, RETURN, Subject, validate_name};

/// A transaction context: `[[name, op], ...]` in assignment order.
///
/// A name may be bound at most once. [`Context::define`] returns a reference
/// to the bound name, which is how later entries depend on earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Vec<(String, Expr)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `expr` to `name` and return a reference to it.
    pub fn define(&mut self, name: &str, expr: impl Into<Expr>) -> CompileResult<Expr> {
        validate_name(name)?;

        if self.contains(name) {
            return Err(Box::new(
                Diagnostic::make_error(&DUPLICATE_NAME, &[name]).with_reference(name),
            ));
        }

        self.entries.push((name.to_string(), expr.into()));
        Ok(Expr::id(name))
    }

    /// Close this context as a nested block whose result is `result`.
    pub fn finish(mut self, result: impl Into<Expr>) -> Expr {
        self.set_return(result.into());
        Expr::Block(Box::new(self))
    }

    pub(crate) fn set_return(&mut self, result: Expr) {
        self.entries.push((RETURN.to_string(), result));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(bound, _)| bound == name)
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.entries
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, expr)| expr)
    }

    pub fn entries(&self) -> &[(String, Expr)] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind every anonymous subject in this context, and in the blocks nested in
    /// it, to a generated `_anon_<n>` name placed just before the entry that uses it.
    ///
    /// Names are numbered in entry order, depth first, so the same body always
    /// produces the same graph. Anonymous subjects inside a conditional branch or
    /// an `After` are bound in a block of their own so they stay lazy.
    pub fn name_anonymous(&mut self) {
        Namer::default().context(self);
    }

    /// Resolve this context as a standalone transaction and render its wire form.
    pub fn compile(&self) -> CompileResult<serde_json::Value> {
        let mut context = self.clone();
        context.name_anonymous();
        resolve_context(&context, &[], None)?;

        serde_json::to_value(&context).map_err(|err| {
            let err = err.to_string();
            Box::new(Diagnostic::make_error(&SERIALIZATION, &["context", err.as_str()]))
        })
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (name, expr) in &self.entries {
            seq.serialize_element(&(name, expr))?;
        }
        seq.end()
    }
}

#[derive(Default)]
struct Namer {
    next: usize,
}

impl Namer {
    fn context(&mut self, context: &mut Context) {
        let entries = std::mem::take(&mut context.entries);
        for (name, mut expr) in entries {
            let mut hoisted = Vec::new();
            self.expr(&mut expr, &mut hoisted);
            context.entries.extend(hoisted);
            context.entries.push((name, expr));
        }
    }

    /// Name the anonymous subjects of `expr`, pushing their bindings onto
    /// `hoisted` in evaluation order.
    fn expr(&mut self, expr: &mut Expr, hoisted: &mut Vec<(String, Expr)>) {
        match expr {
            Expr::Op(op) => {
                let subject = op.subject_mut();
                if let Subject::Anonymous { expr: inner, path } = subject {
                    let name = self.bind(std::mem::replace(&mut **inner, Expr::none()), hoisted);
                    let path = std::mem::take(path);
                    *subject = Subject::Id { name, path };
                }

                for arg in op.args_mut() {
                    self.expr(arg, hoisted);
                }
            }
            Expr::Member { expr: inner, path } => {
                let name = self.bind(std::mem::replace(&mut **inner, Expr::none()), hoisted);
                let path = std::mem::take(path);
                *expr = Expr::Id { name, path };
            }
            Expr::If(if_ref) => {
                self.expr(&mut if_ref.cond, hoisted);
                self.deferred(&mut if_ref.then);
                self.deferred(&mut if_ref.or_else);
            }
            Expr::After(after) => {
                for prereq in &mut after.prereqs {
                    self.deferred(prereq);
                }
                self.deferred(&mut after.then);
            }
            Expr::Tuple(items) => {
                for item in items {
                    self.expr(item, hoisted);
                }
            }
            Expr::Map(entries) => {
                for (_, value) in entries {
                    self.expr(value, hoisted);
                }
            }
            Expr::Construct { args, .. } => {
                for arg in args {
                    self.expr(arg, hoisted);
                }
            }
            Expr::Block(context) => self.context(context),
            Expr::Value(_) | Expr::Id { .. } | Expr::This(_) | Expr::Error(_) | Expr::Invalid(_) => {}
        }
    }

    fn bind(&mut self, mut anonymous: Expr, hoisted: &mut Vec<(String, Expr)>) -> String {
        self.expr(&mut anonymous, hoisted);

        let name = format!("{}{}", ANONYMOUS_PREFIX, self.next);
        self.next += 1;
        hoisted.push((name.clone(), anonymous));
        name
    }

    /// Name the anonymous subjects of an expression that may not run, inside a
    /// block that only runs with it.
    fn deferred(&mut self, expr: &mut Expr) {
        let mut hoisted = Vec::new();
        self.expr(expr, &mut hoisted);

        if !hoisted.is_empty() {
            let result = std::mem::replace(expr, Expr::none());
            let block = Context { entries: hoisted };
            *expr = block.finish(result);
        }
    }
}
