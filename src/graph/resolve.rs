//! Resolution pass: every reference in a traced context must name something
//! bound earlier in its own scope, an enclosing scope, or the enclosing class.

use tracing::trace;

use super::{Context, suggestions::did_you_mean, symbol_table::SymbolTable};
use crate::diagnostics::{
    CYCLIC_REFERENCE, CompileResult, DUPLICATE_NAME, Diagnostic, FORWARD_REFERENCE,
    METHOD_KIND_MISMATCH, NON_FINITE_NUMBER, NO_ENCLOSING_CLASS, SHADOWED_NAME, UNKNOWN_MEMBER,
    UNRESOLVED_REFERENCE,
};
use crate::object::{Manifest, MemberKind};
use crate::scalar::reference::unnamed_subject;
use crate::scalar::{Expr, MethodKind, OpRef, RETURN, Subject, Value, validate_segment};

/// Resolve every entry of `context`, with `params` bound before the first entry.
///
/// `manifest` describes the enclosing class; without one, `$self` references are
/// rejected.
pub fn resolve_context(
    context: &Context,
    params: &[String],
    manifest: Option<&Manifest>,
) -> CompileResult<()> {
    let mut resolver = Resolver::new(manifest);

    for param in params {
        if context.contains(param) {
            return Err(Box::new(
                Diagnostic::make_error(&DUPLICATE_NAME, &[param.as_str()])
                    .with_reference(param.as_str()),
            ));
        }
        resolver.symbols.define_parameter(param);
    }

    resolver.resolve_entries(context)
}

/// Resolve a single expression with nothing bound, e.g. a field's initial value.
pub fn resolve_standalone(expr: &Expr, manifest: Option<&Manifest>) -> CompileResult<()> {
    Resolver::new(manifest).resolve_expr(expr)
}

struct Resolver<'a> {
    manifest: Option<&'a Manifest>,
    symbols: SymbolTable,
}

impl<'a> Resolver<'a> {
    fn new(manifest: Option<&'a Manifest>) -> Self {
        Self {
            manifest,
            symbols: SymbolTable::new(),
        }
    }

    fn resolve_entries(&mut self, context: &Context) -> CompileResult<()> {
        self.symbols.declare_pending(context.names());

        for (name, expr) in context.entries() {
            trace!(name = %name, "resolving entry");
            self.symbols.enter(name);
            self.resolve_expr(expr)?;
            self.symbols.leave();
            self.symbols.define(name);
        }

        Ok(())
    }

    fn resolve_block(&mut self, context: &Context) -> CompileResult<()> {
        for name in context.names() {
            if name != RETURN && self.symbols.is_known(name) {
                return Err(Box::new(
                    Diagnostic::make_error(&SHADOWED_NAME, &[name]).with_reference(name),
                ));
            }
        }

        let outer = std::mem::take(&mut self.symbols);
        self.symbols = SymbolTable::new_enclosed(outer);
        let result = self.resolve_entries(context);
        self.symbols = std::mem::take(&mut self.symbols)
            .into_outer()
            .unwrap_or_default();

        result
    }

    fn resolve_expr(&mut self, expr: &Expr) -> CompileResult<()> {
        match expr {
            Expr::Value(value) => check_finite(value),
            Expr::Error(_) => Ok(()),
            Expr::Id { name, path } => {
                let subject = Subject::Id {
                    name: name.clone(),
                    path: path.clone(),
                };
                self.resolve_subject(&subject, None)
            }
            Expr::This(path) => self.resolve_subject(&Subject::This(path.clone()), None),
            Expr::Op(op) => self.resolve_op(op),
            Expr::If(if_ref) => {
                self.resolve_expr(&if_ref.cond)?;
                self.resolve_expr(&if_ref.then)?;
                self.resolve_expr(&if_ref.or_else)
            }
            Expr::After(after) => {
                for prereq in &after.prereqs {
                    self.resolve_expr(prereq)?;
                }
                self.resolve_expr(&after.then)
            }
            Expr::Tuple(items) => items.iter().try_for_each(|item| self.resolve_expr(item)),
            Expr::Map(entries) => entries.iter().try_for_each(|(key, value)| {
                // a key like `$self` or `/state/...` would be read back as a reference
                validate_segment(key)?;
                self.resolve_expr(value)
            }),
            Expr::Construct { args, .. } => args.iter().try_for_each(|arg| self.resolve_expr(arg)),
            Expr::Block(context) => self.resolve_block(context),
            Expr::Member { path, .. } => {
                let reference = format!("$<anonymous>/{}", path.join("/"));
                Err(Box::new(unnamed_subject(path, None).with_reference(reference)))
            }
            Expr::Invalid(diagnostic) => Err(diagnostic.clone()),
        }
    }

    fn resolve_op(&mut self, op: &OpRef) -> CompileResult<()> {
        self.resolve_subject(op.subject(), Some(op.kind()))?;

        if let OpRef::Post { params, .. } = op {
            for (name, _) in params {
                validate_segment(name)?;
            }
        }

        for arg in op.args() {
            self.resolve_expr(arg)?;
        }

        Ok(())
    }

    /// `kind` is set when the subject is the target of an op rather than a plain value.
    fn resolve_subject(&self, subject: &Subject, kind: Option<MethodKind>) -> CompileResult<()> {
        let reference = subject.to_string();
        let with_reference =
            |diagnostic: Diagnostic| Box::new(diagnostic.with_reference(reference.as_str()));

        match subject {
            Subject::Link(_) => Ok(()),
            Subject::Anonymous { path, .. } => Err(with_reference(unnamed_subject(path, kind))),
            Subject::Id { name, path } => {
                self.resolve_name(name).map_err(|d| with_reference(*d))?;
                path.iter()
                    .try_for_each(|segment| validate_segment(segment))
                    .map_err(|d| with_reference(*d))
            }
            Subject::This(path) => {
                self.resolve_self(path, kind).map_err(|d| with_reference(*d))?;
                path.iter()
                    .try_for_each(|segment| validate_segment(segment))
                    .map_err(|d| with_reference(*d))
            }
        }
    }

    fn resolve_name(&self, name: &str) -> CompileResult<()> {
        if self.symbols.resolve(name).is_some() {
            return Ok(());
        }

        let diagnostic = if self.symbols.is_current(name) {
            Diagnostic::make_error(&CYCLIC_REFERENCE, &[name])
        } else if self.symbols.is_pending(name) {
            Diagnostic::make_error(&FORWARD_REFERENCE, &[name])
        } else {
            let mut diagnostic = Diagnostic::make_error(&UNRESOLVED_REFERENCE, &[name]);
            if let Some(hint) = did_you_mean(name, &self.symbols.all_symbol_names()) {
                diagnostic = diagnostic.with_hint(hint);
            }
            diagnostic
        };

        Err(Box::new(diagnostic))
    }

    fn resolve_self(&self, path: &[String], kind: Option<MethodKind>) -> CompileResult<()> {
        let Some(manifest) = self.manifest else {
            let reference = Subject::This(path.to_vec()).to_string();
            return Err(Box::new(Diagnostic::make_error(&NO_ENCLOSING_CLASS, &[reference.as_str()])));
        };

        let Some(member) = path.first() else {
            return Ok(());
        };

        match manifest.member(member) {
            None => {
                let mut diagnostic =
                    Diagnostic::make_error(&UNKNOWN_MEMBER, &[manifest.class(), member.as_str()]);
                if let Some(hint) = did_you_mean(member, &manifest.names()) {
                    diagnostic = diagnostic.with_hint(hint);
                }
                Err(Box::new(diagnostic))
            }
            Some(MemberKind::Method(declared)) if path.len() == 1 => match kind {
                Some(used) if used != declared => {
                    let (declared, used) = (declared.to_string(), used.to_string());
                    Err(Box::new(Diagnostic::make_error(
                        &METHOD_KIND_MISMATCH,
                        &[member.as_str(), declared.as_str(), used.as_str()],
                    )))
                }
                _ => Ok(()),
            },
            Some(_) => Ok(()),
        }
    }
}

fn check_finite(value: &Value) -> CompileResult<()> {
    match value.non_finite() {
        Some(number) => {
            let number = number.to_string();
            Err(Box::new(
                Diagnostic::make_error(&NON_FINITE_NUMBER, &[number.as_str()])
                    .with_reference(number.as_str()),
            ))
        }
        None => Ok(()),
    }
}
