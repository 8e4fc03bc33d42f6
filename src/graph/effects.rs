//! Ordering of local mutations against effectful calls to other clusters.
//!
//! A method that mutates its own state and also writes to another cluster must
//! say which happens first. The remote call is ordered only when it sits in the
//! result of an `After` whose prerequisites (or an earlier prerequisite in the
//! same list) perform a local mutation.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::Context;
use crate::diagnostics::{CompileResult, Diagnostic, UNORDERED_REMOTE_CALL};
use crate::scalar::{Expr, Link, MethodKind, OpRef, Subject, Value};

/// Reject a context whose effectful remote calls may race its local mutations.
///
/// `class` is the link of the enclosing class; calls below it are local.
pub fn check_ordering(context: &Context, class: Option<&Link>) -> CompileResult<()> {
    let mut checker = EffectChecker {
        class,
        links: HashMap::new(),
        mutating: HashSet::new(),
        local_mutation: None,
        unordered: Vec::new(),
    };

    checker.visit_context(context, false);

    match (checker.local_mutation, checker.unordered.first()) {
        (Some(local), Some(remote)) => Err(Box::new(
            Diagnostic::make_error(&UNORDERED_REMOTE_CALL, &[remote.as_str(), local.as_str()])
                .with_reference(remote.as_str()),
        )),
        _ => Ok(()),
    }
}

struct EffectChecker<'a> {
    class: Option<&'a Link>,
    /// Context names bound directly to a link.
    links: HashMap<String, Link>,
    /// Context names whose value performs a local mutation.
    mutating: HashSet<String>,
    local_mutation: Option<String>,
    unordered: Vec<String>,
}

impl EffectChecker<'_> {
    fn visit_context(&mut self, context: &Context, guarded: bool) {
        for (name, expr) in context.entries() {
            if let Expr::Value(Value::Link(link)) = expr {
                self.links.insert(name.clone(), link.clone());
            }

            if self.mutates(expr) {
                self.mutating.insert(name.clone());
            }

            self.visit(expr, guarded);
        }
    }

    fn visit(&mut self, expr: &Expr, guarded: bool) {
        match expr {
            Expr::Op(op) => {
                if is_local_mutation(op) && self.local_mutation.is_none() {
                    self.local_mutation = Some(op.subject().to_string());
                }

                if let Some(remote) = self.remote_target(op) {
                    trace!(remote = %remote, guarded, "remote call");
                    if !guarded {
                        self.unordered.push(remote.to_string());
                    }
                }

                for arg in op.args() {
                    self.visit(arg, guarded);
                }
            }
            Expr::After(after) => {
                let mut ordered = guarded;
                for prereq in &after.prereqs {
                    self.visit(prereq, ordered);
                    ordered = ordered || self.mutates(prereq);
                }
                self.visit(&after.then, ordered);
            }
            Expr::Block(context) => self.visit_context(context, guarded),
            other => {
                for child in children(other) {
                    self.visit(child, guarded);
                }
            }
        }
    }

    fn mutates(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Op(op) if is_local_mutation(op) => true,
            Expr::Id { name, .. } => self.mutating.contains(name),
            other => children(other).into_iter().any(|child| self.mutates(child)),
        }
    }

    /// The target of an effectful call to another cluster, if `op` is one.
    fn remote_target(&self, op: &OpRef) -> Option<Link> {
        if op.kind() == MethodKind::Get {
            return None;
        }

        let link = match op.subject() {
            Subject::Link(link) => link.clone(),
            Subject::Id { name, path } => {
                let mut link = self.links.get(name)?.clone();
                for segment in path {
                    link = link.append(segment.as_str());
                }
                link
            }
            Subject::This(_) | Subject::Anonymous { .. } => return None,
        };

        if link.is_native() || self.class.is_some_and(|class| link.starts_with(class)) {
            None
        } else {
            Some(link)
        }
    }
}

fn is_local_mutation(op: &OpRef) -> bool {
    matches!(op.kind(), MethodKind::Put | MethodKind::Delete)
        && matches!(op.subject(), Subject::This(_))
}

fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Value(_) | Expr::Id { .. } | Expr::This(_) | Expr::Error(_) | Expr::Invalid(_) => {
            Vec::new()
        }
        Expr::Op(op) => op.args(),
        Expr::If(if_ref) => vec![&if_ref.cond, &if_ref.then, &if_ref.or_else],
        Expr::After(after) => after.prereqs.iter().chain([&after.then]).collect(),
        Expr::Tuple(items) => items.iter().collect(),
        Expr::Map(entries) => entries.iter().map(|(_, expr)| expr).collect(),
        Expr::Construct { args, .. } => args.iter().collect(),
        Expr::Block(context) => context.entries().iter().map(|(_, expr)| expr).collect(),
        Expr::Member { expr, .. } => vec![expr.as_ref()],
    }
}
