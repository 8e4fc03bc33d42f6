//! Symbolic expressions: references, deferred ops and the explicit control-flow IR.
//!
//! An [`Expr`] is never evaluated by this crate. Building one only records
//! what the host should compute. `Expr` has no boolean conversion and no
//! `PartialEq`/`PartialOrd`, so a traced body cannot branch on a traced value
//! with a native `if`; [`Expr::if_then_else`] and [`Expr::after`] are the only
//! ways to express branching and effect ordering.
//!
//! Calling an op on an unnamed op, conditional or constructor, e.g. `(a + b) + c`,
//! records an anonymous subject. Tracing binds each one to a generated
//! `_anon_<n>` name ahead of its first use.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Serialize, Serializer, ser::Error as _, ser::SerializeMap};

use super::{ErrorValue, Link, Value, id::SELF};
use crate::diagnostics::{Diagnostic, UNADDRESSABLE_SUBJECT};
use crate::graph::Context;

const IF_TAG: &str = "/state/scalar/ref/if";
const AFTER_TAG: &str = "/state/scalar/ref/after";
const DELETE_TAG: &str = "/state/scalar/ref/op/delete";

/// The four request verbs, shared by deferred ops and method definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MethodKind {
    Get,
    Put,
    Post,
    Delete,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Put => f.write_str("PUT"),
            Self::Post => f.write_str("POST"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// The addressable target of a deferred op.
#[derive(Debug, Clone)]
pub enum Subject {
    /// An absolute link, e.g. another cluster's method.
    Link(Link),
    /// A name bound earlier in the context, plus an optional path below it.
    Id { name: String, path: Vec<String> },
    /// A member of the enclosing class instance.
    This(Vec<String>),
    /// An unnamed expression that must be bound to a context name before use.
    Anonymous { expr: Box<Expr>, path: Vec<String> },
}

impl Subject {
    pub fn append(&self, segment: &str) -> Self {
        match self {
            Self::Link(link) => Self::Link(link.append(segment)),
            Self::Id { name, path } => {
                let mut path = path.clone();
                path.push(segment.to_string());
                Self::Id {
                    name: name.clone(),
                    path,
                }
            }
            Self::This(path) => {
                let mut path = path.clone();
                path.push(segment.to_string());
                Self::This(path)
            }
            Self::Anonymous { expr, path } => {
                let mut path = path.clone();
                path.push(segment.to_string());
                Self::Anonymous {
                    expr: expr.clone(),
                    path,
                }
            }
        }
    }
}

/// The error for an op whose anonymous subject was never bound to a name.
pub(crate) fn unnamed_subject(path: &[String], kind: Option<MethodKind>) -> Diagnostic {
    let op = match (path.last(), kind) {
        (Some(segment), _) => segment.clone(),
        (None, Some(kind)) => kind.to_string(),
        (None, None) => "an op".to_string(),
    };
    Diagnostic::make_error(&UNADDRESSABLE_SUBJECT, &[op.as_str()])
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (root, path) = match self {
            Self::Link(link) => return fmt::Display::fmt(link, f),
            Self::Id { name, path } => (name.as_str(), path),
            Self::This(path) => (SELF, path),
            Self::Anonymous { path, .. } => ("<anonymous>", path),
        };

        write!(f, "${}", root)?;
        for segment in path {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A deferred invocation of a GET, PUT, POST or DELETE op.
#[derive(Debug, Clone)]
pub enum OpRef {
    Get {
        subject: Subject,
        key: Expr,
    },
    Put {
        subject: Subject,
        key: Expr,
        value: Expr,
    },
    Post {
        subject: Subject,
        params: Vec<(String, Expr)>,
    },
    Delete {
        subject: Subject,
        key: Expr,
    },
}

impl OpRef {
    pub fn subject(&self) -> &Subject {
        match self {
            Self::Get { subject, .. }
            | Self::Put { subject, .. }
            | Self::Post { subject, .. }
            | Self::Delete { subject, .. } => subject,
        }
    }

    pub fn subject_mut(&mut self) -> &mut Subject {
        match self {
            Self::Get { subject, .. }
            | Self::Put { subject, .. }
            | Self::Post { subject, .. }
            | Self::Delete { subject, .. } => subject,
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Self::Get { .. } => MethodKind::Get,
            Self::Put { .. } => MethodKind::Put,
            Self::Post { .. } => MethodKind::Post,
            Self::Delete { .. } => MethodKind::Delete,
        }
    }

    /// The parameter expressions of this op, in serialization order.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Self::Get { key, .. } | Self::Delete { key, .. } => vec![key],
            Self::Put { key, value, .. } => vec![key, value],
            Self::Post { params, .. } => params.iter().map(|(_, expr)| expr).collect(),
        }
    }

    pub fn args_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Self::Get { key, .. } | Self::Delete { key, .. } => vec![key],
            Self::Put { key, value, .. } => vec![key, value],
            Self::Post { params, .. } => params.iter_mut().map(|(_, expr)| expr).collect(),
        }
    }
}

/// The IR form of a conditional: both branches are independent graphs.
#[derive(Debug, Clone)]
pub struct IfRef {
    pub cond: Expr,
    pub then: Expr,
    pub or_else: Expr,
}

/// Asserts that `prereqs` complete, in order, before `then` is evaluated.
#[derive(Debug, Clone)]
pub struct After {
    pub prereqs: Vec<Expr>,
    pub then: Expr,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Value(Value),
    Id { name: String, path: Vec<String> },
    This(Vec<String>),
    Op(Box<OpRef>),
    If(Box<IfRef>),
    After(Box<After>),
    Error(ErrorValue),
    Tuple(Vec<Expr>),
    Map(Vec<(String, Expr)>),
    /// An instance of a host class built from its arguments, e.g. `Number.init(0)`.
    Construct { class: Link, args: Vec<Expr> },
    /// A nested context, serialized with the same rules as a method body.
    Block(Box<Context>),
    /// A path below an unnamed expression, e.g. the `abs` of `a - b`.
    Member { expr: Box<Expr>, path: Vec<String> },
    /// A construction error, reported when the graph is resolved.
    Invalid(Box<Diagnostic>),
}

impl Expr {
    pub fn none() -> Self {
        Self::Value(Value::None)
    }

    /// A reference to a name bound in the enclosing context.
    pub fn id(name: impl Into<String>) -> Self {
        Self::Id {
            name: name.into(),
            path: Vec::new(),
        }
    }

    pub fn tuple(items: impl IntoIterator<Item = Expr>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn construct(class: Link, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Construct {
            class,
            args: args.into_iter().collect(),
        }
    }

    /// A typed value, e.g. `Expr::init(ValueType::Number, 0)` for `Number.init(0)`.
    pub fn init(dtype: super::ValueType, value: impl Into<Expr>) -> Self {
        Self::construct(dtype.link(), [value.into()])
    }

    pub fn error(error: ErrorValue) -> Self {
        Self::Error(error)
    }

    pub fn if_then_else(cond: impl Into<Expr>, then: impl Into<Expr>, or_else: impl Into<Expr>) -> Self {
        Self::If(Box::new(IfRef {
            cond: cond.into(),
            then: then.into(),
            or_else: or_else.into(),
        }))
    }

    pub fn after(prereqs: impl IntoIterator<Item = Expr>, then: impl Into<Expr>) -> Self {
        Self::After(Box::new(After {
            prereqs: prereqs.into_iter().collect(),
            then: then.into(),
        }))
    }

    /// The subject this expression addresses, if it is addressable.
    fn as_subject(&self, op: &str) -> Result<Subject, Box<Diagnostic>> {
        match self {
            Self::Id { name, path } => Ok(Subject::Id {
                name: name.clone(),
                path: path.clone(),
            }),
            Self::This(path) => Ok(Subject::This(path.clone())),
            Self::Value(Value::Link(link)) => Ok(Subject::Link(link.clone())),
            Self::Op(_) | Self::If(_) | Self::After(_) | Self::Construct { .. } | Self::Block(_) => {
                Ok(Subject::Anonymous {
                    expr: Box::new(self.clone()),
                    path: Vec::new(),
                })
            }
            Self::Member { expr, path } => Ok(Subject::Anonymous {
                expr: expr.clone(),
                path: path.clone(),
            }),
            Self::Invalid(diagnostic) => Err(diagnostic.clone()),
            _ => Err(Box::new(Diagnostic::make_error(&UNADDRESSABLE_SUBJECT, &[op]))),
        }
    }

    /// A reference to the member `name` of this expression, e.g. `$self/rev/subject`.
    pub fn attr(&self, name: &str) -> Self {
        match self.as_subject(name) {
            Ok(subject) => subject.append(name).into(),
            Err(diagnostic) => Self::Invalid(diagnostic),
        }
    }

    pub fn get(&self, key: impl Into<Expr>) -> Self {
        self.op("GET", |subject| OpRef::Get {
            subject,
            key: key.into(),
        })
    }

    pub fn put(&self, key: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        self.op("PUT", |subject| OpRef::Put {
            subject,
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn post<K: Into<String>>(&self, params: impl IntoIterator<Item = (K, Expr)>) -> Self {
        self.op("POST", |subject| OpRef::Post {
            subject,
            params: params.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    pub fn delete(&self, key: impl Into<Expr>) -> Self {
        self.op("DELETE", |subject| OpRef::Delete {
            subject,
            key: key.into(),
        })
    }

    fn op(&self, verb: &str, build: impl FnOnce(Subject) -> OpRef) -> Self {
        match self.as_subject(verb) {
            Ok(subject) => Self::Op(Box::new(build(subject))),
            Err(diagnostic) => Self::Invalid(diagnostic),
        }
    }

    fn scalar_op(&self, name: &str, arg: Expr) -> Self {
        self.attr(name).get(arg)
    }

    pub fn equals(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("eq", other.into())
    }

    pub fn not_equals(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("ne", other.into())
    }

    pub fn gt(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("gt", other.into())
    }

    pub fn gte(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("gte", other.into())
    }

    pub fn lt(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("lt", other.into())
    }

    pub fn lte(&self, other: impl Into<Expr>) -> Self {
        self.scalar_op("lte", other.into())
    }

    pub fn abs(&self) -> Self {
        self.scalar_op("abs", Self::none())
    }

    /// Returns true if this expression contains no references at all.
    pub fn is_literal(&self) -> bool {
        match self {
            Self::Value(Value::Link(_)) => false,
            Self::Value(_) => true,
            Self::Tuple(items) => items.iter().all(Self::is_literal),
            Self::Map(entries) => entries.iter().all(|(_, expr)| expr.is_literal()),
            Self::Construct { args, .. } => args.iter().all(Self::is_literal),
            _ => false,
        }
    }
}

impl From<Subject> for Expr {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Link(link) => Self::Value(Value::Link(link)),
            Subject::Id { name, path } => Self::Id { name, path },
            Subject::This(path) => Self::This(path),
            Subject::Anonymous { expr, path } if path.is_empty() => *expr,
            Subject::Anonymous { expr, path } => Self::Member { expr, path },
        }
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl From<OpRef> for Expr {
    fn from(op: OpRef) -> Self {
        Self::Op(Box::new(op))
    }
}

impl From<ErrorValue> for Expr {
    fn from(error: ErrorValue) -> Self {
        Self::Error(error)
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Self::Tuple(items)
    }
}

macro_rules! expr_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

expr_from_value!(Value, bool, i32, i64, u32, u64, f64, &str, String, Link);

macro_rules! scalar_operator {
    ($trait:ident, $method:ident, $name:literal) => {
        impl<T: Into<Expr>> $trait<T> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                self.scalar_op($name, rhs.into())
            }
        }

        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                self.scalar_op($name, rhs.into())
            }
        }
    };
}

scalar_operator!(Add, add, "add");
scalar_operator!(Sub, sub, "sub");
scalar_operator!(Mul, mul, "mul");
scalar_operator!(Div, div, "div");

/// Serializes ordered `(name, expr)` pairs as a JSON object.
pub(crate) struct OrderedMap<'a>(pub &'a [(String, Expr)]);

impl Serialize for OrderedMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, expr) in self.0 {
            map.serialize_entry(name, expr)?;
        }
        map.end()
    }
}

fn single_entry<S: Serializer, V: Serialize + ?Sized>(
    serializer: S,
    key: &str,
    value: &V,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl Serialize for OpRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Subject::Anonymous { path, .. } = self.subject() {
            return Err(S::Error::custom(unnamed_subject(path, Some(self.kind()))));
        }

        match self {
            Self::Get { subject, key } => single_entry(serializer, &subject.to_string(), &[key]),
            Self::Put {
                subject,
                key,
                value,
            } => single_entry(serializer, &subject.to_string(), &[key, value]),
            Self::Post { subject, params } => {
                single_entry(serializer, &subject.to_string(), &OrderedMap(params))
            }
            Self::Delete { subject, key } => {
                single_entry(serializer, DELETE_TAG, &(subject.to_string(), key))
            }
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Id { name, path } => {
                let subject = Subject::Id {
                    name: name.clone(),
                    path: path.clone(),
                };
                single_entry(serializer, &subject.to_string(), &[(); 0])
            }
            Self::This(path) => {
                let subject = Subject::This(path.clone());
                single_entry(serializer, &subject.to_string(), &[(); 0])
            }
            Self::Op(op) => op.serialize(serializer),
            Self::If(if_ref) => single_entry(
                serializer,
                IF_TAG,
                &[&if_ref.cond, &if_ref.then, &if_ref.or_else],
            ),
            Self::After(after) => {
                single_entry(serializer, AFTER_TAG, &(&after.prereqs, &after.then))
            }
            Self::Error(error) => error.serialize(serializer),
            Self::Tuple(items) => items.serialize(serializer),
            Self::Map(entries) => OrderedMap(entries).serialize(serializer),
            Self::Construct { class, args } => single_entry(serializer, &class.to_string(), args),
            Self::Block(context) => context.serialize(serializer),
            Self::Member { path, .. } => Err(S::Error::custom(unnamed_subject(path, None))),
            Self::Invalid(diagnostic) => Err(S::Error::custom(diagnostic)),
        }
    }
}
