//! Literal values and the scalar value type classes.

use std::fmt;

use serde::{Serialize, Serializer, ser::Error as _, ser::SerializeMap};

use super::Link;

const VALUE_PREFIX: &str = "/state/scalar/value";

/// A host-addressable scalar value type, e.g. `/state/scalar/value/number/uint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Bytes,
    Id,
    String,
    Number,
    Bool,
    Complex,
    C32,
    C64,
    Float,
    F32,
    F64,
    Int,
    I16,
    I32,
    I64,
    UInt,
    U8,
    U16,
    U32,
    U64,
}

impl ValueType {
    /// Path suffix below `/state/scalar/value`.
    fn suffix(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bytes => "bytes",
            Self::Id => "id",
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "number/bool",
            Self::Complex => "number/complex",
            Self::C32 => "number/complex/32",
            Self::C64 => "number/complex/64",
            Self::Float => "number/float",
            Self::F32 => "number/float/32",
            Self::F64 => "number/float/64",
            Self::Int => "number/int",
            Self::I16 => "number/int/16",
            Self::I32 => "number/int/32",
            Self::I64 => "number/int/64",
            Self::UInt => "number/uint",
            Self::U8 => "number/uint/8",
            Self::U16 => "number/uint/16",
            Self::U32 => "number/uint/32",
            Self::U64 => "number/uint/64",
        }
    }

    /// The full class path of this type.
    pub fn path(&self) -> String {
        format!("{}/{}", VALUE_PREFIX, self.suffix())
    }

    pub fn link(&self) -> Link {
        let mut segments = vec!["state", "scalar", "value"];
        segments.extend(self.suffix().split('/'));
        Link::from_path(&segments)
    }

    pub fn is_numeric(&self) -> bool {
        self.suffix().starts_with("number")
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A type used as a value is a reference to its class: `{"/state/scalar/value/string": []}`.
impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.link().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::UInt(n) => serializer.serialize_u64(*n),
            Self::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Float(n) => Err(S::Error::custom(format!("{} has no JSON representation", n))),
        }
    }
}

impl Number {
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(n) => n.is_finite(),
            Self::Int(_) | Self::UInt(_) => true,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::UInt(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
        }
    }
}

/// An immutable literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Number(Number),
    String(String),
    Link(Link),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The first number in this value that JSON cannot represent, if any.
    pub fn non_finite(&self) -> Option<Number> {
        match self {
            Self::Number(n) if !n.is_finite() => Some(*n),
            Self::Tuple(items) => items.iter().find_map(Self::non_finite),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            // a bare string starting with `$` or `/` would be read as a reference
            Self::String(s) if s.starts_with('$') || s.starts_with('/') => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&ValueType::String.path(), &[s])?;
                map.end()
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Link(link) => link.serialize(serializer),
            Self::Tuple(items) => items.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(Number::Int(n.into()))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(Number::Int(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(Number::UInt(n.into()))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(Number::UInt(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(Number::Float(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Link> for Value {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::None)
    }
}
