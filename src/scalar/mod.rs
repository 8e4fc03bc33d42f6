//! Symbol & reference model.
//!
//! Literals, links, names and the symbolic [`Expr`] nodes a traced method body
//! is made of.

pub mod error_value;
pub mod id;
pub mod link;
pub mod reference;
pub mod value;

pub use error_value::{ErrorKind, ErrorValue};
pub use id::{ANONYMOUS_PREFIX, RETURN, SELF, is_valid_segment, validate_name, validate_segment};
pub use link::Link;
pub use reference::{After, Expr, IfRef, MethodKind, OpRef, Subject};
pub use value::{Number, Value, ValueType};
