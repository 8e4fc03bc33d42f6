//! Class/cluster reflector.
//!
//! A [`ClassDef`] declares fields through its `configure` closure and methods
//! through traced closures. [`compile_class`] turns it into a [`ClassGraph`]
//! keyed by the class link.

pub mod chain;
pub mod class;
pub mod cluster;
pub mod fields;
pub mod manifest;
pub mod reflect;
pub mod this;

pub use chain::{Chain, ChainKind, ChainRef};
pub use class::ClassDef;
pub use cluster::ClusterHandle;
pub use fields::{Field, Fields};
pub use manifest::{Manifest, MemberKind};
pub use reflect::{ClassGraph, Member, compile_class, compile_classes, hash_bytes};
pub use this::This;
