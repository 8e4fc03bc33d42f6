//! Collection schema builder.
//!
//! BTree and table schemas, plus the references a method body can build
//! against a collection. Storage itself lives on the host.

pub mod btree;
pub mod schema;
pub mod table;

pub use btree::BTreeRef;
pub use schema::{BTreeSchema, Column, TableSchema};
pub use table::{Bound, TableRef};
