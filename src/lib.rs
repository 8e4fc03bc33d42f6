pub mod collection;
pub mod demo;
pub mod diagnostics;
pub mod graph;
pub mod logging;
pub mod object;
pub mod scalar;
