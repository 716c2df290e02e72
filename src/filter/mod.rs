pub mod catalog;
pub mod clause;
pub mod error;
pub mod eval;
pub mod wire;

pub use catalog::{Catalog, OpName, ValueCategory};
pub use clause::{Clause, Filter, Record};
pub use error::FilterError;
pub use eval::{apply, evaluate};
pub use wire::{from_json, from_str, to_json};
