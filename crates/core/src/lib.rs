// crates/core/src/lib.rs
pub mod automation;
pub mod catalog;
pub mod error;
pub mod inventory;

pub use automation::*;
pub use catalog::*;
pub use error::*;
pub use inventory::*;
