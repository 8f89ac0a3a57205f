//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-process catalog store implementing the catalog ports

pub mod memory;

pub use memory::InMemoryCatalog;
