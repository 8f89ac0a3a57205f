//! In-memory adapters.

mod catalog;

pub use catalog::InMemoryCatalog;
