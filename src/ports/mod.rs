//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the persistence layer. Adapters implement these ports.
//!
//! - `CatalogReader` - snapshot and price-history reads
//! - `CatalogWriter` - recomputed costs and applied price changes

mod catalog_reader;
mod catalog_writer;

pub use catalog_reader::{CatalogReader, SnapshotWindows};
pub use catalog_writer::CatalogWriter;
