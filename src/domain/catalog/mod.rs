//! Catalog Module - the records a business keeps about what it sells.
//!
//! Ingredients, recipe (BOM) lines, products, sales channels, sales
//! aggregates and cost history, plus [`CatalogSnapshot`] bundling them for a
//! single computation pass.

mod bom;
mod channel;
mod cost_history;
mod ingredient;
mod product;
mod sales;
mod snapshot;

pub use bom::{BomLine, BomOwner};
pub use channel::Channel;
pub use cost_history::CostHistoryEntry;
pub use ingredient::{Ingredient, UnitOfMeasure};
pub use product::Product;
pub use sales::{SalesRecord, SalesSummary};
pub use snapshot::CatalogSnapshot;
