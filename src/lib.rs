//! Menu Pricing - Cost rollup and multi-channel pricing engine
//!
//! Resolves recipe costs through nested compositions, prices products per
//! sales channel by target margin or CMV, classifies the menu into the
//! menu engineering matrix and suggests re-pricing after ingredient cost
//! increases. The domain is pure and synchronous; handlers in `application`
//! fetch snapshots through `ports` and persist accepted results.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
