//! Menu analysis query handlers.

mod analyze_menu;

pub use analyze_menu::{AnalyzeMenuHandler, AnalyzeMenuQuery, AnalyzeMenuResult};
