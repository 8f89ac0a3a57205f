//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, currency rounding, and error types
//! that form the vocabulary of the pricing domain.

mod errors;
mod ids;
mod money;
mod rate;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BusinessId, ChannelId, IngredientId, PriceChangeId, ProductId};
pub use money::{ceil_to_cents, round_to_cents, CENT};
pub use rate::Rate;
pub use timestamp::Timestamp;
