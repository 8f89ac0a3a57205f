//! Menu products and their per-channel prices.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{ChannelId, ProductId, ValidationError};

/// A sellable menu item.
///
/// `base_price` is the counter price. `channel_prices` holds overrides for
/// other channels; a channel without an entry sells at `base_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    #[serde(default)]
    pub channel_prices: HashMap<ChannelId, f64>,
    /// Units produced by one batch of the product's recipe.
    #[serde(rename = "yield", default = "default_yield")]
    pub yield_quantity: f64,
}

fn default_yield() -> f64 {
    1.0
}

impl Product {
    /// Creates a product with a single-unit yield and no channel overrides.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        validate_price("base_price", base_price)?;
        Ok(Self {
            id,
            name,
            category: category.into(),
            base_price,
            channel_prices: HashMap::new(),
            yield_quantity: default_yield(),
        })
    }

    /// Sets the batch yield.
    pub fn with_yield(mut self, yield_quantity: f64) -> Self {
        self.yield_quantity = yield_quantity;
        self
    }

    /// Sets a channel price override.
    pub fn with_channel_price(
        mut self,
        channel_id: ChannelId,
        price: f64,
    ) -> Result<Self, ValidationError> {
        validate_price("channel_price", price)?;
        self.channel_prices.insert(channel_id, price);
        Ok(self)
    }

    /// Price charged on a channel, falling back to the base price.
    pub fn price_for(&self, channel_id: &ChannelId) -> f64 {
        self.channel_prices
            .get(channel_id)
            .copied()
            .unwrap_or(self.base_price)
    }

    /// True if the channel has its own price rather than the base price.
    pub fn has_override_for(&self, channel_id: &ChannelId) -> bool {
        self.channel_prices.contains_key(channel_id)
    }

    /// Yield used as a divisor; never below one unit.
    pub fn effective_yield(&self) -> f64 {
        if self.yield_quantity.is_finite() {
            self.yield_quantity.max(1.0)
        } else {
            1.0
        }
    }
}

/// Prices may be zero (not yet priced) but never negative.
fn validate_price(field: &str, price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::out_of_range(field, 0.0, f64::MAX, price));
    }
    Ok(())
}
