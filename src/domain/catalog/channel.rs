//! Sales channels and their commission.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, Rate, ValidationError};

/// A place a product is sold: the counter, or a delivery app keeping a
/// commission on every sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    /// Fraction of the price retained by the channel operator.
    pub commission_rate: Rate,
    pub is_counter: bool,
}

impl Channel {
    /// Creates a commissioned channel.
    pub fn new(
        id: ChannelId,
        name: impl Into<String>,
        commission_rate: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id,
            name,
            commission_rate: Rate::try_new("commission_rate", commission_rate)?,
            is_counter: false,
        })
    }

    /// Creates the counter (walk-in) channel. Commission is zero.
    pub fn counter(id: ChannelId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let mut channel = Self::new(id, name, 0.0)?;
        channel.is_counter = true;
        Ok(channel)
    }

    /// Commission as a plain fraction.
    pub fn commission(&self) -> f64 {
        self.commission_rate.value()
    }
}
