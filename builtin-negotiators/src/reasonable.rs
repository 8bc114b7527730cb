use serde::{Deserialize, Serialize};

use mandi_market_utils::Price;

/// Closed band of prices, relative to market price, that a counterpart is
/// willing to discuss at all.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReasonableBand {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for ReasonableBand {
    fn default() -> Self {
        ReasonableBand {
            min_ratio: 0.5,
            max_ratio: 1.5,
        }
    }
}

impl ReasonableBand {
    pub fn is_reasonable(&self, offer: Price, market_price: Price) -> bool {
        let offer = offer as f64;
        let market_price = market_price as f64;
        offer >= market_price * self.min_ratio && offer <= market_price * self.max_ratio
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.min_ratio >= 0.0 && self.min_ratio <= 1.0 && self.max_ratio >= 1.0) {
            anyhow::bail!(
                "Invalid reasonable band [{}, {}]. Band must contain market price.",
                self.min_ratio,
                self.max_ratio
            );
        }
        Ok(())
    }
}

/// Checks offer against the default band `[0.5, 1.5] × market_price`.
pub fn is_reasonable(offer: Price, market_price: Price) -> bool {
    ReasonableBand::default().is_reasonable(offer, market_price)
}
