use serde::{Deserialize, Serialize};

use mandi_market_utils::{spread_percent, Language, Phrase, Price};

/// Gives the user a short hint based on how far apart both sides are.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    config: Config,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Below this spread (percent of market price) user is told to close the deal.
    pub close_spread_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            close_spread_percent: 8.0,
        }
    }
}

impl Coach {
    pub fn new(config: Config) -> Coach {
        Coach { config }
    }

    pub fn advice(&self, user_price: Price, counterpart_price: Price, market_price: Price) -> Phrase {
        if spread_percent(user_price, counterpart_price, market_price)
            < self.config.close_spread_percent
        {
            Phrase::CoachClose
        } else {
            Phrase::CoachMarket { market_price }
        }
    }

    pub fn tip(
        &self,
        user_price: Price,
        counterpart_price: Price,
        market_price: Price,
        language: Language,
    ) -> String {
        self.advice(user_price, counterpart_price, market_price)
            .render(language)
    }
}
