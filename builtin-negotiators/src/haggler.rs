use anyhow::bail;
use serde::{Deserialize, Serialize};

use mandi_market_utils::{round_price, Price};
use mandi_negotiator_component::{
    CounterpartComponent, CounterpartFactory, NegotiationResult, OfferContext, RejectReason,
};

use crate::reasonable::ReasonableBand;

/// Counterpart that haggles like a mandi trader: ignores absurd offers, closes
/// when prices get close and otherwise concedes part of the remaining gap.
/// Gets more flexible after a few rounds so that negotiations always end.
#[derive(Clone, Debug, Default)]
pub struct Haggler {
    config: Config,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub band: ReasonableBand,
    /// Spread, in percent of market price, below which any offer is accepted.
    pub accept_spread_percent: f64,
    /// Wider acceptance spread used once `patience_rounds` have passed.
    pub late_accept_spread_percent: f64,
    pub patience_rounds: u32,
    /// Fraction of the gap to the user's offer given up on each counter.
    pub concession: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            band: ReasonableBand::default(),
            accept_spread_percent: 5.0,
            late_accept_spread_percent: 12.0,
            patience_rounds: 3,
            concession: 0.35,
        }
    }
}

impl CounterpartFactory for Haggler {
    fn new(_name: &str, config: serde_yaml::Value) -> anyhow::Result<Haggler> {
        let config: Config = match config {
            serde_yaml::Value::Null => Config::default(),
            config => serde_yaml::from_value(config)?,
        };
        Haggler::with_config(config)
    }
}

impl Haggler {
    pub fn with_config(config: Config) -> anyhow::Result<Haggler> {
        config.band.validate()?;
        if !(config.concession > 0.0 && config.concession <= 1.0) {
            bail!(
                "Haggler concession must be in range (0, 1], got {}.",
                config.concession
            );
        }
        if config.late_accept_spread_percent < config.accept_spread_percent {
            bail!(
                "Haggler late acceptance spread {}% is narrower than acceptance spread {}%.",
                config.late_accept_spread_percent,
                config.accept_spread_percent
            );
        }
        Ok(Haggler { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn accepts(&self, spread_percent: f64, round: u32) -> bool {
        spread_percent < self.config.accept_spread_percent
            || (round > self.config.patience_rounds
                && spread_percent < self.config.late_accept_spread_percent)
    }

    /// Moves `current` toward `target` by the concession fraction of the gap,
    /// at least one rupee and never past `target`.
    fn concede(&self, current: Price, target: Price) -> Price {
        let gap = target as i64 - current as i64;
        let step = (round_price(gap.abs() as f64 * self.config.concession) as i64)
            .max(1)
            .min(gap.abs());
        (current as i64 + step * gap.signum()) as Price
    }
}

impl CounterpartComponent for Haggler {
    fn respond(&mut self, offer: &OfferContext) -> anyhow::Result<NegotiationResult> {
        if !self.config.band.is_reasonable(offer.offer, offer.market_price) {
            log::info!(
                "Haggler: Reject offer ₹{} since market price is ₹{}.",
                offer.offer,
                offer.market_price
            );
            return Ok(NegotiationResult::Reject {
                reason: RejectReason::new("Offer outside of reasonable band")
                    .entry("offer", offer.offer)
                    .entry("market_price", offer.market_price),
            });
        }

        let spread = offer.spread_percent();
        if self.accepts(spread, offer.round) {
            log::info!(
                "Haggler: Accept ₹{} in round {} (spread {:.1}%).",
                offer.offer,
                offer.round,
                spread
            );
            return Ok(NegotiationResult::Accept { price: offer.offer });
        }

        let price = self.concede(offer.counterpart_price, offer.offer);
        log::debug!(
            "Haggler: Counter ₹{} with ₹{} in round {} (spread {:.1}%).",
            offer.offer,
            price,
            offer.round,
            spread
        );
        Ok(NegotiationResult::Counter { price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandi_market_utils::{spread_percent, Role};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    fn context(role: Role, offer: Price, counterpart_price: Price, round: u32) -> OfferContext {
        OfferContext {
            role,
            offer,
            counterpart_price,
            market_price: 100,
            round,
        }
    }

    fn respond(offer: &OfferContext) -> NegotiationResult {
        Haggler::default().respond(offer).unwrap()
    }

    #[test]
    fn test_immediate_accept() {
        let result = respond(&context(Role::Buyer, 100, 103, 1));
        assert_eq!(result, NegotiationResult::Accept { price: 100 });
    }

    #[test]
    fn test_out_of_band_reject() {
        match respond(&context(Role::Buyer, 200, 112, 1)) {
            NegotiationResult::Reject { reason } => {
                assert_eq!(reason.get::<Price>("offer"), Some(200));
                assert_eq!(reason.get::<Price>("market_price"), Some(100));
            }
            result => panic!("Expected reject, got {:?}", result),
        }
    }

    #[test_case(Role::Buyer, 80, 120, 106; "seller lowers the price")]
    #[test_case(Role::Seller, 120, 80, 94; "buyer raises the price")]
    #[test_case(Role::Buyer, 120, 100, 107; "crossed offer still moves toward it")]
    fn test_counter_math(role: Role, offer: Price, counterpart_price: Price, expected: Price) {
        let result = respond(&context(role, offer, counterpart_price, 1));
        assert_eq!(result, NegotiationResult::Counter { price: expected });
    }

    #[test]
    fn test_late_widened_acceptance() {
        let result = respond(&context(Role::Buyer, 95, 105, 4));
        assert_eq!(result, NegotiationResult::Accept { price: 95 });

        let result = respond(&context(Role::Buyer, 95, 105, 3));
        assert_eq!(result, NegotiationResult::Counter { price: 101 });
    }

    #[test]
    fn test_small_gap_concedes_at_least_one() {
        let mut haggler = Haggler::default();
        let result = haggler
            .respond(&OfferContext {
                role: Role::Buyer,
                offer: 10,
                counterpart_price: 11,
                market_price: 10,
                round: 1,
            })
            .unwrap();
        assert_eq!(result, NegotiationResult::Counter { price: 10 });
    }

    #[test]
    fn test_acceptance_thresholds_on_random_offers() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut haggler = Haggler::default();

        for _ in 0..1000 {
            let market_price = rng.gen_range(10..=1000);
            let offer = rng.gen_range(market_price / 2 + 1..=market_price * 3 / 2);
            let counterpart_price = rng.gen_range(1..=market_price * 2);
            let round = rng.gen_range(1..=10);
            let spread = spread_percent(offer, counterpart_price, market_price);

            let result = haggler
                .respond(&OfferContext {
                    role: Role::Buyer,
                    offer,
                    counterpart_price,
                    market_price,
                    round,
                })
                .unwrap();

            if spread < 5.0 {
                assert_eq!(result, NegotiationResult::Accept { price: offer });
            }
            if round <= 3 && spread >= 5.0 {
                assert!(!matches!(result, NegotiationResult::Accept { .. }));
            }
        }
    }

    #[test]
    fn test_counter_convergence() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut haggler = Haggler::default();
        let mut counters = 0;

        for _ in 0..1000 {
            let role = if rng.gen_bool(0.5) {
                Role::Buyer
            } else {
                Role::Seller
            };
            let market_price = rng.gen_range(10..=1000);
            let offer = rng.gen_range(market_price / 2 + 1..=market_price * 3 / 2);
            let counterpart_price = match role {
                Role::Buyer => rng.gen_range(offer..=offer * 2),
                Role::Seller => rng.gen_range(offer / 2..=offer),
            };
            let offer_context = OfferContext {
                role,
                offer,
                counterpart_price,
                market_price,
                round: rng.gen_range(1..=3),
            };

            if let NegotiationResult::Counter { price } = haggler.respond(&offer_context).unwrap() {
                counters += 1;
                let before = (counterpart_price as i64 - offer as i64).abs();
                let after = (price as i64 - offer as i64).abs();
                assert!(
                    after < before,
                    "Counter {} didn't get closer to offer {} than {}",
                    price,
                    offer,
                    counterpart_price
                );
                match role {
                    Role::Buyer => assert!(price >= offer),
                    Role::Seller => assert!(price <= offer),
                }
            }
        }
        assert!(counters > 0);
    }

    #[test]
    fn test_config_from_yaml() {
        let haggler = Haggler::new("Haggler", serde_yaml::from_str("concession: 0.5").unwrap())
            .unwrap();
        assert_eq!(haggler.config().concession, 0.5);
        assert_eq!(haggler.config().patience_rounds, 3);

        let haggler = Haggler::new("Haggler", serde_yaml::Value::Null).unwrap();
        assert_eq!(haggler.config(), &Config::default());

        assert!(Haggler::new("Haggler", serde_yaml::from_str("concession: 1.5").unwrap()).is_err());
    }
}
