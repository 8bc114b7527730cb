use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whole rupees. Currency symbol is added only when rendering.
pub type Price = u32;

/// Side of the deal taken by the user. The simulated counterpart always
/// takes the opposite side.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display(fmt = "buyer")]
    Buyer,
    #[display(fmt = "seller")]
    Seller,
}

impl Role {
    pub fn counterpart(self) -> Role {
        match self {
            Role::Buyer => Role::Seller,
            Role::Seller => Role::Buyer,
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "seller" => Ok(Role::Seller),
            other => Err(anyhow::anyhow!("Unknown role '{}'.", other)),
        }
    }
}

/// Rounds half away from zero and clamps at zero, so `round_price(42.5) == 43`.
pub fn round_price(value: f64) -> Price {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(Price::MAX as f64) as Price
}

/// Distance between two prices expressed in percent of the market price.
pub fn spread_percent(first: Price, second: Price, market_price: Price) -> f64 {
    let spread = (first as i64 - second as i64).abs() as f64;
    spread / market_price as f64 * 100.0
}

/// Draws `base × (1 + U(-jitter, jitter))`, never less than 1.
pub fn jittered_price<R: Rng + ?Sized>(base: Price, jitter: f64, rng: &mut R) -> Price {
    let factor = if jitter > 0.0 {
        1.0 + rng.gen_range(-jitter..jitter)
    } else {
        1.0
    };
    round_price(base as f64 * factor).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    #[test_case(42.4, 42; "rounds down below half")]
    #[test_case(42.5, 43; "half rounds up")]
    #[test_case(-3.0, 0; "negative clamps to zero")]
    #[test_case(f64::NAN, 0; "nan clamps to zero")]
    fn test_round_price(value: f64, expected: Price) {
        assert_eq!(round_price(value), expected);
    }

    #[test]
    fn test_spread_percent_is_symmetric() {
        assert_eq!(spread_percent(100, 103, 100), 3.0);
        assert_eq!(spread_percent(103, 100, 100), 3.0);
        assert_eq!(spread_percent(80, 120, 100), 40.0);
    }

    #[test]
    fn test_jittered_price_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let price = jittered_price(50, 0.1, &mut rng);
            assert!((45..=55).contains(&price), "price {} out of band", price);
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!(Role::Seller.counterpart(), Role::Buyer);
        assert!("broker".parse::<Role>().is_err());
    }
}
