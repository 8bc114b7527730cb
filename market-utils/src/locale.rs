//! Flat string tables for everything the negotiation core says out loud.
//!
//! The core never owns display strings: it produces a [`Phrase`] (a key plus
//! its placeholder values) and renders it for the session [`Language`] at the
//! edge.
use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::commodity;
use crate::price::{Price, Role};

/// Number of equivalent phrasings for a counter-offer.
pub const COUNTER_VARIANTS: usize = 3;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[display(fmt = "en")]
    En,
    #[display(fmt = "hi")]
    Hi,
    #[display(fmt = "te")]
    Te,
    #[display(fmt = "ta")]
    Ta,
    #[display(fmt = "bn")]
    Bn,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "te" => Ok(Language::Te),
            "ta" => Ok(Language::Ta),
            "bn" => Ok(Language::Bn),
            other => Err(anyhow::anyhow!("Unsupported language '{}'.", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum Phrase {
    /// Counterpart's first quote. `role` is the user's role.
    Opening {
        role: Role,
        commodity: String,
        price: Price,
        unit: String,
    },
    UserOffer {
        price: Price,
    },
    Rejected {
        offer: Price,
        market_price: Price,
    },
    Accepted {
        price: Price,
    },
    Counter {
        price: Price,
        variant: usize,
    },
    CoachClose,
    CoachMarket {
        market_price: Price,
    },
    EnterPrice,
    PriceNotPositive,
    PriceTooHigh,
}

impl Phrase {
    /// Picks one of the equivalent counter-offer phrasings.
    pub fn counter<R: Rng + ?Sized>(price: Price, rng: &mut R) -> Phrase {
        Phrase::Counter {
            price,
            variant: rng.gen_range(0..COUNTER_VARIANTS),
        }
    }

    pub fn render(&self, language: Language) -> String {
        use Language::*;

        match self {
            Phrase::Opening {
                role,
                commodity: id,
                price,
                unit,
            } => {
                let name = commodity::find(id)
                    .map(|commodity| commodity.name(language).to_string())
                    .unwrap_or_else(|| id.clone());
                match (role, language) {
                    (Role::Buyer, En) => format!("Fresh {}! ₹{}/{}", name, price, unit),
                    (Role::Buyer, Hi) => format!("ताजा {}! ₹{}/{}", name, price, unit),
                    (Role::Buyer, Te) => format!("తాజా {}! ₹{}/{}", name, price, unit),
                    (Role::Buyer, Ta) => format!("புதிய {}! ₹{}/{}", name, price, unit),
                    (Role::Buyer, Bn) => format!("তাজা {}! ₹{}/{}", name, price, unit),
                    (Role::Seller, En) => format!("Need {}. ₹{}/{}", name, price, unit),
                    (Role::Seller, Hi) => format!("{} चाहिए। ₹{}/{}", name, price, unit),
                    (Role::Seller, Te) => format!("{} కావాలి। ₹{}/{}", name, price, unit),
                    (Role::Seller, Ta) => format!("{} வேண்டும். ₹{}/{}", name, price, unit),
                    (Role::Seller, Bn) => format!("{} দরকার। ₹{}/{}", name, price, unit),
                }
            }
            Phrase::UserOffer { price } => format!("₹{}", price),
            Phrase::Rejected {
                offer,
                market_price: market,
            } => match language {
                En => format!("₹{}? That's not realistic. Market is ₹{}. Try again.", offer, market),
                Hi => format!("₹{}? ये सही नहीं है। बाजार भाव ₹{}। फिर से बोलो।", offer, market),
                Te => format!("₹{}? ఇది సరైనది కాదు. మార్కెట్ ₹{}. మళ్ళీ చెప్పండి.", offer, market),
                Ta => format!("₹{}? இது சரியல்ல. சந்தை ₹{}. மீண்டும் முயற்சி.", offer, market),
                Bn => format!("₹{}? এটা ঠিক নয়। বাজার ₹{}। আবার বলুন।", offer, market),
            },
            Phrase::Accepted { price } => match language {
                En => format!("Done! ₹{} 🤝", price),
                Hi => format!("पक्का! ₹{} 🤝", price),
                Te => format!("ఓకే! ₹{} 🤝", price),
                Ta => format!("சரி! ₹{} 🤝", price),
                Bn => format!("ঠিক! ₹{} 🤝", price),
            },
            Phrase::Counter { price, variant } => match (variant % COUNTER_VARIANTS, language) {
                (0, _) => format!("₹{}?", price),
                (1, En) => format!("Best: ₹{}", price),
                (1, Hi) => format!("फाइनल: ₹{}", price),
                (1, Te) => format!("ఫైనల్: ₹{}", price),
                (1, Ta) => format!("இறுதி: ₹{}", price),
                (1, Bn) => format!("ফাইনাল: ₹{}", price),
                (_, En) => format!("How about ₹{}?", price),
                (_, Hi) => format!("₹{} चलेगा?", price),
                (_, Te) => format!("₹{} ఓకేనా?", price),
                (_, Ta) => format!("₹{} சரியா?", price),
                (_, Bn) => format!("₹{} হবে?", price),
            },
            Phrase::CoachClose => match language {
                En => "💡 Close! Split or accept.".to_string(),
                Hi => "💡 करीब! बीच में मिलें।".to_string(),
                Te => "💡 దగ్గరలో! మధ్యలో కలవండి।".to_string(),
                Ta => "💡 நெருக்கம்! நடுவில் சேருங்கள்।".to_string(),
                Bn => "💡 কাছে! মাঝে মিলুন।".to_string(),
            },
            Phrase::CoachMarket {
                market_price: market,
            } => match language {
                En => format!("💡 Market: ₹{}. Stay within ±50%", market),
                Hi => format!("💡 बाजार: ₹{}. ±50% में रहें", market),
                Te => format!("💡 మార్కెట్: ₹{}. ±50% లో ఉండండి", market),
                Ta => format!("💡 சந்தை: ₹{}. ±50% இருங்கள்", market),
                Bn => format!("💡 বাজার: ₹{}. ±50% থাকুন", market),
            },
            // Input validation messages only exist in English and Hindi.
            Phrase::EnterPrice => match language {
                Hi => "कृपया मूल्य दर्ज करें".to_string(),
                _ => "Please enter a price".to_string(),
            },
            Phrase::PriceNotPositive => match language {
                Hi => "मूल्य 0 से अधिक होना चाहिए".to_string(),
                _ => "Price must be greater than 0".to_string(),
            },
            Phrase::PriceTooHigh => match language {
                Hi => "मूल्य बहुत अधिक है".to_string(),
                _ => "Price too high".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    #[test_case("hi", Language::Hi)]
    #[test_case(" BN ", Language::Bn)]
    fn test_language_parsing(code: &str, expected: Language) {
        assert_eq!(code.parse::<Language>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_language_is_error() {
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_opening_names_commodity_in_language() {
        let phrase = Phrase::Opening {
            role: Role::Buyer,
            commodity: "rice".to_string(),
            price: 56,
            unit: "kg".to_string(),
        };
        assert_eq!(phrase.render(Language::En), "Fresh Rice! ₹56/kg");
        assert_eq!(phrase.render(Language::Hi), "ताजा चावल! ₹56/kg");
    }

    #[test]
    fn test_validation_phrases_fall_back_to_english() {
        assert_eq!(Phrase::PriceTooHigh.render(Language::Ta), "Price too high");
        assert_eq!(Phrase::PriceTooHigh.render(Language::Hi), "मूल्य बहुत अधिक है");
    }

    #[test]
    fn test_counter_variants_embed_price() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let phrase = Phrase::counter(106, &mut rng);
            match &phrase {
                Phrase::Counter { variant, .. } => assert!(*variant < COUNTER_VARIANTS),
                _ => panic!("Expected counter phrase"),
            }
            for language in &[Language::En, Language::Hi, Language::Te, Language::Ta, Language::Bn] {
                assert!(phrase.render(*language).contains("₹106"));
            }
        }
    }

    #[test]
    fn test_phrase_serializes_with_key_tag() {
        let json = serde_json::to_value(&Phrase::Accepted { price: 100 }).unwrap();
        assert_eq!(json, serde_json::json!({"key": "accepted", "price": 100}));
    }
}
