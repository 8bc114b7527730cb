use mandi_market_utils::{Language, Phrase, Price};

use crate::session::SessionStatus;

/// Offer input that was refused before reaching the counterpart.
/// Session state is never modified when this error is returned.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Offer price is missing or not a number")]
    MissingPrice,
    #[error("Offer price must be greater than 0")]
    NotPositive,
    #[error("Offer price is above the limit of {limit}")]
    TooHigh { limit: Price },
}

impl ValidationError {
    /// Localization key to show next to the price input.
    pub fn phrase(&self) -> Phrase {
        match self {
            ValidationError::MissingPrice => Phrase::EnterPrice,
            ValidationError::NotPositive => Phrase::PriceNotPositive,
            ValidationError::TooHigh { .. } => Phrase::PriceTooHigh,
        }
    }

    pub fn message(&self, language: Language) -> String {
        self.phrase().render(language)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Can't {action} while session is {status}.")]
    InvalidState {
        action: &'static str,
        status: SessionStatus,
    },
    #[error("Role must be chosen before the commodity.")]
    RoleNotChosen,
    #[error("Commodity '{0}' not found.")]
    UnknownCommodity(String),
    #[error("Market price must be greater than 0.")]
    InvalidMarketPrice,
    #[error("Offer ₹{0} was placed on a different negotiation round.")]
    StaleOffer(Price),
    #[error("Counterpart reply is still pending.")]
    ResponsePending,
    #[error("Counterpart failed to respond. {0}")]
    Counterpart(anyhow::Error),
}

impl SessionError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SessionError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
