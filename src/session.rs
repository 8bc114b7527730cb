//! Round-by-round bargaining session between the user and a simulated counterpart.
//!
//! ```text
//! Selecting --(role, commodity)--> Active --(accepted offer)--> Completed
//! ```
//!
//! Every operation takes the current session by reference and returns a new
//! one, or an error leaving the original untouched. Randomness (market price
//! jitter and reply phrasing) is always injected by the caller.
use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};

use mandi_builtin_negotiators::Coach;
use mandi_market_utils::{
    jittered_price, round_price, Commodity, Language, Message, MessageKind, Phrase, Price, Role,
    Sender,
};
use mandi_negotiator_component::{CounterpartComponent, NegotiationResult, OfferContext};

use crate::error::{SessionError, ValidationError};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[display(fmt = "selecting")]
    Selecting,
    #[display(fmt = "active")]
    Active,
    #[display(fmt = "completed")]
    Completed,
}

impl SessionStatus {
    pub fn can_transition_to(self, target: SessionStatus) -> bool {
        matches!(
            (self, target),
            (SessionStatus::Selecting, SessionStatus::Active)
                | (SessionStatus::Active, SessionStatus::Completed)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub language: Language,
    /// Units traded in every deal.
    pub quantity: u32,
    /// Sanity ceiling for typed offers, independent of market price.
    pub max_offer: Price,
    /// Market price is drawn from `base_price × (1 ± market_jitter)`.
    pub market_jitter: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            language: Language::En,
            quantity: 50,
            max_offer: 10_000,
            market_jitter: 0.1,
        }
    }
}

/// User offer already written to the log, waiting for the counterpart reply.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOffer {
    context: OfferContext,
}

impl PendingOffer {
    pub fn offer(&self) -> &OfferContext {
        &self.context
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSession {
    config: SessionConfig,
    role: Option<Role>,
    commodity: Option<Commodity>,
    market_price: Price,
    user_price: Price,
    counterpart_price: Price,
    round: u32,
    status: SessionStatus,
    deal_price: Option<Price>,
    messages: Vec<Message>,
}

/// Read-only view handed to the presentation layer.
pub type SessionSnapshot = NegotiationSession;

/// Parses price typed by the user. Fractions are truncated.
pub fn parse_offer(raw: &str, max_offer: Price) -> Result<Price, ValidationError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::MissingPrice)?
        .trunc();

    if value <= 0.0 {
        return Err(ValidationError::NotPositive);
    }
    check_price(value as Price, max_offer)
}

fn check_price(price: Price, max_offer: Price) -> Result<Price, ValidationError> {
    if price == 0 {
        Err(ValidationError::NotPositive)
    } else if price > max_offer {
        Err(ValidationError::TooHigh { limit: max_offer })
    } else {
        Ok(price)
    }
}

impl NegotiationSession {
    pub fn new(config: SessionConfig) -> NegotiationSession {
        NegotiationSession {
            config,
            role: None,
            commodity: None,
            market_price: 0,
            user_price: 0,
            counterpart_price: 0,
            round: 0,
            status: SessionStatus::Selecting,
            deal_price: None,
            messages: vec![],
        }
    }

    /// Discards everything and starts over in `Selecting` state.
    pub fn reset(&self) -> NegotiationSession {
        NegotiationSession::new(self.config.clone())
    }

    pub fn choose_role(&self, role: Role) -> Result<NegotiationSession, SessionError> {
        self.expect_status(SessionStatus::Selecting, "choose role")?;

        let mut next = self.clone();
        next.role = Some(role);
        Ok(next)
    }

    /// Opens negotiations for `commodity` at a market price jittered around its base price.
    pub fn choose_commodity<R: Rng + ?Sized>(
        &self,
        commodity: &Commodity,
        rng: &mut R,
    ) -> Result<NegotiationSession, SessionError> {
        self.expect_status(SessionStatus::Selecting, "choose commodity")?;
        let market_price = jittered_price(commodity.base_price, self.config.market_jitter, rng);
        self.open(commodity, market_price)
    }

    /// Opens negotiations at a known market price. User starts on the favorable
    /// side of the market, counterpart on the other one.
    pub fn open(
        &self,
        commodity: &Commodity,
        market_price: Price,
    ) -> Result<NegotiationSession, SessionError> {
        self.expect_status(SessionStatus::Selecting, "open negotiations")?;
        let role = self.role.ok_or(SessionError::RoleNotChosen)?;
        if market_price == 0 {
            return Err(SessionError::InvalidMarketPrice);
        }

        let market = market_price as f64;
        let (user_price, counterpart_price) = match role {
            Role::Buyer => (round_price(market * 0.85), round_price(market * 1.12)),
            Role::Seller => (round_price(market * 1.15), round_price(market * 0.88)),
        };

        let mut next = self.clone();
        next.commodity = Some(commodity.clone());
        next.market_price = market_price;
        next.user_price = user_price;
        next.counterpart_price = counterpart_price;
        next.round = 1;
        next.status = SessionStatus::Active;
        next.push_message(
            Sender::Counterpart,
            MessageKind::Offer,
            Phrase::Opening {
                role,
                commodity: commodity.id.clone(),
                price: counterpart_price,
                unit: commodity.unit.clone(),
            },
            Some(counterpart_price),
        );

        log::info!(
            "Negotiation opened: user is {} of '{}', market ₹{}, user ₹{}, counterpart ₹{}.",
            role,
            commodity.id,
            market_price,
            user_price,
            counterpart_price
        );
        Ok(next)
    }

    pub fn parse_offer(&self, raw: &str) -> Result<Price, ValidationError> {
        parse_offer(raw, self.config.max_offer)
    }

    /// First half of an exchange: logs the user offer. The counterpart reply is
    /// applied later with `resolve`.
    pub fn place_offer(
        &self,
        price: Price,
    ) -> Result<(NegotiationSession, PendingOffer), SessionError> {
        let role = self.active_role("make an offer")?;
        let price = check_price(price, self.config.max_offer)?;

        let mut next = self.clone();
        next.user_price = price;
        next.push_message(
            Sender::User,
            MessageKind::Counter,
            Phrase::UserOffer { price },
            Some(price),
        );

        let pending = PendingOffer {
            context: OfferContext {
                role,
                offer: price,
                counterpart_price: self.counterpart_price,
                market_price: self.market_price,
                round: self.round,
            },
        };
        Ok((next, pending))
    }

    /// Second half of an exchange: asks the counterpart and applies its decision.
    pub fn resolve<C, R>(
        &self,
        pending: PendingOffer,
        counterpart: &mut C,
        rng: &mut R,
    ) -> Result<NegotiationSession, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        self.active_role("resolve an offer")?;
        let offer = pending.context;
        if offer.round != self.round
            || offer.counterpart_price != self.counterpart_price
            || offer.offer != self.user_price
        {
            return Err(SessionError::StaleOffer(offer.offer));
        }

        let result = counterpart
            .respond(&offer)
            .map_err(SessionError::Counterpart)?;

        let mut next = self.clone();
        match result {
            NegotiationResult::Reject { reason } => {
                log::info!(
                    "Counterpart rejected offer ₹{} in round {}. Reason: {}",
                    offer.offer,
                    offer.round,
                    reason
                );
                next.push_message(
                    Sender::Counterpart,
                    MessageKind::Reject,
                    Phrase::Rejected {
                        offer: offer.offer,
                        market_price: offer.market_price,
                    },
                    Some(self.counterpart_price),
                );
            }
            NegotiationResult::Counter { price } => {
                log::debug!(
                    "Counterpart countered ₹{} with ₹{} in round {}.",
                    offer.offer,
                    price,
                    offer.round
                );
                next.counterpart_price = price;
                next.round += 1;
                next.push_message(
                    Sender::Counterpart,
                    MessageKind::Counter,
                    Phrase::counter(price, rng),
                    Some(price),
                );
            }
            NegotiationResult::Accept { price } => {
                // Deal locks at the user's own offer, whatever price the counterpart reported.
                log::info!(
                    "Deal closed at ₹{} in round {} (counterpart reported ₹{}).",
                    offer.offer,
                    offer.round,
                    price
                );
                next.status = SessionStatus::Completed;
                next.deal_price = Some(offer.offer);
                next.push_message(
                    Sender::Counterpart,
                    MessageKind::Accept,
                    Phrase::Accepted { price: offer.offer },
                    Some(offer.offer),
                );
                counterpart
                    .on_deal_closed(&offer, offer.offer)
                    .map_err(|e| log::warn!("Counterpart failed handling closed deal. {}", e))
                    .ok();
            }
        }
        Ok(next)
    }

    /// Validates the typed price and runs a whole exchange synchronously.
    pub fn submit_offer<C, R>(
        &self,
        raw: &str,
        counterpart: &mut C,
        rng: &mut R,
    ) -> Result<NegotiationSession, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        let price = self.parse_offer(raw)?;
        self.submit_price(price, counterpart, rng)
    }

    pub fn submit_price<C, R>(
        &self,
        price: Price,
        counterpart: &mut C,
        rng: &mut R,
    ) -> Result<NegotiationSession, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        let (next, pending) = self.place_offer(price)?;
        next.resolve(pending, counterpart, rng)
    }

    /// Offer halfway between both current prices.
    pub fn split_price(&self) -> Result<Price, SessionError> {
        self.active_role("split the difference")?;
        Ok(round_price(
            (self.user_price as f64 + self.counterpart_price as f64) / 2.0,
        ))
    }

    /// Offer equal to the counterpart's last quote.
    pub fn accept_price(&self) -> Result<Price, SessionError> {
        self.active_role("accept counterpart price")?;
        Ok(self.counterpart_price)
    }

    /// User price moved by `step` toward the counterpart: up when buying, down
    /// when selling. Never below 1.
    pub fn nudge_price(&self, step: Price) -> Result<Price, SessionError> {
        let price = match self.active_role("nudge the price")? {
            Role::Buyer => self.user_price as i64 + step as i64,
            Role::Seller => self.user_price as i64 - step as i64,
        };
        Ok(price.max(1).min(Price::MAX as i64) as Price)
    }

    pub fn quick_split<C, R>(&self, counterpart: &mut C, rng: &mut R) -> Result<Self, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        self.submit_price(self.split_price()?, counterpart, rng)
    }

    pub fn quick_accept<C, R>(&self, counterpart: &mut C, rng: &mut R) -> Result<Self, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        self.submit_price(self.accept_price()?, counterpart, rng)
    }

    pub fn quick_nudge<C, R>(
        &self,
        step: Price,
        counterpart: &mut C,
        rng: &mut R,
    ) -> Result<Self, SessionError>
    where
        C: CounterpartComponent + ?Sized,
        R: Rng + ?Sized,
    {
        self.submit_price(self.nudge_price(step)?, counterpart, rng)
    }

    /// Hint for the user. Only available while negotiating.
    pub fn coaching_tip(&self, coach: &Coach) -> Option<String> {
        match self.status {
            SessionStatus::Active => Some(coach.tip(
                self.user_price,
                self.counterpart_price,
                self.market_price,
                self.config.language,
            )),
            _ => None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn commodity(&self) -> Option<&Commodity> {
        self.commodity.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.config.quantity
    }

    pub fn market_price(&self) -> Price {
        self.market_price
    }

    pub fn user_price(&self) -> Price {
        self.user_price
    }

    pub fn counterpart_price(&self) -> Price {
        self.counterpart_price
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn deal_price(&self) -> Option<Price> {
        self.deal_price
    }

    /// Amount paid for the whole quantity once the deal is closed.
    pub fn deal_total(&self) -> Option<u64> {
        self.deal_price
            .map(|price| price as u64 * self.config.quantity as u64)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn expect_status(
        &self,
        expected: SessionStatus,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if self.status != expected {
            return Err(SessionError::InvalidState {
                action,
                status: self.status,
            });
        }
        Ok(())
    }

    fn active_role(&self, action: &'static str) -> Result<Role, SessionError> {
        self.expect_status(SessionStatus::Active, action)?;
        self.role.ok_or(SessionError::RoleNotChosen)
    }

    fn push_message(
        &mut self,
        sender: Sender,
        kind: MessageKind,
        phrase: Phrase,
        price: Option<Price>,
    ) {
        let seq = self.messages.len() + 1;
        self.messages.push(Message::new(
            seq,
            sender,
            kind,
            phrase,
            price,
            self.config.language,
        ));
    }
}
