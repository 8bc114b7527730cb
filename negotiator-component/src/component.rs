use serde::{Deserialize, Serialize};

use mandi_market_utils::{spread_percent, Price, Role};

use crate::reason::RejectReason;

/// Everything a counterpart may look at when answering a single user offer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferContext {
    /// Role taken by the user; the counterpart plays the other side.
    pub role: Role,
    pub offer: Price,
    /// Counterpart's last quoted price.
    pub counterpart_price: Price,
    pub market_price: Price,
    /// Starts at 1 and grows with every counter-offer.
    pub round: u32,
}

impl OfferContext {
    pub fn spread_percent(&self) -> f64 {
        spread_percent(self.offer, self.counterpart_price, self.market_price)
    }
}

/// Decision returned by `CounterpartComponent` for a single user offer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum NegotiationResult {
    /// Deal is closed at `price`.
    Accept { price: Price },
    /// Counterpart moves its quote to `price` and negotiations continue.
    Counter { price: Price },
    /// Offer is not considered at all. Counterpart quote and round stay as they were,
    /// so the user has to try again.
    Reject { reason: RejectReason },
}

impl NegotiationResult {
    pub fn price(&self) -> Option<Price> {
        match self {
            NegotiationResult::Accept { price } | NegotiationResult::Counter { price } => {
                Some(*price)
            }
            NegotiationResult::Reject { .. } => None,
        }
    }
}

/// `CounterpartComponent` implements the simulated other side of the deal.
///
/// Implementations only decide. Phrasing the decision and applying it to the
/// session is done by the caller, so the decision path stays free of
/// presentation randomness and can be tested deterministically.
pub trait CounterpartComponent {
    /// Answer a single offer made by the user.
    fn respond(&mut self, offer: &OfferContext) -> anyhow::Result<NegotiationResult>;

    /// Called when a session ends with a deal. Counterparts can use it to adjust
    /// their strategy for future sessions.
    fn on_deal_closed(&mut self, _offer: &OfferContext, _deal_price: Price) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<T: CounterpartComponent + ?Sized> CounterpartComponent for Box<T> {
    fn respond(&mut self, offer: &OfferContext) -> anyhow::Result<NegotiationResult> {
        (**self).respond(offer)
    }

    fn on_deal_closed(&mut self, offer: &OfferContext, deal_price: Price) -> anyhow::Result<()> {
        (**self).on_deal_closed(offer, deal_price)
    }
}
