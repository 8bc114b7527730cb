use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use mandi_builtin_negotiators::Coach;
use mandi_market_utils::{commodity, Price, Role};
use mandi_negotiator_component::static_lib::BoxedCounterpart;

use crate::error::SessionError;
use crate::factory::{create_counterpart, NegotiationConfig};
use crate::session::{NegotiationSession, SessionSnapshot};

/// Pause before the counterpart reply shows up, imitating someone typing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplyDelay {
    #[serde(with = "humantime_serde")]
    pub min: Duration,
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        ReplyDelay {
            min: Duration::from_millis(800),
            max: Duration::from_millis(1400),
        }
    }
}

impl ReplyDelay {
    pub fn none() -> ReplyDelay {
        ReplyDelay {
            min: Duration::from_secs(0),
            max: Duration::from_secs(0),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }
}

struct RoomState {
    session: NegotiationSession,
    /// Bumped on every reset. Replies computed for an older generation are dropped.
    generation: u64,
    pending: bool,
    counterpart: BoxedCounterpart,
    rng: StdRng,
}

/// Single negotiation as seen by the presentation layer. Counterpart replies
/// arrive after `ReplyDelay`, during which new offers are refused.
#[derive(Clone)]
pub struct NegotiationRoom {
    state: Arc<Mutex<RoomState>>,
    coach: Coach,
    reply_delay: ReplyDelay,
}

impl NegotiationRoom {
    pub fn new(config: NegotiationConfig) -> anyhow::Result<NegotiationRoom> {
        let counterpart = create_counterpart(config.counterpart.clone())?;
        Ok(Self::with_counterpart(config, counterpart))
    }

    pub fn with_counterpart(
        config: NegotiationConfig,
        counterpart: BoxedCounterpart,
    ) -> NegotiationRoom {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        NegotiationRoom {
            state: Arc::new(Mutex::new(RoomState {
                session: NegotiationSession::new(config.session),
                generation: 0,
                pending: false,
                counterpart,
                rng,
            })),
            coach: Coach::new(config.coach),
            reply_delay: config.reply_delay,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.session.clone()
    }

    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    pub async fn choose_role(&self, role: Role) -> Result<SessionSnapshot, SessionError> {
        let mut state = self.state.lock().await;
        state.session = state.session.choose_role(role)?;
        Ok(state.session.clone())
    }

    pub async fn choose_commodity(
        &self,
        commodity_id: &str,
    ) -> Result<SessionSnapshot, SessionError> {
        let commodity = commodity::find(commodity_id)
            .ok_or_else(|| SessionError::UnknownCommodity(commodity_id.to_string()))?;

        let mut state = self.state.lock().await;
        let RoomState { session, rng, .. } = &mut *state;
        *session = session.choose_commodity(commodity, rng)?;
        Ok(session.clone())
    }

    pub async fn start_session(
        &self,
        role: Role,
        commodity_id: &str,
    ) -> Result<SessionSnapshot, SessionError> {
        let commodity = commodity::find(commodity_id)
            .ok_or_else(|| SessionError::UnknownCommodity(commodity_id.to_string()))?;

        let mut state = self.state.lock().await;
        let RoomState { session, rng, .. } = &mut *state;
        *session = session.choose_role(role)?.choose_commodity(commodity, rng)?;
        Ok(session.clone())
    }

    pub async fn submit_offer(&self, raw: &str) -> Result<SessionSnapshot, SessionError> {
        let raw = raw.to_string();
        self.exchange(move |session| Ok(session.parse_offer(&raw)?))
            .await
    }

    pub async fn quick_split(&self) -> Result<SessionSnapshot, SessionError> {
        self.exchange(NegotiationSession::split_price).await
    }

    pub async fn quick_accept(&self) -> Result<SessionSnapshot, SessionError> {
        self.exchange(NegotiationSession::accept_price).await
    }

    pub async fn quick_nudge(&self, step: Price) -> Result<SessionSnapshot, SessionError> {
        self.exchange(move |session| session.nudge_price(step)).await
    }

    pub async fn coaching_tip(&self) -> Option<String> {
        self.state.lock().await.session.coaching_tip(&self.coach)
    }

    /// Starts over. A reply still pending for the discarded session will be dropped.
    pub async fn reset(&self) -> SessionSnapshot {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.pending = false;
        state.session = state.session.reset();

        log::info!("Negotiation reset (generation {}).", state.generation);
        state.session.clone()
    }

    async fn exchange<F>(&self, pick_price: F) -> Result<SessionSnapshot, SessionError>
    where
        F: FnOnce(&NegotiationSession) -> Result<Price, SessionError>,
    {
        let (generation, pending, delay) = {
            let mut state = self.state.lock().await;
            if state.pending {
                return Err(SessionError::ResponsePending);
            }

            let price = pick_price(&state.session)?;
            let (session, pending) = state.session.place_offer(price)?;
            state.session = session;
            state.pending = true;

            let delay = self.reply_delay.sample(&mut state.rng);
            (state.generation, pending, delay)
        };

        log::debug!(
            "Offer ₹{} placed, counterpart replies in {:?}.",
            pending.offer().offer,
            delay
        );
        tokio::time::sleep(delay).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            log::debug!(
                "Dropping reply to offer ₹{} from discarded negotiation.",
                pending.offer().offer
            );
            return Ok(state.session.clone());
        }
        state.pending = false;

        let RoomState {
            session,
            counterpart,
            rng,
            ..
        } = &mut *state;
        *session = session.resolve(pending, counterpart, rng)?;
        Ok(session.clone())
    }
}

impl Default for NegotiationRoom {
    fn default() -> Self {
        let config = NegotiationConfig::default();
        let counterpart = Box::new(mandi_builtin_negotiators::Haggler::default());
        Self::with_counterpart(config, counterpart)
    }
}
