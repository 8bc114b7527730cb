use anyhow::anyhow;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mandi_market_utils::{commodity, Price, Role};
use mandi_negotiator_component::static_lib::BoxedCounterpart;
use mandi_negotiators::{
    create_counterpart, NegotiationConfig, NegotiationSession, SessionError, SessionStatus,
};

use crate::error::FrameworkError;
use crate::negotiation_record::NegotiationRecord;

/// How the emulated user picks the next offer.
#[derive(Clone, Debug)]
pub enum UserStrategy {
    /// Opens with the session's starting user price, then takes every counter-offer.
    AcceptCounter,
    /// Always offers halfway between both prices.
    Split,
    /// Moves own price toward the counterpart by a fixed step.
    Nudge(Price),
    /// Repeats the same offer forever.
    Hold(Price),
    /// Types given inputs in order and stops when they run out.
    Script(Vec<String>),
}

/// Emulates a user negotiating with a counterpart built from configuration,
/// without the reply delay of `NegotiationRoom`.
pub struct Framework {
    pub config: NegotiationConfig,
    pub max_steps: usize,
}

impl Framework {
    pub fn new(config: NegotiationConfig) -> Framework {
        let _ = env_logger::builder().is_test(true).try_init();

        Framework {
            config,
            max_steps: 30,
        }
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Negotiates `commodity_id` at market price jittered from its base price.
    pub fn run(
        &self,
        role: Role,
        commodity_id: &str,
        strategy: &UserStrategy,
    ) -> Result<NegotiationRecord, FrameworkError> {
        self.run_impl(role, commodity_id, None, strategy)
    }

    /// Negotiates `commodity_id` at exactly `market_price`.
    pub fn run_at_market(
        &self,
        role: Role,
        commodity_id: &str,
        market_price: Price,
        strategy: &UserStrategy,
    ) -> Result<NegotiationRecord, FrameworkError> {
        self.run_impl(role, commodity_id, Some(market_price), strategy)
    }

    fn run_impl(
        &self,
        role: Role,
        commodity_id: &str,
        market_price: Option<Price>,
        strategy: &UserStrategy,
    ) -> Result<NegotiationRecord, FrameworkError> {
        let mut record = NegotiationRecord::new(role, commodity_id, self.max_steps);
        let mut rng = StdRng::seed_from_u64(self.config.seed.unwrap_or_default());

        let mut counterpart = create_counterpart(self.config.counterpart.clone())
            .map_err(|e| FrameworkError::from(e, &record))?;
        let commodity = commodity::find(commodity_id)
            .ok_or_else(|| anyhow!("Commodity '{}' not found.", commodity_id))
            .map_err(|e| FrameworkError::from(e, &record))?;

        let chosen = NegotiationSession::new(self.config.session.clone())
            .choose_role(role)
            .map_err(|e| FrameworkError::from(e, &record))?;
        let mut session = match market_price {
            Some(market_price) => chosen.open(commodity, market_price),
            None => chosen.choose_commodity(commodity, &mut rng),
        }
        .map_err(|e| FrameworkError::from(e, &record))?;
        record.session = Some(session.clone());

        let mut script = match strategy {
            UserStrategy::Script(inputs) => inputs.clone().into_iter(),
            _ => vec![].into_iter(),
        };

        while session.status() == SessionStatus::Active && !record.is_finished() {
            let price = match strategy {
                UserStrategy::Script(_) => {
                    let raw = match script.next() {
                        Some(raw) => raw,
                        None => break,
                    };
                    match session.parse_offer(&raw) {
                        Ok(price) => Ok(price),
                        Err(e) => {
                            log::info!("Framework: Input '{}' refused. {}", raw, e);
                            record.invalid(e);
                            continue;
                        }
                    }
                }
                UserStrategy::AcceptCounter if record.offers() == 0 => Ok(session.user_price()),
                UserStrategy::AcceptCounter => session.accept_price(),
                UserStrategy::Split => session.split_price(),
                UserStrategy::Nudge(step) => session.nudge_price(*step),
                UserStrategy::Hold(price) => Ok(*price),
            }
            .map_err(|e| FrameworkError::from(e, &record))?;

            let next = self.exchange(&session, price, &mut counterpart, &mut rng, &mut record);
            session = match next {
                Some(next) => next,
                None => break,
            };
        }

        log::info!(
            "Framework: {} negotiation for '{}' ended after {} offer(s), deal: {:?}.",
            role,
            commodity_id,
            record.offers(),
            record.deal_price()
        );
        Ok(record)
    }

    fn exchange(
        &self,
        session: &NegotiationSession,
        price: Price,
        counterpart: &mut BoxedCounterpart,
        rng: &mut StdRng,
        record: &mut NegotiationRecord,
    ) -> Option<NegotiationSession> {
        record.offer(price);
        if record.is_finished() {
            return None;
        }

        match session.submit_price(price, counterpart, rng) {
            Ok(next) => {
                record.reply(&next);
                Some(next)
            }
            Err(SessionError::Validation(e)) => {
                record.invalid(e);
                Some(session.clone())
            }
            Err(e) => {
                record.error(&anyhow::Error::from(e));
                None
            }
        }
    }
}
