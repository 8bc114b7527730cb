use serde::{Deserialize, Serialize};
use std::fmt;

use mandi_market_utils::{MessageKind, Price, Role};
use mandi_negotiators::{NegotiationSession, SessionStatus};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NegotiationStage {
    Offer(Price),
    /// Input refused before reaching the counterpart.
    Invalid(String),
    Reject,
    Counter(Price),
    Accept(Price),
    Error(String),
    InfiniteLoop,
}

/// Everything that happened during a single negotiation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NegotiationRecord {
    pub role: Role,
    pub commodity: String,
    pub stages: Vec<NegotiationStage>,
    pub session: Option<NegotiationSession>,

    max_steps: usize,
}

impl NegotiationRecord {
    pub fn new(role: Role, commodity: &str, max_steps: usize) -> NegotiationRecord {
        NegotiationRecord {
            role,
            commodity: commodity.to_string(),
            stages: vec![],
            session: None,
            max_steps,
        }
    }

    pub fn offer(&mut self, price: Price) {
        self.stages.push(NegotiationStage::Offer(price));

        if self.offers() > self.max_steps {
            self.stages.push(NegotiationStage::InfiniteLoop);
        }
    }

    pub fn invalid(&mut self, error: impl ToString) {
        self.stages.push(NegotiationStage::Invalid(error.to_string()));
    }

    pub fn error(&mut self, e: &anyhow::Error) {
        self.stages.push(NegotiationStage::Error(e.to_string()));
    }

    /// Records counterpart reply, which is always the last message of the session.
    pub fn reply(&mut self, session: &NegotiationSession) {
        if let Some(message) = session.last_message() {
            let stage = match (message.kind, message.price) {
                (MessageKind::Reject, _) => Some(NegotiationStage::Reject),
                (MessageKind::Counter, Some(price)) => Some(NegotiationStage::Counter(price)),
                (MessageKind::Accept, Some(price)) => Some(NegotiationStage::Accept(price)),
                _ => None,
            };
            self.stages.extend(stage);
        }
        self.session = Some(session.clone());
    }

    pub fn offers(&self) -> usize {
        self.stages
            .iter()
            .filter(|stage| matches!(stage, NegotiationStage::Offer(_)))
            .count()
    }

    pub fn counters(&self) -> usize {
        self.stages
            .iter()
            .filter(|stage| matches!(stage, NegotiationStage::Counter(_)))
            .count()
    }

    pub fn deal_price(&self) -> Option<Price> {
        self.session.as_ref().and_then(|session| session.deal_price())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.stages.last(), Some(NegotiationStage::Accept(_)))
    }

    pub fn is_finished(&self) -> bool {
        let completed = self
            .session
            .as_ref()
            .map(|session| session.status() == SessionStatus::Completed)
            .unwrap_or(false);
        if completed {
            return true;
        }

        matches!(
            self.stages.last(),
            Some(NegotiationStage::Error(_)) | Some(NegotiationStage::InfiniteLoop)
        )
    }
}

impl fmt::Display for NegotiationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_loop_detection() {
        let mut record = NegotiationRecord::new(Role::Buyer, "rice", 2);
        record.offer(40);
        record.offer(41);
        assert!(!record.is_finished());

        record.offer(42);
        assert_eq!(record.stages.last(), Some(&NegotiationStage::InfiniteLoop));
        assert!(record.is_finished());
        assert!(!record.is_accepted());
        assert_eq!(record.offers(), 3);
    }

    #[test]
    fn test_record_display_is_json() {
        let mut record = NegotiationRecord::new(Role::Seller, "tea", 10);
        record.invalid("Offer price must be greater than 0");

        let json: serde_json::Value = serde_json::from_str(&record.to_string()).unwrap();
        assert_eq!(json["commodity"], "tea");
        assert_eq!(json["stages"][0]["Invalid"], "Offer price must be greater than 0");
    }
}
