use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::locale::{Language, Phrase};
use crate::price::Price;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[display(fmt = "user")]
    User,
    #[display(fmt = "counterpart")]
    Counterpart,
    #[display(fmt = "system")]
    System,
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[display(fmt = "message")]
    Message,
    #[display(fmt = "offer")]
    Offer,
    #[display(fmt = "counter")]
    Counter,
    #[display(fmt = "accept")]
    Accept,
    #[display(fmt = "reject")]
    Reject,
}

/// Entry of the negotiation chat log. Never modified after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub kind: MessageKind,
    pub phrase: Phrase,
    /// `phrase` rendered in the session language at the time of sending.
    pub text: String,
    pub price: Option<Price>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(
        seq: usize,
        sender: Sender,
        kind: MessageKind,
        phrase: Phrase,
        price: Option<Price>,
        language: Language,
    ) -> Message {
        Message {
            id: format!("{}-{}", sender, seq),
            sender,
            kind,
            text: phrase.render(language),
            phrase,
            price,
            timestamp: Utc::now(),
        }
    }
}
