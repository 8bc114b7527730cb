use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Helper structure describing why an offer was rejected outright.
#[derive(Clone, Display, Debug, PartialEq, Serialize, Deserialize)]
#[display(fmt = "'{}'", message)]
pub struct RejectReason {
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RejectReason {
    pub fn new(message: impl ToString) -> RejectReason {
        RejectReason {
            message: message.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn entry<T: Into<serde_json::Value>>(
        mut self,
        key: impl ToString,
        value: T,
    ) -> RejectReason {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.extra
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}
