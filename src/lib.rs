mod error;
pub mod factory;
mod room;
mod session;

pub use error::{SessionError, ValidationError};
pub use factory::{create_counterpart, CounterpartConfig, LoadMode, NegotiationConfig};
pub use room::{NegotiationRoom, ReplyDelay};
pub use session::{
    parse_offer, NegotiationSession, PendingOffer, SessionConfig, SessionSnapshot, SessionStatus,
};

pub use mandi_market_utils::{
    commodity, Commodity, Language, Message, MessageKind, Phrase, Price, Role, Sender,
};

pub mod builtin {
    pub use mandi_builtin_negotiators::{
        coach, haggler, is_reasonable, register_negotiators, Coach, Haggler, ReasonableBand,
    };
}

pub mod component {
    pub use mandi_negotiator_component::static_lib::{register_counterpart, BoxedCounterpart};
    pub use mandi_negotiator_component::{
        factory, CounterpartComponent, CounterpartFactory, NegotiationResult, OfferContext,
        RejectReason,
    };
}
