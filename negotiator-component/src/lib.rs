pub mod component;
pub mod reason;
pub mod static_lib;

pub use component::{CounterpartComponent, NegotiationResult, OfferContext};
pub use reason::RejectReason;
pub use static_lib::{factory, register_counterpart, CounterpartFactory};

pub use mandi_market_utils::{Price, Role};
