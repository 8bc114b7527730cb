pub mod error;
mod framework;
mod negotiation_record;

pub use framework::{Framework, UserStrategy};
pub use negotiation_record::{NegotiationRecord, NegotiationStage};
