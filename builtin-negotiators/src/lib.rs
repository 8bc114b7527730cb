pub mod coach;
pub mod haggler;
pub mod reasonable;

pub use coach::Coach;
pub use haggler::Haggler;
pub use reasonable::{is_reasonable, ReasonableBand};

use mandi_negotiator_component::static_lib::{factory, register_counterpart};

pub const LIBRARY: &str = "mandi-negotiators";

pub fn register_negotiators() {
    register_counterpart(LIBRARY, "Haggler", factory::<Haggler>());
}
