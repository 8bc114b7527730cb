pub mod commodity;
pub mod locale;
mod message;
mod price;

pub use commodity::{Commodity, CommodityNames};
pub use locale::{Language, Phrase, COUNTER_VARIANTS};
pub use message::{Message, MessageKind, Sender};
pub use price::{jittered_price, round_price, spread_percent, Price, Role};
