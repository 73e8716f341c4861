pub mod combined;
pub mod flow;
pub mod wrapped;

pub use flow::{AuctionFlowCalculator, TokenFlow, TokenFlowResult};
pub use wrapped::{RateSource, WrappedTokenMapping};
