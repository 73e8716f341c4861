pub mod auction;
pub mod chain;
pub mod config;
pub mod core;
pub mod errors;
pub mod math;

pub use errors::SetRsError;

pub use auction::{
    AuctionFlowCalculator, RateSource, TokenFlow, TokenFlowResult, WrappedTokenMapping,
};
pub use crate::core::basket::{BasketSnapshot, Component};
pub use math::price_curve::{AuctionPriceState, PriceRatio};
