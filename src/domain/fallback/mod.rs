//! Fallback domain types: strategies, results and query expansion

mod expansion;
mod result;
mod strategy;

pub use expansion::expand_query;
pub use result::{FallbackFailure, FallbackResult};
pub use strategy::FallbackStrategy;
