//! Request throttling for outgoing HTTP calls.
//!
//! Remote APIs and scraped sites are called through a [`RateLimitedClient`],
//! which guarantees a minimum interval between requests across all callers
//! sharing one instance.

mod client;
mod gate;

pub use client::RateLimitedClient;
pub use gate::IntervalGate;
