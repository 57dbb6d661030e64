//! Best-effort delivery sinks
//!
//! A sink is a delivery target where failure is expected, tolerated and
//! never surfaced. The `send` method is an intentional void-result
//! contract, not an oversight: implementations capture every failure mode
//! internally and the tap never learns whether an event arrived.

use serde_json::Value;

/// HTTP delivery to the collector endpoint
pub mod http;

pub use http::HttpSink;

/// A best-effort event sink
///
/// Implementations must never block the caller, never panic and never
/// report failure. They also must not log through the `log` facade from the
/// send path, since a host may route that facade back into a wrapped
/// console.
pub trait EventSink: Send + Sync {
    /// Hand one wire-ready payload to the sink
    fn send(&self, payload: Value);
}
