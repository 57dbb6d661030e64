//! Interception hooks
//!
//! No globals are patched in place here: each surface is an explicit
//! decorator or entry point a host opts into.

/// Console method wrapping
pub mod console;

/// Uncaught errors and unhandled rejections
pub mod errors;

/// Fetch wrapping
pub mod fetch;

pub use console::{Console, LogConsole, TappedConsole};
pub use errors::Rejection;
