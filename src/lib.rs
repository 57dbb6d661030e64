/// Error types for the console tap
pub mod error;

/// Core event types and the wire envelope
pub mod events;

/// Tap configuration
pub mod config;

/// Interception hooks for console, errors, rejections and fetch
pub mod hooks;

/// Best-effort delivery sinks
pub mod sink;

/// The tap component
pub mod tap;

// Re-export commonly used types
pub use config::{PageContext, TapConfig, Viewport};
pub use error::ConfigError;
pub use events::{ConsoleArg, EventKind, Level, TapEvent, UncaughtError};
pub use hooks::{Console, LogConsole, Rejection, TappedConsole};
pub use sink::{EventSink, HttpSink};
pub use tap::Tap;
