//! Core event types for the console tap
//!
//! This module defines the data structures used to represent intercepted
//! occurrences (console calls, uncaught errors, rejections, fetch failures)
//! and to build the JSON envelope sent to the collector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::config::PageContext;

/// Timestamp type for consistent time handling across the crate
pub type Timestamp = DateTime<Utc>;

/// Severity level of a captured event
///
/// Mirrors the five standard console methods, which double as levels on
/// the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Error-level output
    Error,
    /// Warning-level output
    Warn,
    /// Informational output
    Info,
    /// Plain log output
    Log,
    /// Debug-level output
    Debug,
}

impl Level {
    /// All five console levels, in conventional severity order
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Log,
        Level::Debug,
    ];

    /// The lowercase name used in wire tags and level fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Log => "log",
            Level::Debug => "debug",
        }
    }
}

/// The interception surface an event originated from
///
/// Wire tags match the browser console-tap collector protocol, so a
/// collector already serving browser pages ingests events from Rust hosts
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// One call to a wrapped console method
    Console(Level),
    /// An uncaught top-level error (panic)
    WindowError,
    /// A rejection nobody handled
    UnhandledRejection,
    /// A wrapped fetch call that failed
    FetchError,
    /// The one-shot event emitted when the tap is installed
    Initialized,
}

impl EventKind {
    /// The `type` tag carried on the wire
    pub fn wire_tag(&self) -> String {
        match self {
            EventKind::Console(level) => format!("console.{}", level.as_str()),
            EventKind::WindowError => "window.error".to_string(),
            EventKind::UnhandledRejection => "unhandledrejection".to_string(),
            EventKind::FetchError => "fetch.error".to_string(),
            EventKind::Initialized => "console_tap.initialized".to_string(),
        }
    }
}

/// A single console argument captured at the call site
///
/// Text arguments are kept verbatim; any other value is JSON-serialized at
/// capture time. A value whose `Serialize` implementation fails falls back
/// to its `Debug` rendering, so argument capture never propagates an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleArg(Repr);

#[derive(Debug, Clone, PartialEq)]
enum Repr {
    Text(String),
    Json(Value),
}

impl ConsoleArg {
    /// Capture a string argument verbatim
    pub fn text(text: impl Into<String>) -> Self {
        ConsoleArg(Repr::Text(text.into()))
    }

    /// Capture a non-string argument by JSON-serializing it
    ///
    /// Serialization failure falls back to the `Debug` rendering of the
    /// value; this constructor never fails.
    pub fn value<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug,
    {
        match serde_json::to_value(value) {
            Ok(json) => ConsoleArg(Repr::Json(json)),
            Err(_) => ConsoleArg(Repr::Text(format!("{:?}", value))),
        }
    }

    /// The string form carried in the event's `args` array
    pub fn render(&self) -> String {
        match &self.0 {
            Repr::Text(text) => text.clone(),
            Repr::Json(value) => value.to_string(),
        }
    }
}

impl From<&str> for ConsoleArg {
    fn from(text: &str) -> Self {
        ConsoleArg::text(text)
    }
}

impl From<String> for ConsoleArg {
    fn from(text: String) -> Self {
        ConsoleArg::text(text)
    }
}

/// An uncaught top-level error, the analog of a `window.onerror` occurrence
///
/// In a Rust host these typically originate from a panic; the panic hook in
/// `hooks::errors` builds one from the panic payload and location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UncaughtError {
    /// Human-readable error message
    pub message: String,
    /// Source file the error originated in, when known
    pub filename: Option<String>,
    /// Line number within `filename`
    pub lineno: Option<u32>,
    /// Column number within `filename`
    pub colno: Option<u32>,
    /// Backtrace when one could be captured; absent is serialized as null
    /// on the wire, never treated as an error
    pub stack: Option<String>,
}

/// One structured record describing a single intercepted occurrence
///
/// Created at the moment of interception, never mutated afterwards,
/// transmitted at most once and not retained after the send attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TapEvent {
    /// Severity of the occurrence
    pub level: Level,
    /// Which interception surface produced it
    pub kind: EventKind,
    /// When the occurrence was intercepted
    pub created_at: Timestamp,
    fields: Map<String, Value>,
}

impl TapEvent {
    fn new(level: Level, kind: EventKind, fields: Map<String, Value>) -> Self {
        TapEvent {
            level,
            kind,
            created_at: Utc::now(),
            fields,
        }
    }

    /// The one-shot event emitted right after hook installation
    pub fn initialized() -> Self {
        let mut fields = Map::new();
        fields.insert(
            "message".to_string(),
            Value::String("Console tap initialized".to_string()),
        );
        Self::new(Level::Info, EventKind::Initialized, fields)
    }

    /// Event for one call to a wrapped console method
    pub fn console(level: Level, args: &[ConsoleArg]) -> Self {
        let rendered: Vec<Value> = args
            .iter()
            .map(|arg| Value::String(arg.render()))
            .collect();
        let mut fields = Map::new();
        fields.insert("args".to_string(), Value::Array(rendered));
        Self::new(level, EventKind::Console(level), fields)
    }

    /// Event for an uncaught top-level error
    pub fn uncaught_error(error: &UncaughtError) -> Self {
        let fields = match serde_json::to_value(error) {
            Ok(Value::Object(map)) => map,
            // Unreachable for this type, but event construction never fails.
            _ => Map::new(),
        };
        Self::new(Level::Error, EventKind::WindowError, fields)
    }

    /// Event for a rejection nobody handled
    pub fn unhandled_rejection(reason: String, stack: Option<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("reason".to_string(), Value::String(reason));
        fields.insert("stack".to_string(), stack.map_or(Value::Null, Value::String));
        Self::new(Level::Error, EventKind::UnhandledRejection, fields)
    }

    /// Event for a wrapped fetch call that failed
    pub fn fetch_error(message: String, stack: Option<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(message));
        fields.insert("stack".to_string(), stack.map_or(Value::Null, Value::String));
        Self::new(Level::Error, EventKind::FetchError, fields)
    }

    /// The type-specific fields of this event
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Build the wire envelope for this event
    ///
    /// The event's fields are spread at the top level of one JSON object,
    /// joined by `level`, `type`, `timestamp` (integer epoch millis) and the
    /// page context (`url`, `userAgent`, `viewport`).
    pub fn to_wire(&self, page: &PageContext) -> Value {
        let mut body = self.fields.clone();
        body.insert("level".to_string(), json!(self.level));
        body.insert("type".to_string(), Value::String(self.kind.wire_tag()));
        body.insert(
            "timestamp".to_string(),
            json!(self.created_at.timestamp_millis()),
        );
        body.insert("url".to_string(), Value::String(page.href.clone()));
        body.insert(
            "userAgent".to_string(),
            Value::String(page.user_agent.clone()),
        );
        body.insert(
            "viewport".to_string(),
            json!({
                "width": page.viewport.width,
                "height": page.viewport.height,
            }),
        );
        Value::Object(body)
    }
}
