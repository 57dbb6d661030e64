//! Uncaught-error and rejection interception
//!
//! The browser's `window.onerror` maps to the process panic hook; an
//! unhandled promise rejection maps to whatever failed background work the
//! host notices and hands in as a `Rejection`.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::panic::{self, PanicHookInfo};

use crate::events::{TapEvent, UncaughtError};
use crate::tap::Tap;

/// The reason a piece of background work failed
///
/// A rejection reason may be any value: proper errors contribute a message
/// and a cause-chain stack, anything else is string-coerced.
pub enum Rejection<'a> {
    /// A typed error; message and cause chain are extracted
    Error(&'a (dyn Error + 'static)),
    /// An arbitrary reason, coerced through its `Debug` rendering
    Value(&'a dyn fmt::Debug),
}

impl Rejection<'_> {
    fn describe(&self) -> (String, Option<String>) {
        match self {
            Rejection::Error(error) => (error.to_string(), error_chain(*error)),
            Rejection::Value(value) => (format!("{:?}", value), None),
        }
    }
}

/// Render an error's cause chain, the closest analog of a stack trace
pub(crate) fn error_chain(error: &(dyn Error + 'static)) -> Option<String> {
    let mut frames = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        frames.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    if frames.is_empty() {
        None
    } else {
        Some(frames.join("\n"))
    }
}

impl UncaughtError {
    /// Build the record for a panic
    ///
    /// Extracts the payload message (string coercion for non-string
    /// payloads), the panic location as filename/lineno/colno, and a
    /// backtrace when the platform produced one.
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let message = if let Some(text) = info.payload().downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = info.payload().downcast_ref::<String>() {
            text.clone()
        } else {
            "panic with non-string payload".to_string()
        };

        let (filename, lineno, colno) = match info.location() {
            Some(location) => (
                Some(location.file().to_string()),
                Some(location.line()),
                Some(location.column()),
            ),
            None => (None, None, None),
        };

        let backtrace = Backtrace::force_capture();
        let stack = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };

        UncaughtError {
            message,
            filename,
            lineno,
            colno,
            stack,
        }
    }
}

impl Tap {
    /// Forward one uncaught top-level error
    pub fn handle_uncaught_error(&self, error: &UncaughtError) {
        self.emit(TapEvent::uncaught_error(error));
    }

    /// Forward one unhandled rejection
    pub fn handle_unhandled_rejection(&self, reason: Rejection<'_>) {
        let (message, stack) = reason.describe();
        self.emit(TapEvent::unhandled_rejection(message, stack));
    }

    /// Subscribe to the process's uncaught-exception signal
    ///
    /// Chains the previously installed panic hook, which always runs first
    /// so panic output stays untouched. Installation is one-shot for the
    /// life of the process; there is no uninstall. A disabled tap installs
    /// nothing.
    pub fn install_panic_hook(&self) {
        if !self.is_enabled() {
            return;
        }
        let tap = self.clone();
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            previous(info);
            tap.handle_uncaught_error(&UncaughtError::from_panic(info));
        }));
    }
}
