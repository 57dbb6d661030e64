//! The tap component
//!
//! A `Tap` owns the validated configuration and the sink, and is the single
//! place events funnel through. Installation is one-shot: there is no
//! teardown and no uninstall for the life of the process.

use std::sync::Arc;

use crate::config::TapConfig;
use crate::error::ConfigError;
use crate::events::TapEvent;
use crate::hooks::console::{Console, TappedConsole};
use crate::sink::{EventSink, HttpSink};

/// The in-process tap: intercepts signals and forwards events
///
/// Cheap to clone; all clones share one immutable configuration and sink.
/// A disabled tap carries no state at all and every operation on it is a
/// no-op.
#[derive(Clone)]
pub struct Tap {
    inner: Option<Arc<TapInner>>,
}

struct TapInner {
    config: TapConfig,
    sink: Arc<dyn EventSink>,
}

impl Tap {
    /// Initialize the tap from a validated configuration
    ///
    /// Unless `config.enabled` is exactly `true`, nothing is validated,
    /// nothing is installed and the returned tap has zero runtime effect.
    /// When enabled, the HTTP sink is constructed and one
    /// `console_tap.initialized` event is emitted immediately.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an enabled configuration fails validation.
    pub fn init(config: TapConfig) -> Result<Tap, ConfigError> {
        if !config.enabled {
            return Ok(Tap::disabled());
        }
        config.validate()?;
        let sink: Arc<dyn EventSink> = Arc::new(HttpSink::new(&config));
        Ok(Self::install(config, sink))
    }

    /// Initialize the tap with a caller-supplied sink
    ///
    /// Same gating and validation as `init`; the sink seam exists for
    /// tests and for hosts with their own transport.
    pub fn with_sink(config: TapConfig, sink: Arc<dyn EventSink>) -> Result<Tap, ConfigError> {
        if !config.enabled {
            return Ok(Tap::disabled());
        }
        config.validate()?;
        Ok(Self::install(config, sink))
    }

    fn install(config: TapConfig, sink: Arc<dyn EventSink>) -> Tap {
        log::debug!(
            "console tap enabled, collector at {}",
            config.collector_url()
        );
        let tap = Tap {
            inner: Some(Arc::new(TapInner { config, sink })),
        };
        tap.emit(TapEvent::initialized());
        tap
    }

    /// A tap with zero runtime effect
    pub fn disabled() -> Tap {
        Tap { inner: None }
    }

    /// Whether hooks were installed at init
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// The active configuration, absent on a disabled tap
    pub fn config(&self) -> Option<&TapConfig> {
        self.inner.as_deref().map(|inner| &inner.config)
    }

    /// Transmit one event, best-effort
    ///
    /// Gated by `disabled_override`: when set, the event is dropped
    /// silently. Otherwise the wire envelope is built and handed to the
    /// sink. Never blocks, never errors, never reports its own failures.
    pub fn emit(&self, event: TapEvent) {
        let Some(inner) = self.inner.as_deref() else {
            return;
        };
        if inner.config.disabled_override {
            return;
        }
        let payload = event.to_wire(&inner.config.page);
        inner.sink.send(payload);
    }

    /// Wrap a console so every call is forwarded after the original runs
    pub fn wrap_console<C: Console>(&self, console: C) -> TappedConsole<C> {
        TappedConsole::new(console, self.clone())
    }
}
