//! Console interception
//!
//! In a browser the console methods get replaced in place; a Rust host
//! opts in instead. `Tap::wrap_console` returns a decorator
//! that invokes the wrapped console first, with the identical arguments,
//! and then emits one event per call.

use crate::events::{ConsoleArg, Level, TapEvent};
use crate::tap::Tap;

/// The five standard console methods
///
/// Implement this for whatever surface your application writes diagnostics
/// through; `LogConsole` adapts the `log` facade.
pub trait Console {
    fn error(&self, args: &[ConsoleArg]);
    fn warn(&self, args: &[ConsoleArg]);
    fn info(&self, args: &[ConsoleArg]);
    fn log(&self, args: &[ConsoleArg]);
    fn debug(&self, args: &[ConsoleArg]);
}

/// Decorator that taps a console
///
/// Each method invokes the wrapped console with the identical argument
/// slice before the forwarding side effect, so developer-visible output is
/// unchanged in content, order and timing. On a disabled tap the decorator
/// only delegates.
pub struct TappedConsole<C: Console> {
    inner: C,
    tap: Tap,
}

impl<C: Console> TappedConsole<C> {
    pub(crate) fn new(inner: C, tap: Tap) -> Self {
        TappedConsole { inner, tap }
    }

    /// The wrapped console
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn forward(&self, level: Level, args: &[ConsoleArg]) {
        self.tap.emit(TapEvent::console(level, args));
    }
}

impl<C: Console> Console for TappedConsole<C> {
    fn error(&self, args: &[ConsoleArg]) {
        self.inner.error(args);
        self.forward(Level::Error, args);
    }

    fn warn(&self, args: &[ConsoleArg]) {
        self.inner.warn(args);
        self.forward(Level::Warn, args);
    }

    fn info(&self, args: &[ConsoleArg]) {
        self.inner.info(args);
        self.forward(Level::Info, args);
    }

    fn log(&self, args: &[ConsoleArg]) {
        self.inner.log(args);
        self.forward(Level::Log, args);
    }

    fn debug(&self, args: &[ConsoleArg]) {
        self.inner.debug(args);
        self.forward(Level::Debug, args);
    }
}

/// Console backed by the `log` facade
///
/// The facade has no analog of `console.log`; plain log output maps to
/// info.
#[derive(Debug, Default, Clone)]
pub struct LogConsole;

impl LogConsole {
    fn line(args: &[ConsoleArg]) -> String {
        args.iter()
            .map(ConsoleArg::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Console for LogConsole {
    fn error(&self, args: &[ConsoleArg]) {
        log::error!("{}", Self::line(args));
    }

    fn warn(&self, args: &[ConsoleArg]) {
        log::warn!("{}", Self::line(args));
    }

    fn info(&self, args: &[ConsoleArg]) {
        log::info!("{}", Self::line(args));
    }

    fn log(&self, args: &[ConsoleArg]) {
        log::info!("{}", Self::line(args));
    }

    fn debug(&self, args: &[ConsoleArg]) {
        log::debug!("{}", Self::line(args));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TapConfig;
    use crate::sink::test_support::RecordingSink;
    use quickcheck_macros::quickcheck;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Console double that records every call it receives
    #[derive(Default)]
    struct RecordingConsole {
        calls: Mutex<Vec<(Level, Vec<ConsoleArg>)>>,
    }

    impl RecordingConsole {
        fn calls(&self) -> Vec<(Level, Vec<ConsoleArg>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, level: Level, args: &[ConsoleArg]) {
            self.calls.lock().unwrap().push((level, args.to_vec()));
        }
    }

    impl Console for RecordingConsole {
        fn error(&self, args: &[ConsoleArg]) {
            self.record(Level::Error, args);
        }

        fn warn(&self, args: &[ConsoleArg]) {
            self.record(Level::Warn, args);
        }

        fn info(&self, args: &[ConsoleArg]) {
            self.record(Level::Info, args);
        }

        fn log(&self, args: &[ConsoleArg]) {
            self.record(Level::Log, args);
        }

        fn debug(&self, args: &[ConsoleArg]) {
            self.record(Level::Debug, args);
        }
    }

    fn tapped_recording_console() -> (Arc<RecordingSink>, TappedConsole<RecordingConsole>) {
        let sink = Arc::new(RecordingSink::default());
        let config = TapConfig {
            enabled: true,
            ..TapConfig::default()
        };
        let tap = Tap::with_sink(config, sink.clone()).unwrap();
        let console = tap.wrap_console(RecordingConsole::default());
        (sink, console)
    }

    fn dispatch(console: &dyn Console, level: Level, args: &[ConsoleArg]) {
        match level {
            Level::Error => console.error(args),
            Level::Warn => console.warn(args),
            Level::Info => console.info(args),
            Level::Log => console.log(args),
            Level::Debug => console.debug(args),
        }
    }

    #[test]
    fn test_wrapper_invokes_original_with_exact_arguments() {
        let (_sink, console) = tapped_recording_console();
        let args = vec![
            ConsoleArg::text("request failed"),
            ConsoleArg::value(&json!({"code": 502})),
        ];

        console.error(&args);

        let calls = console.inner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Level::Error);
        assert_eq!(calls[0].1, args);
    }

    #[test]
    fn test_each_method_produces_exactly_one_event() {
        let (sink, console) = tapped_recording_console();
        let init_events = sink.payloads().len();
        let args = vec![ConsoleArg::text("msg")];

        for level in Level::ALL {
            dispatch(&console, level, &args);
        }

        let payloads = sink.payloads();
        assert_eq!(payloads.len(), init_events + Level::ALL.len());
        assert_eq!(console.inner().calls().len(), Level::ALL.len());

        for (payload, level) in payloads[init_events..].iter().zip(Level::ALL) {
            assert_eq!(payload["level"], json!(level.as_str()));
            assert_eq!(payload["type"], json!(format!("console.{}", level.as_str())));
            assert_eq!(payload["args"], json!(["msg"]));
        }
    }

    #[test]
    fn test_original_runs_before_the_forwarding_side_effect() {
        /// Console that snapshots how many payloads the sink has seen at
        /// the moment it is invoked
        struct ProbeConsole {
            sink: Arc<RecordingSink>,
            seen: Mutex<Vec<usize>>,
        }

        impl Console for ProbeConsole {
            fn error(&self, _args: &[ConsoleArg]) {
                self.seen.lock().unwrap().push(self.sink.payloads().len());
            }
            fn warn(&self, _args: &[ConsoleArg]) {}
            fn info(&self, _args: &[ConsoleArg]) {}
            fn log(&self, _args: &[ConsoleArg]) {}
            fn debug(&self, _args: &[ConsoleArg]) {}
        }

        let sink = Arc::new(RecordingSink::default());
        let config = TapConfig {
            enabled: true,
            ..TapConfig::default()
        };
        let tap = Tap::with_sink(config, sink.clone()).unwrap();
        let init_events = sink.payloads().len();

        let console = tap.wrap_console(ProbeConsole {
            sink: sink.clone(),
            seen: Mutex::new(Vec::new()),
        });

        console.error(&[ConsoleArg::text("x")]);

        // When the original ran, the call's own event was not yet sent.
        assert_eq!(*console.inner().seen.lock().unwrap(), vec![init_events]);
        assert_eq!(sink.payloads().len(), init_events + 1);
    }

    #[test]
    fn test_disabled_tap_wrapper_only_delegates() {
        let sink = Arc::new(RecordingSink::default());
        let tap = Tap::with_sink(TapConfig::default(), sink.clone()).unwrap();
        let console = tap.wrap_console(RecordingConsole::default());

        console.warn(&[ConsoleArg::text("still visible")]);

        assert_eq!(console.inner().calls().len(), 1);
        assert!(sink.payloads().is_empty());
    }

    #[test]
    fn test_unserializable_argument_does_not_break_the_call() {
        use serde::{Serialize, Serializer};

        #[derive(Debug)]
        struct Poison;

        impl Serialize for Poison {
            fn serialize<S: Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("nope"))
            }
        }

        let (sink, console) = tapped_recording_console();
        let init_events = sink.payloads().len();
        let args = vec![ConsoleArg::text("ctx"), ConsoleArg::value(&Poison)];

        console.log(&args);

        assert_eq!(console.inner().calls().len(), 1);
        let payloads = sink.payloads();
        assert_eq!(payloads.len(), init_events + 1);
        assert_eq!(payloads[init_events]["args"], json!(["ctx", "Poison"]));
    }

    #[quickcheck]
    fn prop_event_args_length_matches_call(raw_args: Vec<String>) -> bool {
        let (sink, console) = tapped_recording_console();
        let init_events = sink.payloads().len();
        let args: Vec<ConsoleArg> = raw_args
            .iter()
            .map(|arg| ConsoleArg::text(arg.clone()))
            .collect();

        console.info(&args);

        let payloads = sink.payloads();
        payloads.len() == init_events + 1
            && payloads[init_events]["args"].as_array().unwrap().len() == raw_args.len()
            && console.inner().calls() == vec![(Level::Info, args)]
    }
}
