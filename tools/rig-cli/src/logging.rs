//! Subscriber setup for the `rig` binary.

use anyhow::Result;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs the global subscriber.
///
/// `filter` wins over `RUST_LOG`; with neither set, `info` is used. Calling
/// this twice is harmless (the second install is ignored).
pub fn init(filter: Option<&str>) {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}

/// Logs a failed run with its full context chain, then hands the result back.
///
/// # Errors
///
/// Returns `result` unchanged.
pub fn log_failure<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        let message = format!("{e:#}");
        error!(error = %message, "run failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        (out, text)
    }

    #[test]
    fn failure_is_logged_with_context() {
        let (result, logs) = captured_logs(|| {
            let failed = Err::<(), _>(anyhow!("no such column 'f_z'")).context("loading log");
            log_failure(failed)
        });
        let err = result.unwrap_err();
        assert_eq!(format!("{err:#}"), "loading log: no such column 'f_z'");
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("run failed"), "{logs}");
        assert!(logs.contains("loading log: no such column 'f_z'"), "{logs}");
    }

    #[test]
    fn success_logs_nothing() {
        let (result, logs) = captured_logs(|| log_failure(Ok(7)));
        assert_eq!(result.unwrap(), 7);
        assert!(logs.is_empty(), "{logs}");
    }
}
