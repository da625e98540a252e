//! Sets up structured logging.
use std::{error::Error, fmt::Display};

use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug)]
pub struct TelemetryError(String);

impl Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Couldn't set up telemetry: {}", self.0)
    }
}

impl Error for TelemetryError {}

/// Composes a bunyan formatted subscriber writing to the provided sink.
///
/// `RUST_LOG` takes precedence over the provided filter.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Registers the subscriber globally. Can only be done once per process.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<(), TelemetryError> {
    LogTracer::init().map_err(|err| TelemetryError(err.to_string()))?;
    set_global_default(subscriber).map_err(|err| TelemetryError(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    /// Collects everything written by a subscriber.
    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn contents(&self) -> String {
            let buffer = self.0.lock().expect("Should be able to lock buffer");
            String::from_utf8_lossy(&buffer).to_string()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .expect("Should be able to lock buffer")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn it_writes_json_lines() {
        let capture = Capture::default();
        let subscriber = get_subscriber("authorizer".into(), "info".into(), capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(login = "alice", "user authorized");
        });

        let output = capture.contents();
        let line = output.lines().next().expect("Should have logged a line");
        let entry: serde_json::Value =
            serde_json::from_str(line).expect("Should be able to parse log line");
        assert_eq!(entry["name"], "authorizer");
        assert_eq!(entry["msg"], "user authorized");
        assert_eq!(entry["login"], "alice");
    }

    #[test]
    fn it_can_only_be_initialised_once() {
        let subscriber = get_subscriber("authorizer".into(), "info".into(), std::io::sink);
        assert!(init_subscriber(subscriber).is_ok());

        let subscriber = get_subscriber("authorizer".into(), "info".into(), std::io::sink);
        assert!(init_subscriber(subscriber).is_err());
    }
}
