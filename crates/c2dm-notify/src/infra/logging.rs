use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Overrides `RUST_LOG` when set, so the sender can be tuned without touching other tools.
const FILTER_ENV: &str = "C2DM_LOG";
const DEFAULT_FILTER: &str = "c2dm_notify=info,c2dm_sdk=info";

/// Keeps the non-blocking writer alive; dropping it at exit flushes the last lines.
#[must_use = "LogGuard must be held to keep logging active"]
#[non_exhaustive]
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl LogGuard {
    /// Logs go to stderr; a one-shot send leaves stdout to whatever wraps it.
    pub fn init() -> anyhow::Result<Self> {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

        tracing_subscriber::registry()
            .with(filter())
            .with(fmt::layer().with_writer(writer).with_target(false))
            .try_init()
            .context("failed to init tracing")?;

        Ok(Self { _guard: guard })
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
