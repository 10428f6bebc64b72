//! Tracing subscriber setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "mybookmarks_api=debug,mybookmarks_db=info,tower_http=debug";

/// Install the global subscriber.
///
/// With `LOG_FILE` set, output goes to a daily-rotated file and the returned
/// guard must be held until shutdown so buffered lines are flushed.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let Some(path) = config.file.as_deref() else {
        if config.json {
            registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = config.ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).try_init()?;
        }
        return Ok(None);
    };

    let path = Path::new(path);
    let dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("mybookmarks-api.log");
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name));

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?;
    } else {
        // No ANSI in files unless asked for.
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(config.ansi.unwrap_or(false));
        registry.with(layer).try_init()?;
    }
    Ok(Some(guard))
}
