use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global tracing subscriber.
///
/// Console logs go to `console`, filtered by `RUST_LOG` (falling back to
/// `default_filter`). Tools that print results on stdout pass
/// `std::io::stderr` here. When `log_dir` is given a second, ANSI-free layer
/// writes daily rotated files named `<file_prefix>.YYYY-MM-DD`. Keep the
/// returned guard alive for the lifetime of the process or buffered file lines
/// are lost.
pub fn init_tracing<W>(
    default_filter: &str,
    log_dir: Option<&Path>,
    file_prefix: &str,
    console: W,
) -> Result<Option<WorkerGuard>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(console))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
