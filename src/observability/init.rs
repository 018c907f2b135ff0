//! Tracing subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` if set, else `config.trace_level`, else
/// `"info"`. Output goes to `config.trace_file` through a rotating
/// [`FileWriter`] when configured, otherwise to stderr. If the log directory
/// cannot be created, output falls back to stderr.
///
/// Idempotent: only the first call in a process takes effect.
///
/// # Example
///
/// ```rust
/// use bizdir::observability::init_tracing;
/// use bizdir::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_writer = config.trace_file_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("bizdir: cannot create log directory {}: {e}", parent.display());
                return None;
            }
        }
        Some(FileWriter::new(path))
    });

    let (file_layer, stderr_layer) = match file_writer {
        Some(writer) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            ),
            None,
        ),
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}
