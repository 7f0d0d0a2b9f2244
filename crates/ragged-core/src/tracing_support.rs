//! Log output for ragged buffer operations.
//!
//! Library code only emits `tracing` events; nothing is printed unless the
//! embedding application installs a subscriber. With the `tracing` feature
//! enabled, [`init_tracing`] installs a `tracing-subscriber` registry with a
//! single formatting layer. Without it, [`init_tracing`] does nothing.
//!
//! Events emitted by this crate:
//!
//! - `debug`: shape summaries for concatenation, gather, materialisation,
//!   pad/pack and translate/rotate
//! - `trace`: broadcast decisions of elementwise arithmetic
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive, default `ragged_core=info,warn`
//! - `RAGGED_LOG_FORMAT`: `pretty` (default), `json` or `compact`
//!
//! # Example
//!
//! ```
//! use ragged_core::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! let config = TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "ragged_core=debug".to_string(),
//!     ..TracingConfig::default()
//! };
//! init_tracing(config).unwrap();
//! ```

use anyhow::Result;

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "RAGGED_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "ragged_core=info,warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Multi-line human-readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// One line per event
    Compact,
}

impl TracingFormat {
    /// Parse a format name, falling back to [`TracingFormat::Pretty`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    /// `EnvFilter` directive, e.g. `ragged_core=debug`
    pub filter: String,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or_default();
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

/// Install a global subscriber for the given configuration.
///
/// Call once at startup.
///
/// # Errors
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let filter = EnvFilter::try_new(&config.filter)?;
    let layer = fmt::layer()
        .with_target(config.with_target)
        .with_file(config.with_file)
        .with_line_number(config.with_line_number);

    let layer = match config.format {
        TracingFormat::Pretty => layer.pretty().with_ansi(config.with_ansi).boxed(),
        TracingFormat::Json => layer.json().boxed(),
        TracingFormat::Compact => layer.compact().with_ansi(config.with_ansi).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()?;
    Ok(())
}

/// No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}
