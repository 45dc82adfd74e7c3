//! Diagnostic logging setup.
//!
//! Events are emitted with `tracing` and carry an `event = "overlay.<area>.<what>"`
//! field. Output goes to stderr so the overlay window stays clean.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Levels accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// Crate level used when neither `--log-level` nor `RUST_LOG` is given.
const DEFAULT_LEVEL: &str = "info";

/// Build the default directive for the crate from a `--log-level` value.
///
/// Accepts the level names in any case plus `warning` as an alias for `warn`.
pub fn level_directive(level: &str) -> Result<String, String> {
    let level = level.trim().to_ascii_lowercase();
    let level = match level.as_str() {
        "warning" => "warn",
        other => other,
    };
    if !LOG_LEVELS.contains(&level) {
        return Err(format!(
            "Unknown log level '{}' (expected one of: {})",
            level,
            LOG_LEVELS.join(", ")
        ));
    }
    Ok(format!("chat_overlay={}", level))
}

/// Combine `RUST_LOG` and `--log-level` into one filter.
///
/// `RUST_LOG` directives are kept as given. An explicit `--log-level` sets the
/// crate level on top of them; without either, the crate logs at `info`.
pub fn build_filter(level: Option<&str>, rust_log: Option<&str>) -> Result<EnvFilter, String> {
    let rust_log = rust_log.map(str::trim).filter(|s| !s.is_empty());
    let filter = match rust_log {
        Some(spec) => EnvFilter::try_new(spec).map_err(|e| format!("Invalid RUST_LOG '{}': {}", spec, e))?,
        None => EnvFilter::new(""),
    };

    let level = match (level, rust_log) {
        (Some(level), _) => level,
        (None, None) => DEFAULT_LEVEL,
        (None, Some(_)) => return Ok(filter),
    };
    let directive = level_directive(level)?;
    let directive = directive
        .parse()
        .map_err(|e| format!("Invalid log directive '{}': {}", directive, e))?;
    Ok(filter.add_directive(directive))
}

/// Initialize the global subscriber from `--log-level` and the `RUST_LOG` environment.
pub fn init_logging(level: Option<&str>) -> Result<(), String> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, rust_log.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
