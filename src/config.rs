use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::OverlayError;
use crate::message::ResponseShape;

// Default configuration
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/chat";
pub const DEFAULT_CONTAINER_ID: &str = "chat-overlay";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_DWELL_MS: u64 = 60_000;
pub const DEFAULT_FADE_MS: u64 = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_WELCOME_AUTHOR: &str = "LiveQuest";
pub const DEFAULT_WELCOME_TEXT: &str = "ready to receive messages";

/// Everything the overlay and its poller need at runtime.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub dwell_ms: u64,
    pub fade_ms: u64,
    pub request_timeout_ms: u64,
    pub response_shape: ResponseShape,
    pub container_id: String,
    pub welcome_author: String,
    pub welcome_text: String,
    pub theme: String,
    pub window_width: f32,
    pub window_height: f32,
    pub always_on_top: bool,
    pub show_timestamps: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            dwell_ms: DEFAULT_DWELL_MS,
            fade_ms: DEFAULT_FADE_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            response_shape: ResponseShape::Bare,
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            welcome_author: DEFAULT_WELCOME_AUTHOR.to_string(),
            welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
            theme: "dark".to_string(),
            window_width: 420.0,
            window_height: 640.0,
            always_on_top: true,
            show_timestamps: false,
        }
    }
}

impl OverlayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Startup checks. Any failure here is fatal.
    pub fn validate(&self) -> Result<(), OverlayError> {
        validate_endpoint(&self.endpoint)?;

        if self.container_id.trim().is_empty() {
            return Err(OverlayError::MissingContainer);
        }
        for (field, value) in [
            ("poll_interval_ms", self.poll_interval_ms),
            ("dwell_ms", self.dwell_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ] {
            if value == 0 {
                return Err(OverlayError::InvalidConfig {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if self.fade_ms > self.dwell_ms {
            return Err(OverlayError::InvalidConfig {
                field: "fade_ms",
                reason: format!("{} exceeds dwell_ms {}", self.fade_ms, self.dwell_ms),
            });
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(OverlayError::InvalidConfig {
                field: "window_width/window_height",
                reason: "window must have a positive size".into(),
            });
        }
        Ok(())
    }
}

/// Validates that the endpoint is an absolute http(s) URL
pub fn validate_endpoint(endpoint: &str) -> Result<reqwest::Url, OverlayError> {
    let invalid = |reason: String| OverlayError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    if endpoint.trim().is_empty() {
        return Err(invalid("endpoint cannot be empty".into()));
    }
    let url = reqwest::Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}

pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "chat-overlay", "chat-overlay")
        .map(|proj| proj.config_dir().join("settings.json"))
}

/// Load settings from `path`. A missing file yields defaults; a malformed one is an error.
pub fn load_settings_from(path: &Path) -> Result<OverlayConfig, OverlayError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(event = "overlay.config.not_found", path = %path.display());
            return Ok(OverlayConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config = serde_json::from_str(&content)?;
    tracing::info!(event = "overlay.config.loaded", path = %path.display());
    Ok(config)
}

pub fn save_settings_to(path: &Path, config: &OverlayConfig) -> Result<(), OverlayError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let data = serde_json::to_string_pretty(config)?;
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    tracing::info!(event = "overlay.config.saved", path = %path.display());
    Ok(())
}

/// Command-line overrides, applied on top of the settings file.
#[derive(clap::Parser, Debug)]
#[command(name = "chat-overlay", about = "Show live chat messages as a transient overlay")]
pub struct CliArgs {
    /// Settings file to use instead of the per-user one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chat history URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Milliseconds between polls
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Milliseconds a message stays on screen
    #[arg(long)]
    pub dwell_ms: Option<u64>,

    /// Milliseconds of fade-out at the end of the dwell
    #[arg(long)]
    pub fade_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Response body layout served by the endpoint
    #[arg(long, value_enum)]
    pub response_shape: Option<ResponseShape>,

    /// Minimum log level (debug, info, warn, error); defaults to info unless RUST_LOG is set
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    pub save_config: bool,
}

impl CliArgs {
    pub fn apply(&self, config: &mut OverlayConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(v) = self.poll_interval_ms {
            config.poll_interval_ms = v;
        }
        if let Some(v) = self.dwell_ms {
            config.dwell_ms = v;
        }
        if let Some(v) = self.fade_ms {
            config.fade_ms = v;
        }
        if let Some(v) = self.request_timeout_ms {
            config.request_timeout_ms = v;
        }
        if let Some(shape) = self.response_shape {
            config.response_shape = shape;
        }
    }

    /// The settings file this invocation reads (and, with `--save-config`, writes).
    pub fn settings_file(&self) -> Option<PathBuf> {
        self.config.clone().or_else(settings_path)
    }
}

/// Resolve defaults, settings file and CLI flags into one validated config.
pub fn resolve(args: &CliArgs) -> Result<OverlayConfig, OverlayError> {
    let mut config = match args.settings_file() {
        Some(path) => load_settings_from(&path)?,
        None => OverlayConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Write `config` to the settings file chosen by `args`.
///
/// Returns the path written, or `None` when there is no per-user settings
/// directory and no `--config` path was given.
pub fn save_effective(args: &CliArgs, config: &OverlayConfig) -> Result<Option<PathBuf>, OverlayError> {
    let Some(path) = args.settings_file() else {
        tracing::warn!(
            event = "overlay.config.save_skipped",
            reason = "no settings directory for this user; pass --config <path>",
        );
        return Ok(None);
    };
    save_settings_to(&path, config)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_are_valid() {
        let config = OverlayConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.dwell(), Duration::from_secs(60));
        assert_eq!(config.container_id, "chat-overlay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("http://localhost:8080/chat").is_ok());
        assert!(validate_endpoint("https://example.com/chat").is_ok());

        assert!(validate_endpoint("").is_err());
        assert!(validate_endpoint("localhost:8080/chat").is_err());
        assert!(validate_endpoint("ftp://example.com/chat").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timings() {
        let config = OverlayConfig { poll_interval_ms: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig { field: "poll_interval_ms", .. })
        ));

        let config = OverlayConfig { dwell_ms: 0, fade_ms: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig { field: "dwell_ms", .. })
        ));
    }

    #[test]
    fn test_validate_fade_longer_than_dwell() {
        let config = OverlayConfig { dwell_ms: 500, fade_ms: 1000, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(OverlayError::InvalidConfig { field: "fade_ms", .. })
        ));
    }

    #[test]
    fn test_validate_missing_container() {
        let config = OverlayConfig { container_id: "  ".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(OverlayError::MissingContainer)));
    }

    #[test]
    fn test_settings_round_trip_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let config = OverlayConfig { dwell_ms: 20_000, ..Default::default() };
        save_settings_to(&path, &config).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), config);

        // Fields missing from the file fall back to defaults
        fs::write(&path, r#"{"response_shape": "wrapped", "poll_interval_ms": 250}"#).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.response_shape, ResponseShape::Wrapped);
        assert_eq!(loaded.poll_interval_ms, 250);
        assert_eq!(loaded.dwell_ms, DEFAULT_DWELL_MS);
    }

    #[test]
    fn test_missing_settings_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, OverlayConfig::default());
    }

    #[test]
    fn test_malformed_settings_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_settings_from(&path), Err(OverlayError::Decode(_))));
    }

    #[test]
    fn test_cli_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"dwell_ms": 20000, "endpoint": "http://stream.local/chat"}"#).unwrap();

        let args = CliArgs::parse_from([
            "chat-overlay",
            "--config",
            path.to_str().unwrap(),
            "--dwell-ms",
            "5000",
            "--response-shape",
            "wrapped",
        ]);
        let config = resolve(&args).unwrap();
        assert_eq!(config.dwell_ms, 5000);
        assert_eq!(config.endpoint, "http://stream.local/chat");
        assert_eq!(config.response_shape, ResponseShape::Wrapped);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_log_level_only_set_when_given() {
        let args = CliArgs::parse_from(["chat-overlay", "--log-level", "debug"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        let args = CliArgs::parse_from(["chat-overlay"]);
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_save_effective_writes_chosen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let args = CliArgs::parse_from([
            "chat-overlay",
            "--config",
            path.to_str().unwrap(),
            "--dwell-ms",
            "20000",
            "--save-config",
        ]);
        let config = resolve(&args).unwrap();

        assert_eq!(save_effective(&args, &config).unwrap(), Some(path.clone()));
        assert_eq!(load_settings_from(&path).unwrap().dwell_ms, 20_000);
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs::parse_from([
            "chat-overlay",
            "--config",
            dir.path().join("none.json").to_str().unwrap(),
            "--endpoint",
            "nope",
        ]);
        assert!(matches!(resolve(&args), Err(OverlayError::InvalidEndpoint { .. })));
    }
}
