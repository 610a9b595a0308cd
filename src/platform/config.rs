// SVG2Icon - platform/config.rs
//
// Platform-specific data directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for SVG2Icon data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/svg2icon/ or %APPDATA%\svg2icon\config\)
    pub config_dir: PathBuf,

    /// Data directory for generated output.
    pub data_dir: PathBuf,

    /// Per-project output root: `<data_dir>/projects/`.
    pub projects_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();
            let projects_dir = data_dir.join(constants::PROJECTS_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
                projects_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                projects_dir: fallback.join(constants::PROJECTS_DIR_NAME),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[generation]` section.
    pub generation: GenerationSection,
    /// `[download]` section.
    pub download: DownloadSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[generation]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    /// Load host fonts so `<text>` renders.
    pub load_system_fonts: Option<bool>,
    /// Timeout applied to every external converter process.
    pub tool_timeout_seconds: Option<u64>,
}

/// `[download]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DownloadSection {
    /// Default folder bundles are written to.
    pub destination: Option<String>,
    /// Use the in-process zip writer before external archivers.
    pub builtin_zip: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Generation --
    /// Load system fonts into the rasterizer.
    pub load_system_fonts: bool,
    /// Timeout for external processes.
    pub tool_timeout: Duration,

    // -- Download --
    /// Default bundle destination (None = current directory).
    pub download_destination: Option<PathBuf>,
    /// Try the in-process zip writer first.
    pub builtin_zip: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            tool_timeout: Duration::from_secs(constants::DEFAULT_TOOL_TIMEOUT_SECS),
            download_destination: None,
            builtin_zip: true,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` located next to the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir
        .parent()
        .unwrap_or(config_dir)
        .join(constants::CONFIG_FILE_NAME);
    load_config_file(&config_path)
}

/// Load and validate a specific config file path.
pub fn load_config_file(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, validation_warnings) = validate(raw);
    warnings.extend(validation_warnings);
    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let mut config = AppConfig::default();

    // -- Generation: load_system_fonts --
    if let Some(load) = raw.generation.load_system_fonts {
        config.load_system_fonts = load;
    }

    // -- Generation: tool_timeout_seconds --
    if let Some(secs) = raw.generation.tool_timeout_seconds {
        if (constants::MIN_TOOL_TIMEOUT_SECS..=constants::MAX_TOOL_TIMEOUT_SECS).contains(&secs) {
            config.tool_timeout = Duration::from_secs(secs);
        } else {
            warnings.push(out_of_range(
                "generation.tool_timeout_seconds",
                secs.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_TOOL_TIMEOUT_SECS,
                    constants::MAX_TOOL_TIMEOUT_SECS
                ),
                constants::DEFAULT_TOOL_TIMEOUT_SECS.to_string(),
            ));
        }
    }

    // -- Download: destination --
    if let Some(ref dest) = raw.download.destination {
        if !dest.is_empty() {
            let path = PathBuf::from(dest);
            if path.is_dir() {
                config.download_destination = Some(path);
            } else {
                warnings.push(out_of_range(
                    "download.destination",
                    dest.clone(),
                    "an existing directory".to_string(),
                    "the current directory".to_string(),
                ));
            }
        }
    }

    // -- Download: builtin_zip --
    if let Some(builtin) = raw.download.builtin_zip {
        config.builtin_zip = builtin;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug, trace".to_string(),
                constants::DEFAULT_LOG_LEVEL.to_string(),
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Warning text for a rejected value, naming the fallback in use.
fn out_of_range(field: &str, value: String, expected: String, fallback: String) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value,
        expected,
    };
    format!("{err}. Using {fallback}.")
}
