// FortiRep - platform/config.rs
//
// Platform path resolution and config file loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for FortiRep configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/fortirep/ or %APPDATA%\FortiRep\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Raw deserialisable shape of the config file.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[paths]` section.
    pub paths: PathsSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[dns]` section.
    pub dns: DnsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[paths]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Root under which the per-module directories live.
    pub base_dir: Option<String>,
    /// Per-module base overrides (absolute, or relative to the working
    /// directory). When unset, a module lives at `base_dir/<module dir>`.
    pub appctrl_dir: Option<String>,
    pub webfilter_dir: Option<String>,
    pub ips_dir: Option<String>,
    pub dns_dir: Option<String>,
    pub antivirus_dir: Option<String>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Also write the detail slice as a CSV beside the daily HTML.
    pub detail_csv: Option<bool>,
}

/// `[dns]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DnsSection {
    /// Require the DNS security event id on the DNS gate.
    pub strict_logid: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
///
/// All values are checked at load time; invalid values produce
/// actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root under which the per-module directories live.
    pub base_dir: PathBuf,
    /// Per-module base overrides.
    pub appctrl_dir: Option<PathBuf>,
    pub webfilter_dir: Option<PathBuf>,
    pub ips_dir: Option<PathBuf>,
    pub dns_dir: Option<PathBuf>,
    pub antivirus_dir: Option<PathBuf>,
    /// Write a detail CSV beside each daily HTML report.
    pub detail_csv: bool,
    /// Require `logid=1501054802` on the DNS gate.
    pub dns_strict_logid: bool,
    /// Logging level string (consumed by logging::init before tracing is up).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            appctrl_dir: None,
            webfilter_dir: None,
            ips_dir: None,
            dns_dir: None,
            antivirus_dir: None,
            detail_csv: false,
            dns_strict_logid: false,
            log_level: None,
        }
    }
}

/// Load and validate the config file.
///
/// An explicit `--config` path is authoritative: a missing or
/// unparseable file there is a hard error. Without one, the search
/// order is `fortirep.toml` in the working directory, then
/// `config.toml` in the platform config directory; absence anywhere
/// just means defaults, and an unreadable implicit file degrades to
/// defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        return Ok((validate(raw, &mut warnings), warnings));
    }

    let local = PathBuf::from(constants::LOCAL_CONFIG_FILE_NAME);
    let platform = PlatformPaths::resolve()
        .config_dir
        .join(constants::CONFIG_FILE_NAME);
    let Some(config_path) = [local, platform].into_iter().find(|p| p.exists()) else {
        tracing::debug!("No config file found; using defaults");
        return Ok((AppConfig::default(), warnings));
    };

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults. \
                 See config.example.toml for the expected format.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return Ok((AppConfig::default(), warnings));
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config");
    Ok((validate(raw, &mut warnings), warnings))
}

/// Validate raw values field by field, accumulating all warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(ref base) = raw.paths.base_dir {
        if base.trim().is_empty() {
            warnings.push(
                "[paths] base_dir is empty. Using the working directory.".to_string(),
            );
        } else {
            config.base_dir = PathBuf::from(base);
        }
    }

    let overrides = [
        ("appctrl_dir", &raw.paths.appctrl_dir, &mut config.appctrl_dir),
        ("webfilter_dir", &raw.paths.webfilter_dir, &mut config.webfilter_dir),
        ("ips_dir", &raw.paths.ips_dir, &mut config.ips_dir),
        ("dns_dir", &raw.paths.dns_dir, &mut config.dns_dir),
        ("antivirus_dir", &raw.paths.antivirus_dir, &mut config.antivirus_dir),
    ];
    for (key, value, slot) in overrides {
        if let Some(dir) = value {
            if dir.trim().is_empty() {
                warnings.push(format!(
                    "[paths] {key} is empty. Using base_dir/<module directory>."
                ));
            } else {
                *slot = Some(PathBuf::from(dir));
            }
        }
    }

    if let Some(detail_csv) = raw.report.detail_csv {
        config.detail_csv = detail_csv;
    }

    if let Some(strict) = raw.dns.strict_logid {
        config.dns_strict_logid = strict;
    }

    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    config
}

// =============================================================================
// Tests
// =============================================================================
