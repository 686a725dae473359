// FortiRep - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant carries enough
// context (module, date, paths attempted) for the diagnostic to stand
// on its own in the error log.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all FortiRep operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum FortiRepError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Raw log discovery failed.
    Locate(LocateError),

    /// A CLI date/month argument could not be interpreted.
    Argument(ArgumentError),

    /// Reading a daily summary back (sidecar or legacy HTML) failed.
    Extract(ExtractError),

    /// Artifact or CSV export failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for FortiRepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Locate(e) => write!(f, "Log discovery error: {e}"),
            Self::Argument(e) => write!(f, "Argument error: {e}"),
            Self::Extract(e) => write!(f, "Roll-up extraction error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for FortiRepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Locate(e) => Some(e),
            Self::Argument(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for FortiRepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Locate errors
// ---------------------------------------------------------------------------

/// Errors related to raw-log discovery.
#[derive(Debug)]
pub enum LocateError {
    /// The module's raw-log directory does not exist.
    LogDirMissing { module: &'static str, path: PathBuf },

    /// No raw log file matched any candidate name or the fallback scan.
    /// `attempted` lists every explicit path that was tried, in order.
    LogNotFound {
        module: &'static str,
        date: String,
        attempted: Vec<PathBuf>,
    },
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogDirMissing { module, path } => write!(
                f,
                "{module}: raw log directory '{}' does not exist",
                path.display()
            ),
            Self::LogNotFound {
                module,
                date,
                attempted,
            } => {
                write!(
                    f,
                    "{module}: no raw log found for {date}. Tried {} candidates: ",
                    attempted.len()
                )?;
                for (i, path) in attempted.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", path.display())?;
                }
                write!(f, "; directory scan found no filename containing both the date and the module name")
            }
        }
    }
}

impl std::error::Error for LocateError {}

impl From<LocateError> for FortiRepError {
    fn from(e: LocateError) -> Self {
        Self::Locate(e)
    }
}

// ---------------------------------------------------------------------------
// Argument errors
// ---------------------------------------------------------------------------

/// Errors related to CLI arguments.
#[derive(Debug)]
pub enum ArgumentError {
    /// Daily date argument did not match `YYYY_MM_DD`.
    InvalidDay { given: String },

    /// Monthly argument did not match `YYYYMM`, `YYYY_MM`, or `YYYY-MM`.
    InvalidMonth { given: String },

    /// Module argument named no known module or alias.
    InvalidModule { given: String },

    /// Period argument named neither `daily` nor `monthly`.
    InvalidPeriod { given: String },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDay { given } => {
                write!(f, "'{given}' is not a valid day (expected YYYY_MM_DD)")
            }
            Self::InvalidMonth { given } => write!(
                f,
                "'{given}' is not a valid month (expected YYYYMM, YYYY_MM, or YYYY-MM)"
            ),
            Self::InvalidModule { given } => write!(
                f,
                "'{given}' is not a known module (expected appctrl, webfilter, ips, dns, antivirus, or all)"
            ),
            Self::InvalidPeriod { given } => write!(
                f,
                "'{given}' is not a report period (expected daily or monthly)"
            ),
        }
    }
}

impl std::error::Error for ArgumentError {}

impl From<ArgumentError> for FortiRepError {
    fn from(e: ArgumentError) -> Self {
        Self::Argument(e)
    }
}

// ---------------------------------------------------------------------------
// Extract errors
// ---------------------------------------------------------------------------

/// Errors reading a day's summary back from disk for the monthly roll-up.
/// These are recovered per file: the day contributes nothing and the
/// month continues.
#[derive(Debug)]
pub enum ExtractError {
    /// Sidecar envelope carries an unsupported version.
    SidecarVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// Sidecar JSON could not be deserialised.
    SidecarJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The daily HTML did not contain the table shape this adapter expects.
    /// `expected` describes the shape in words (table position, column count).
    HtmlShape { path: PathBuf, expected: String },

    /// I/O error reading a daily artifact or sidecar.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SidecarVersion {
                path,
                found,
                expected,
            } => write!(
                f,
                "Sidecar '{}' has version {found}, expected {expected}",
                path.display()
            ),
            Self::SidecarJson { path, source } => {
                write!(f, "Sidecar '{}' is not readable: {source}", path.display())
            }
            Self::HtmlShape { path, expected } => write!(
                f,
                "Daily report '{}' does not match the expected layout ({expected})",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SidecarJson { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExtractError> for FortiRepError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to artifact and CSV writes.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing an output file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for FortiRepError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for FortiRep results.
pub type Result<T> = std::result::Result<T, FortiRepError>;
