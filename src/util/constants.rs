// FortiRep - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "FortiRep";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "FortiRep";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp and date formats
// =============================================================================

/// Format of the combined `date` + `time` fields on a log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compact day stamp embedded in artifact filenames (`20250601`).
pub const DAY_STAMP_FORMAT: &str = "%Y%m%d";

/// Underscore-separated day string used in raw log filenames (`2025_06_01`).
pub const DAY_TOKEN_FORMAT: &str = "%Y_%m_%d";

/// Timestamp prefix for error-log lines.
pub const ERROR_LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Raw log reading
// =============================================================================

/// File size in bytes above which raw logs are memory-mapped instead of
/// buffered into a heap read.
pub const MMAP_THRESHOLD_BYTES: u64 = 64 * 1024 * 1024; // 64 MB

/// Extensions tried, in order, for each raw-log filename stem.
/// The empty entry covers exports saved without an extension.
pub const RAW_LOG_EXTENSIONS: &[&str] = &[".log", ".txt", ""];

/// Maximum directory depth for the raw-log fallback scan.
/// Exports land either directly in the log directory or one folder down.
pub const SCAN_MAX_DEPTH: usize = 2;

// =============================================================================
// Ranking and truncation
// =============================================================================

/// Default row cap for a daily ranked table.
pub const DAILY_TOP_N: usize = 10;

/// Row cap for the WebFilter daily URL table (historically wider).
pub const WEBFILTER_URL_TOP_N: usize = 15;

/// Row cap for the chart view derived from a categorical table.
pub const CHART_TOP_N: usize = 8;

/// Default row cap for a monthly merged table.
pub const MONTHLY_TOP_N: usize = 10;

/// Row cap for the monthly blocked-applications table.
pub const MONTHLY_APP_TOP_N: usize = 12;

/// Row cap for the monthly IPS attack table.
pub const MONTHLY_ATTACK_TOP_N: usize = 15;

/// Row cap for the monthly DNS domain table.
pub const MONTHLY_DOMAIN_TOP_N: usize = 15;

// =============================================================================
// Artifacts
// =============================================================================

/// Infix between the module prefix and the month stamp in monthly filenames.
pub const MONTHLY_INFIX: &str = "Monthly_Report";

/// CSS class carried by every data table in rendered HTML. The legacy
/// extraction adapter selects on this class, so renderer and extractor
/// must agree on it.
pub const HTML_TABLE_CLASS: &str = "table";

/// Sidecar envelope version accepted by the monthly roll-up.
pub const SIDECAR_VERSION: u32 = 1;

/// Layout version stamped into rendered HTML. The extraction adapter
/// reads only pages carrying the version it was written against;
/// changing the renderer layout means bumping this, never silently
/// returning empty tables.
pub const HTML_CONTRACT_VERSION: u32 = 1;

// =============================================================================
// Output directory names (per module base directory)
// =============================================================================

/// Subdirectory holding raw FortiGate log exports.
pub const RAW_LOG_DIR_NAME: &str = "Raw Logs";

/// Subdirectory holding daily artifacts and their sidecars.
pub const DAILY_DIR_NAME: &str = "daily_reports";

/// Subdirectory holding monthly artifacts.
pub const MONTHLY_DIR_NAME: &str = "monthly_reports";

/// Subdirectory holding append-only error logs.
pub const ERROR_LOG_DIR_NAME: &str = "error_logs";

/// Filename prefix for append-only error logs.
pub const ERROR_LOG_PREFIX: &str = "ERROR";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a raw line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up in the working directory first.
pub const LOCAL_CONFIG_FILE_NAME: &str = "fortirep.toml";
