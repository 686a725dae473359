// FortiRep - app/config.rs
//
// Bridges the validated platform config to the module descriptor table:
// resolves the on-disk directory layout for each module and derives the
// classification options the core layer consumes.

use std::path::PathBuf;

use crate::core::model::ModuleKind;
use crate::core::module::ClassifyOptions;
use crate::platform::config::AppConfig;
use crate::util::constants;

// =============================================================================
// Per-module directory layout
// =============================================================================

/// Resolved directory layout for one module.
///
/// Every module owns a base directory with four fixed subdirectories.
/// Missing subdirectories are created lazily by the operations that
/// write into them; `raw_logs` is never created by FortiRep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePaths {
    /// The module's base directory.
    pub base: PathBuf,
    /// Where operators drop FortiGate exports.
    pub raw_logs: PathBuf,
    /// Daily HTML artifacts and their sidecars.
    pub daily_reports: PathBuf,
    /// Monthly recap artifacts.
    pub monthly_reports: PathBuf,
    /// Per-module failure diagnostics.
    pub error_logs: PathBuf,
}

/// Resolve the directory layout for `kind`.
///
/// A per-module override from the config wins outright; otherwise the
/// module lives under `base_dir` in its conventional directory.
pub fn module_paths(config: &AppConfig, kind: ModuleKind) -> ModulePaths {
    let spec = kind.spec();
    let base = override_for(config, kind)
        .cloned()
        .unwrap_or_else(|| config.base_dir.join(spec.dir_name));

    ModulePaths {
        raw_logs: base.join(constants::RAW_LOG_DIR_NAME),
        daily_reports: base.join(constants::DAILY_DIR_NAME),
        monthly_reports: base.join(constants::MONTHLY_DIR_NAME),
        error_logs: base.join(constants::ERROR_LOG_DIR_NAME),
        base,
    }
}

fn override_for(config: &AppConfig, kind: ModuleKind) -> Option<&PathBuf> {
    match kind {
        ModuleKind::AppControl => config.appctrl_dir.as_ref(),
        ModuleKind::WebFilter => config.webfilter_dir.as_ref(),
        ModuleKind::Ips => config.ips_dir.as_ref(),
        ModuleKind::Dns => config.dns_dir.as_ref(),
        ModuleKind::Antivirus => config.antivirus_dir.as_ref(),
    }
}

/// Derive the classification options the gate/notability predicates use.
pub fn classify_options(config: &AppConfig) -> ClassifyOptions {
    ClassifyOptions {
        dns_strict_logid: config.dns_strict_logid,
    }
}

// =============================================================================
// Tests
// =============================================================================
