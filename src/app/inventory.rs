// FortiRep - app/inventory.rs
//
// Artifact inventory for the `list` subcommand, and the artifact
// filename patterns it shares with the monthly roll-up. Inventory is a
// read-only view: it reports what is on disk without validating dates
// beyond the filename shape, so operators see stray artifacts too.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::app::config::module_paths;
use crate::core::model::ModuleKind;
use crate::core::module::ModuleSpec;
use crate::core::period::Period;
use crate::platform::config::AppConfig;
use crate::util::constants;

// =============================================================================
// Artifact filename patterns
// =============================================================================

/// Anchored pattern for `{DailyPrefix}_{YYYYMMDD}.html`; the date stamp
/// is capture 1.
pub(crate) fn daily_artifact_pattern(spec: &ModuleSpec) -> regex::Regex {
    regex::Regex::new(&format!(
        r"^{}_(\d{{8}})\.html$",
        regex::escape(spec.daily_prefix)
    ))
    .expect("hard-coded artifact pattern must compile")
}

/// Anchored pattern for `{MonthlyPrefix}_Monthly_Report_{YYYYMM}.html`;
/// the month stamp is capture 1.
pub(crate) fn monthly_artifact_pattern(spec: &ModuleSpec) -> regex::Regex {
    regex::Regex::new(&format!(
        r"^{}_{}_(\d{{6}})\.html$",
        regex::escape(spec.monthly_prefix),
        regex::escape(constants::MONTHLY_INFIX),
    ))
    .expect("hard-coded artifact pattern must compile")
}

// =============================================================================
// Inventory
// =============================================================================

/// One report artifact found on disk. The stamp is taken from the
/// filename verbatim.
#[derive(Debug, Serialize)]
pub struct InventoryEntry {
    pub module: ModuleKind,
    pub period: Period,
    pub stamp: String,
    /// Whether the JSON sidecar still sits beside the artifact. Tells an
    /// operator which days a roll-up will read exactly and which will go
    /// through HTML extraction.
    pub sidecar: bool,
    pub path: PathBuf,
}

/// Collect the report artifacts on disk for `kinds`, optionally narrowed
/// to one period.
///
/// Output order is deterministic: modules in the order given, daily
/// before monthly within a module, stamps newest first within a period.
/// Missing report directories contribute nothing.
pub fn collect_inventory(
    config: &AppConfig,
    kinds: &[ModuleKind],
    period: Option<Period>,
) -> Vec<InventoryEntry> {
    let wants = |p: Period| period.is_none() || period == Some(p);
    let mut entries = Vec::new();

    for &kind in kinds {
        let spec = kind.spec();
        let paths = module_paths(config, kind);

        if wants(Period::Daily) {
            push_sorted(
                &mut entries,
                kind,
                Period::Daily,
                list_matching(&paths.daily_reports, &daily_artifact_pattern(spec)),
            );
        }
        if wants(Period::Monthly) {
            push_sorted(
                &mut entries,
                kind,
                Period::Monthly,
                list_matching(&paths.monthly_reports, &monthly_artifact_pattern(spec)),
            );
        }
    }

    tracing::debug!(entries = entries.len(), "Inventory collected");
    entries
}

/// Render entries as pretty JSON for `list --json`.
pub fn to_json(entries: &[InventoryEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Render one entry as a fixed-width text line.
pub fn to_text_line(entry: &InventoryEntry) -> String {
    format!(
        "{:<10} {:<8} {:<8} {:<8} {}",
        entry.module,
        entry.period,
        entry.stamp,
        if entry.sidecar { "sidecar" } else { "-" },
        entry.path.display()
    )
}

fn push_sorted(
    entries: &mut Vec<InventoryEntry>,
    kind: ModuleKind,
    period: Period,
    mut found: Vec<(String, PathBuf)>,
) {
    // Stamps are fixed-width digits: lexicographic order is chronological.
    found.sort_by(|a, b| b.cmp(a));
    entries.extend(found.into_iter().map(|(stamp, path)| InventoryEntry {
        module: kind,
        period,
        stamp,
        sidecar: path.with_extension("json").is_file(),
        path,
    }));
}

/// Filenames in `dir` matching `pattern`, paired with their capture-1
/// stamp. Unreadable entries are skipped, not fatal.
fn list_matching(dir: &Path, pattern: &regex::Regex) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry during inventory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            pattern
                .captures(&name)
                .map(|caps| (caps[1].to_string(), entry.into_path()))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn daily_pattern_is_anchored_and_captures_the_stamp() {
        let pattern = daily_artifact_pattern(ModuleKind::WebFilter.spec());

        let caps = pattern
            .captures("WebFilter_Blocked_20250601.html")
            .expect("exact name matches");
        assert_eq!(&caps[1], "20250601");

        assert!(!pattern.is_match("xWebFilter_Blocked_20250601.html"));
        assert!(!pattern.is_match("WebFilter_Blocked_20250601.html.bak"));
        assert!(!pattern.is_match("WebFilter_Blocked_2025060.html"));
        assert!(!pattern.is_match("WebFilter_Blocked_20250601.json"));
    }

    #[test]
    fn monthly_pattern_requires_the_infix() {
        let pattern = monthly_artifact_pattern(ModuleKind::Ips.spec());

        assert!(pattern.is_match("IPS_Monthly_Report_202506.html"));
        assert!(!pattern.is_match("IPS_202506.html"));
        assert!(!pattern.is_match("IPS_Monthly_Report_20250601.html"));
    }

    /// Two IPS dailies (only the older one kept its sidecar), one
    /// monthly, plus the sidecar file itself which must not be listed.
    fn ips_fixture() -> (tempfile::TempDir, AppConfig) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            base_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let paths = module_paths(&config, ModuleKind::Ips);
        fs::create_dir_all(&paths.daily_reports).expect("mkdir");
        fs::create_dir_all(&paths.monthly_reports).expect("mkdir");
        fs::write(
            paths.daily_reports.join("IPS_Critical_Events_20250615.html"),
            "x",
        )
        .expect("write");
        fs::write(
            paths.daily_reports.join("IPS_Critical_Events_20250601.html"),
            "x",
        )
        .expect("write");
        fs::write(
            paths.daily_reports.join("IPS_Critical_Events_20250601.json"),
            "x",
        )
        .expect("write");
        fs::write(
            paths.monthly_reports.join("IPS_Monthly_Report_202506.html"),
            "x",
        )
        .expect("write");
        (dir, config)
    }

    #[test]
    fn inventory_lists_daily_then_monthly_newest_first() {
        let (_dir, config) = ips_fixture();

        let entries = collect_inventory(&config, &[ModuleKind::Ips], None);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.module == ModuleKind::Ips));

        assert_eq!(entries[0].period, Period::Daily);
        assert_eq!(entries[0].stamp, "20250615");
        assert_eq!(entries[1].stamp, "20250601");
        assert_eq!(entries[2].period, Period::Monthly);
        assert_eq!(entries[2].stamp, "202506");
    }

    #[test]
    fn sidecar_presence_is_reported_per_artifact() {
        let (_dir, config) = ips_fixture();

        let entries = collect_inventory(&config, &[ModuleKind::Ips], None);
        assert!(!entries[0].sidecar);
        assert!(entries[1].sidecar);
        assert!(!entries[2].sidecar);
    }

    #[test]
    fn period_filter_narrows_the_listing() {
        let (_dir, config) = ips_fixture();

        let monthly = collect_inventory(&config, &[ModuleKind::Ips], Some(Period::Monthly));
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].stamp, "202506");

        let daily = collect_inventory(&config, &[ModuleKind::Ips], Some(Period::Daily));
        assert_eq!(daily.len(), 2);
        assert!(daily.iter().all(|e| e.period == Period::Daily));
    }

    #[test]
    fn missing_report_directories_contribute_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            base_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let entries = collect_inventory(&config, &ModuleKind::all(), None);
        assert!(entries.is_empty());
    }

    #[test]
    fn entries_serialize_with_module_slugs() {
        let entry = InventoryEntry {
            module: ModuleKind::AppControl,
            period: Period::Daily,
            stamp: "20250601".to_string(),
            sidecar: true,
            path: PathBuf::from("fortigate/daily_reports/AppCtrl_Blocked_20250601.html"),
        };

        let json = to_json(std::slice::from_ref(&entry)).expect("serializes");
        assert!(json.contains("\"appctrl\""));
        assert!(json.contains("\"daily\""));
        assert!(json.contains("\"20250601\""));
        assert!(json.contains("\"sidecar\": true"));

        let line = to_text_line(&entry);
        assert!(line.starts_with("appctrl"));
        assert!(line.contains("daily"));
        assert!(line.contains("sidecar"));
    }
}
