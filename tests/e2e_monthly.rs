// FortiRep - tests/e2e_monthly.rs
//
// End-to-end tests for the monthly roll-up pipeline.
//
// Each test builds real daily artifacts first (through the daily
// pipeline, on a real filesystem), then rolls them up. Both recovery
// paths are exercised: the exact sidecar path and the HTML extraction
// fallback used when sidecars are gone.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use fortirep::app::config::module_paths;
use fortirep::app::generate::{run_daily, run_monthly};
use fortirep::core::model::ModuleKind;
use fortirep::core::period::MonthKey;
use fortirep::platform::config::AppConfig;
use fortirep::util::error::{ExtractError, FortiRepError};

// =============================================================================
// Helpers
// =============================================================================

fn month() -> MonthKey {
    MonthKey::new(2025, 6).unwrap()
}

fn config_at(root: &Path) -> AppConfig {
    AppConfig {
        base_dir: root.to_path_buf(),
        ..AppConfig::default()
    }
}

/// Run the daily pipeline for `kind` on `day`, feeding it a raw log
/// with `records`. Returns the daily artifact path.
fn make_daily(config: &AppConfig, kind: ModuleKind, day: u32, records: &str) -> PathBuf {
    let date = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
    let paths = module_paths(config, kind);
    fs::create_dir_all(&paths.raw_logs).unwrap();

    let name = format!("disk-{}-2025_06_{day:02}.log", kind.spec().log_token);
    fs::write(paths.raw_logs.join(name), records).unwrap();

    run_daily(config, kind, date).expect("daily run succeeds")
}

fn ips_record(day: u32, attack: &str, srcip: &str) -> String {
    format!(
        "date=2025-06-{day:02} time=09:30:00 subtype=ips eventtype=signature severity=critical \
         attack=\"{attack}\" action=dropped srcip={srcip} srccountry=\"France\" \
         dstip=10.0.0.8 service=HTTPS\n"
    )
}

// =============================================================================
// Roll-up semantics
// =============================================================================

/// Two daily reports roll up through their sidecars: counts sum, rows
/// merge on the attack identity, and the trend carries per-day slots.
#[test]
fn e2e_monthly_rolls_up_sidecars() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    let mut day1 = ips_record(1, "SQL.Injection", "203.0.113.5");
    day1.push_str(&ips_record(1, "SQL.Injection", "203.0.113.5"));
    make_daily(&config, ModuleKind::Ips, 1, &day1);
    make_daily(&config, ModuleKind::Ips, 15, &ips_record(15, "SQL.Injection", "203.0.113.5"));

    let artifact = run_monthly(&config, ModuleKind::Ips, month())
        .expect("monthly succeeds")
        .expect("an artifact is produced");
    assert_eq!(
        artifact.file_name().unwrap().to_str().unwrap(),
        "IPS_Monthly_Report_202506.html"
    );

    let page = fs::read_to_string(&artifact).unwrap();
    assert!(page.contains("IPS Monthly Recap"));
    assert!(page.contains("June 2025"));
    assert!(page.contains("<b>Daily Reports Found:</b> 2<br>"));
    assert!(page.contains("<b>Daily Reports Read:</b> 2<br>"));
    assert!(page.contains("<span data-stat=\"notable\">3</span>"));

    // Same attack/source/country/target on both days merges into one row.
    assert!(page.contains("<td>SQL.Injection</td><td>3</td>"));

    // The IPS recap renders the daily trend chart.
    assert!(page.contains("id=\"trend\""));
    assert!(page.contains("new Chart(document.getElementById('trend')"));
}

/// With sidecars deleted, the roll-up recovers the same numbers from
/// the daily HTML itself.
#[test]
fn e2e_monthly_extracts_from_html_when_sidecars_are_gone() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    make_daily(&config, ModuleKind::Ips, 1, &ips_record(1, "Backdoor.Rat", "198.51.100.9"));
    make_daily(&config, ModuleKind::Ips, 2, &ips_record(2, "Backdoor.Rat", "198.51.100.9"));

    let paths = module_paths(&config, ModuleKind::Ips);
    for entry in fs::read_dir(&paths.daily_reports).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "json") {
            fs::remove_file(path).unwrap();
        }
    }

    let artifact = run_monthly(&config, ModuleKind::Ips, month())
        .expect("extraction fallback succeeds")
        .expect("an artifact is produced");

    let page = fs::read_to_string(&artifact).unwrap();
    assert!(page.contains("<b>Daily Reports Read:</b> 2<br>"));
    assert!(page.contains("<span data-stat=\"notable\">2</span>"));
    assert!(page.contains("<td>Backdoor.Rat</td><td>2</td>"));
}

/// Days from a neighbouring month are not rolled up.
#[test]
fn e2e_monthly_ignores_other_months() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    make_daily(&config, ModuleKind::Ips, 30, &ips_record(30, "SQL.Injection", "203.0.113.5"));

    // A July daily in the same directory.
    let paths = module_paths(&config, ModuleKind::Ips);
    fs::write(
        paths.raw_logs.join("disk-ips-2025_07_01.log"),
        "date=2025-07-01 time=09:30:00 subtype=ips eventtype=signature severity=critical \
         attack=\"Other.Attack\" action=dropped srcip=203.0.113.6 srccountry=\"Spain\" \
         dstip=10.0.0.9 service=SSH\n",
    )
    .unwrap();
    run_daily(&config, ModuleKind::Ips, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()).unwrap();

    let artifact = run_monthly(&config, ModuleKind::Ips, month())
        .unwrap()
        .expect("June artifact produced");
    let page = fs::read_to_string(&artifact).unwrap();
    assert!(page.contains("<b>Daily Reports Found:</b> 1<br>"));
    assert!(!page.contains("Other.Attack"));
}

// =============================================================================
// Degradation and failure
// =============================================================================

/// No daily reports at all: success, but no artifact is written.
#[test]
fn e2e_monthly_with_no_dailies_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    let result = run_monthly(&config, ModuleKind::Dns, month()).expect("empty month is not an error");
    assert!(result.is_none());

    let paths = module_paths(&config, ModuleKind::Dns);
    assert!(
        !paths.monthly_reports.exists(),
        "no monthly directory should be created for an empty month"
    );
}

/// One unreadable day out of two: the month proceeds, the stats show
/// the gap, and the failure is recorded in the error log.
#[test]
fn e2e_monthly_skips_an_unreadable_day() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    let good = make_daily(&config, ModuleKind::Ips, 1, &ips_record(1, "SQL.Injection", "203.0.113.5"));
    let bad = make_daily(&config, ModuleKind::Ips, 2, &ips_record(2, "SQL.Injection", "203.0.113.5"));

    // Corrupt day 2 beyond both recovery paths.
    fs::write(bad.with_extension("json"), "{ not json").unwrap();
    fs::write(&bad, "<html><body><p>old layout</p></body></html>").unwrap();
    assert!(good.is_file());

    let artifact = run_monthly(&config, ModuleKind::Ips, month())
        .expect("one good day carries the month")
        .expect("an artifact is produced");

    let page = fs::read_to_string(&artifact).unwrap();
    assert!(page.contains("<b>Daily Reports Found:</b> 2<br>"));
    assert!(page.contains("<b>Daily Reports Read:</b> 1<br>"));
    assert!(page.contains("<span data-stat=\"notable\">1</span>"));

    let paths = module_paths(&config, ModuleKind::Ips);
    let error_files: Vec<_> = fs::read_dir(&paths.error_logs)
        .expect("error log directory exists")
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(error_files.len(), 1);
    assert!(error_files[0].starts_with("ERROR_IPS_"));
}

/// Every found day unreadable: that is drift, not a gap, and the run
/// fails with the classified extraction error.
#[test]
fn e2e_monthly_fails_when_every_day_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());

    let artifact = make_daily(&config, ModuleKind::Ips, 1, &ips_record(1, "SQL.Injection", "203.0.113.5"));
    fs::remove_file(artifact.with_extension("json")).unwrap();
    fs::write(&artifact, "<html><body><p>foreign page</p></body></html>").unwrap();

    let result = run_monthly(&config, ModuleKind::Ips, month());
    assert!(matches!(
        result,
        Err(FortiRepError::Extract(ExtractError::HtmlShape { .. }))
    ));

    let paths = module_paths(&config, ModuleKind::Ips);
    assert!(
        !paths.monthly_reports.exists(),
        "no artifact directory should appear for a failed month"
    );
}
