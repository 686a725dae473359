// FortiRep - app/generate.rs
//
// The daily and monthly pipelines: locate or list inputs, run the core
// computation, write artifacts, and record failures in the module's
// error log. Modules are independent; the all-modules fan-out runs them
// in parallel and one module's failure never stops another.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use rayon::prelude::*;

use crate::app::config::{classify_options, module_paths, ModulePaths};
use crate::app::inventory::daily_artifact_pattern;
use crate::app::locate::locate_raw_log;
use crate::core::aggregate::build_daily_summary;
use crate::core::model::ModuleKind;
use crate::core::module::ModuleSpec;
use crate::core::normalize::normalize_content;
use crate::core::period::MonthKey;
use crate::core::rollup::{build_monthly_summary, DailyContribution};
use crate::platform::config::AppConfig;
use crate::report::{export, extract, html, sidecar};
use crate::util::constants;
use crate::util::error::{ExtractError, FortiRepError, Result};

// =============================================================================
// Daily pipeline
// =============================================================================

/// Generate one module's daily report for `date`.
///
/// Returns the path of the written HTML artifact. Failures are appended
/// to the module's error log before propagating.
pub fn run_daily(config: &AppConfig, kind: ModuleKind, date: NaiveDate) -> Result<PathBuf> {
    let spec = kind.spec();
    let paths = module_paths(config, kind);

    let result = daily_inner(config, spec, &paths, date);
    if let Err(e) = &result {
        tracing::error!(module = spec.display_name, date = %date, error = %e, "Daily report failed");
        record_failure(&paths, spec, e);
    }
    result
}

fn daily_inner(
    config: &AppConfig,
    spec: &ModuleSpec,
    paths: &ModulePaths,
    date: NaiveDate,
) -> Result<PathBuf> {
    let raw_path = locate_raw_log(spec, &paths.raw_logs, date)?;
    let source_name = raw_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw_path.display().to_string());

    let content = read_raw_log(&raw_path)?;
    let outcome = normalize_content(&content);
    let summary = build_daily_summary(spec, date, &outcome, &classify_options(config));

    fs::create_dir_all(&paths.daily_reports).map_err(|e| FortiRepError::Io {
        path: paths.daily_reports.clone(),
        operation: "create directory",
        source: e,
    })?;

    let artifact_path = paths.daily_reports.join(spec.daily_artifact_name(date));
    fs::write(&artifact_path, html::render_daily(&summary, &source_name)).map_err(|e| {
        FortiRepError::Io {
            path: artifact_path.clone(),
            operation: "write",
            source: e,
        }
    })?;

    let sidecar_path = paths.daily_reports.join(spec.daily_sidecar_name(date));
    let sidecar_file = fs::File::create(&sidecar_path).map_err(|e| FortiRepError::Io {
        path: sidecar_path.clone(),
        operation: "create",
        source: e,
    })?;
    sidecar::write_sidecar(&summary, sidecar_file, &sidecar_path)?;

    if config.detail_csv {
        let csv_path = paths.daily_reports.join(spec.daily_csv_name(date));
        let csv_file = fs::File::create(&csv_path).map_err(|e| FortiRepError::Io {
            path: csv_path.clone(),
            operation: "create",
            source: e,
        })?;
        let rows = export::export_detail_csv(&summary, csv_file, &csv_path)?;
        tracing::debug!(rows, path = %csv_path.display(), "Detail CSV written");
    }

    tracing::info!(
        module = spec.display_name,
        date = %date,
        total = summary.total_records,
        notable = summary.notable_records,
        path = %artifact_path.display(),
        "Daily report written"
    );
    Ok(artifact_path)
}

/// Read a raw log as UTF-8, replacing invalid sequences. Exports above
/// the size threshold are memory-mapped instead of buffered.
fn read_raw_log(path: &Path) -> Result<String> {
    let file = fs::File::open(path).map_err(|e| io_error(path, "open", e))?;
    let metadata = file.metadata().map_err(|e| io_error(path, "stat", e))?;

    if metadata.len() >= constants::MMAP_THRESHOLD_BYTES {
        // SAFETY: the export is a completed file operators no longer write
        // to. We accept the documented risk that external modification
        // during the map's lifetime is undefined behaviour.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| io_error(path, "mmap", e))?;
        tracing::debug!(
            bytes = metadata.len(),
            path = %path.display(),
            "Reading raw log via mmap"
        );
        Ok(String::from_utf8_lossy(&mmap).into_owned())
    } else {
        let bytes = fs::read(path).map_err(|e| io_error(path, "read", e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// =============================================================================
// Monthly pipeline
// =============================================================================

/// Generate one module's monthly recap for `month`.
///
/// Returns `Ok(None)` when no daily reports exist for the month; the
/// recap is skipped rather than rendered empty. Individual days that
/// cannot be read back are logged and skipped, but if every found day
/// fails the first error propagates, since that points at layout or
/// version drift rather than a coverage gap.
pub fn run_monthly(
    config: &AppConfig,
    kind: ModuleKind,
    month: MonthKey,
) -> Result<Option<PathBuf>> {
    let spec = kind.spec();
    let paths = module_paths(config, kind);

    let result = monthly_inner(spec, &paths, month);
    if let Err(e) = &result {
        tracing::error!(module = spec.display_name, month = %month.stamp(), error = %e, "Monthly recap failed");
        record_failure(&paths, spec, e);
    }
    result
}

fn monthly_inner(
    spec: &ModuleSpec,
    paths: &ModulePaths,
    month: MonthKey,
) -> Result<Option<PathBuf>> {
    let days = find_daily_artifacts(spec, &paths.daily_reports, month);
    if days.is_empty() {
        tracing::warn!(
            module = spec.display_name,
            month = %month.stamp(),
            dir = %paths.daily_reports.display(),
            "No daily reports found for the month; nothing to roll up"
        );
        return Ok(None);
    }

    let days_found = days.len();
    let mut contributions: Vec<DailyContribution> = Vec::with_capacity(days_found);
    let mut first_error: Option<FortiRepError> = None;

    for (date, artifact) in days {
        match read_daily_contribution(spec, &artifact, date) {
            Ok(contribution) => contributions.push(contribution),
            Err(e) => {
                tracing::warn!(
                    module = spec.display_name,
                    date = %date,
                    error = %e,
                    "Daily report unreadable; the month proceeds without it"
                );
                record_failure(paths, spec, &e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if contributions.is_empty() {
        match first_error {
            Some(e) => return Err(e),
            None => return Ok(None),
        }
    }

    let summary = build_monthly_summary(spec, month, days_found, &contributions);

    fs::create_dir_all(&paths.monthly_reports).map_err(|e| FortiRepError::Io {
        path: paths.monthly_reports.clone(),
        operation: "create directory",
        source: e,
    })?;

    let artifact_path = paths.monthly_reports.join(spec.monthly_artifact_name(month));
    fs::write(&artifact_path, html::render_monthly(&summary)).map_err(|e| FortiRepError::Io {
        path: artifact_path.clone(),
        operation: "write",
        source: e,
    })?;

    tracing::info!(
        module = spec.display_name,
        month = %month.stamp(),
        days_found,
        days_read = summary.days_read,
        notable = summary.total_notable,
        path = %artifact_path.display(),
        "Monthly recap written"
    );
    Ok(Some(artifact_path))
}

/// This module's daily artifacts for `month`, sorted by date.
fn find_daily_artifacts(
    spec: &ModuleSpec,
    daily_dir: &Path,
    month: MonthKey,
) -> Vec<(NaiveDate, PathBuf)> {
    if !daily_dir.is_dir() {
        return Vec::new();
    }

    let pattern = daily_artifact_pattern(spec);
    let mut days: Vec<(NaiveDate, PathBuf)> = Vec::new();

    for entry in walkdir::WalkDir::new(daily_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry in daily_reports");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(caps) = pattern.captures(&name) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(&caps[1], constants::DAY_STAMP_FORMAT) else {
            continue;
        };
        if month.contains(date) {
            days.push((date, entry.into_path()));
        }
    }

    days.sort();
    days
}

/// Read one day's payload back, preferring the exact sidecar over HTML
/// extraction.
fn read_daily_contribution(
    spec: &ModuleSpec,
    artifact: &Path,
    date: NaiveDate,
) -> Result<DailyContribution> {
    let sidecar_path = artifact.with_extension("json");
    if sidecar_path.is_file() {
        let content = fs::read_to_string(&sidecar_path).map_err(|e| ExtractError::Io {
            path: sidecar_path.clone(),
            source: e,
        })?;
        let summary = sidecar::read_sidecar(&sidecar_path, &content)?;
        if summary.date != date {
            tracing::warn!(
                file = %sidecar_path.display(),
                filename_date = %date,
                sidecar_date = %summary.date,
                "Sidecar date disagrees with the artifact filename; using the filename"
            );
        }
        tracing::debug!(date = %date, "Daily payload recovered from sidecar");
        return Ok(DailyContribution {
            date,
            notable: summary.notable_records,
            tables: summary.tables,
        });
    }

    let page = fs::read_to_string(artifact).map_err(|e| ExtractError::Io {
        path: artifact.to_path_buf(),
        source: e,
    })?;
    let extracted = extract::extract_daily(artifact, &page, spec)?;
    tracing::debug!(date = %date, "Daily payload recovered from HTML");
    Ok(DailyContribution {
        date,
        notable: extracted.notable,
        tables: extracted.tables,
    })
}

// =============================================================================
// All-modules fan-out
// =============================================================================

/// Run the daily pipeline for several modules in parallel. Results come
/// back in the order given.
pub fn run_daily_all(
    config: &AppConfig,
    kinds: &[ModuleKind],
    date: NaiveDate,
) -> Vec<(ModuleKind, Result<PathBuf>)> {
    kinds
        .par_iter()
        .map(|&kind| (kind, run_daily(config, kind, date)))
        .collect()
}

/// Run the monthly pipeline for several modules in parallel.
pub fn run_monthly_all(
    config: &AppConfig,
    kinds: &[ModuleKind],
    month: MonthKey,
) -> Vec<(ModuleKind, Result<Option<PathBuf>>)> {
    kinds
        .par_iter()
        .map(|&kind| (kind, run_monthly(config, kind, month)))
        .collect()
}

// =============================================================================
// Failure diagnostics
// =============================================================================

/// Append a failure line to the module's error log. Best effort: a
/// failure to record a failure is only traced.
fn record_failure(paths: &ModulePaths, spec: &ModuleSpec, error: &FortiRepError) {
    if let Err(e) = append_error_log(&paths.error_logs, spec, &error.to_string()) {
        tracing::warn!(
            dir = %paths.error_logs.display(),
            error = %e,
            "Could not append to the error log"
        );
    }
}

fn append_error_log(dir: &Path, spec: &ModuleSpec, message: &str) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let now = Local::now();
    let name = format!(
        "{}_{}_{}.txt",
        constants::ERROR_LOG_PREFIX,
        spec.error_tag,
        now.format(constants::DAY_STAMP_FORMAT)
    );
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(name))?;
    writeln!(
        file,
        "[{}] {message}",
        now.format(constants::ERROR_LOG_TIMESTAMP_FORMAT)
    )
}

fn io_error(path: &Path, operation: &'static str, source: std::io::Error) -> FortiRepError {
    FortiRepError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

// =============================================================================
// Tests
// =============================================================================
