// FortiRep - app/locate.rs
//
// Raw log discovery for one module and day.
//
// Operators drop FortiGate exports into `Raw Logs/` by hand, so the
// filenames drift: `disk-` prefixes come and go, dates arrive with
// underscores, dashes, or no separator, and extensions vary between
// `.log`, `.txt`, and nothing at all. Discovery therefore runs in two
// stages: an exact candidate ladder built from the module descriptor,
// then a bounded directory scan that accepts any filename carrying both
// a module name token and the requested date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::module::ModuleSpec;
use crate::core::period;
use crate::util::constants;
use crate::util::error::LocateError;

// =============================================================================
// Entry point
// =============================================================================

/// Locate the raw log for `spec` and `date` under `raw_dir`.
///
/// The candidate ladder is tried in order and the first existing file
/// wins. If no candidate exists, a directory scan (bounded by
/// [`constants::SCAN_MAX_DEPTH`]) looks for a loosely-named export; ties
/// are broken by lexicographic path order so repeated runs pick the same
/// file. Every explicit candidate that was tried is carried in the
/// error for the diagnostic log.
pub fn locate_raw_log(
    spec: &ModuleSpec,
    raw_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, LocateError> {
    if !raw_dir.is_dir() {
        return Err(LocateError::LogDirMissing {
            module: spec.display_name,
            path: raw_dir.to_path_buf(),
        });
    }

    let mut attempted: Vec<PathBuf> = Vec::new();
    for stem in candidate_stems(spec, date) {
        for ext in constants::RAW_LOG_EXTENSIONS {
            let candidate = raw_dir.join(format!("{stem}{ext}"));
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Raw log located by candidate ladder");
                return Ok(candidate);
            }
            attempted.push(candidate);
        }
    }

    if let Some(found) = fallback_scan(spec, raw_dir, date) {
        tracing::info!(
            path = %found.display(),
            module = spec.display_name,
            "Raw log found by directory scan after all named candidates missed"
        );
        return Ok(found);
    }

    Err(LocateError::LogNotFound {
        module: spec.display_name,
        date: period::day_token(date),
        attempted,
    })
}

// =============================================================================
// Candidate ladder
// =============================================================================

/// Filename stems to try, most conventional first: the `disk-` prefixed
/// token, the bare token, then each legacy alias, each combined with the
/// underscore, dash, and compact date forms.
fn candidate_stems(spec: &ModuleSpec, date: NaiveDate) -> Vec<String> {
    let forms = date_forms(date);

    let mut prefixes: Vec<String> = Vec::with_capacity(2 + spec.legacy_aliases.len());
    prefixes.push(format!("disk-{}", spec.log_token));
    prefixes.push(spec.log_token.to_string());
    prefixes.extend(spec.legacy_aliases.iter().map(|alias| (*alias).to_string()));

    let mut stems = Vec::with_capacity(prefixes.len() * forms.len());
    for prefix in &prefixes {
        for form in &forms {
            stems.push(format!("{prefix}-{form}"));
        }
    }
    stems
}

/// The three date spellings seen in operator exports, in ladder order.
fn date_forms(date: NaiveDate) -> [String; 3] {
    [
        period::day_token(date),
        date.format("%Y-%m-%d").to_string(),
        period::day_stamp(date),
    ]
}

// =============================================================================
// Fallback scan
// =============================================================================

/// Scan `raw_dir` for any file whose name carries a module name token and
/// the requested date in some form. Returns the lexicographically first
/// match so the pick is stable across runs.
fn fallback_scan(spec: &ModuleSpec, raw_dir: &Path, date: NaiveDate) -> Option<PathBuf> {
    let patterns = scan_patterns(spec, date);

    let mut matches: Vec<PathBuf> = walkdir::WalkDir::new(raw_dir)
        .max_depth(constants::SCAN_MAX_DEPTH)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping inaccessible entry during scan");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            has_log_extension(&name) && patterns.iter().any(|p| p.matches(&name))
        })
        .map(|entry| entry.into_path())
        .collect();

    matches.sort();
    matches.into_iter().next()
}

/// One glob per (name token, date form) pair, e.g. `*webfilter*2025_06_01*`.
/// Tokens and dates contain no glob metacharacters, so compilation cannot
/// fail.
fn scan_patterns(spec: &ModuleSpec, date: NaiveDate) -> Vec<glob::Pattern> {
    let forms = date_forms(date);
    let mut patterns = Vec::with_capacity((1 + spec.legacy_aliases.len()) * forms.len());
    for token in std::iter::once(spec.log_token).chain(spec.legacy_aliases.iter().copied()) {
        for form in &forms {
            patterns.push(
                glob::Pattern::new(&format!("*{token}*{form}*"))
                    .expect("hard-coded scan pattern must compile"),
            );
        }
    }
    patterns
}

/// Accepts `.log`, `.txt`, and extensionless names. The empty entry in
/// [`constants::RAW_LOG_EXTENSIONS`] means "no dot anywhere", not "any
/// suffix", so `.html` artifacts never match.
fn has_log_extension(name: &str) -> bool {
    constants::RAW_LOG_EXTENSIONS.iter().any(|ext| {
        if ext.is_empty() {
            !name.contains('.')
        } else {
            name.ends_with(ext)
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
