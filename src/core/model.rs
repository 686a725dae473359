// FortiRep - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::fields::FieldMap;
use crate::core::period::MonthKey;

// =============================================================================
// Modules
// =============================================================================

/// The five FortiGate security modules reports are generated for.
///
/// Behavior (gates, notability, ranking axes, filename prefixes, discovery
/// aliases) lives in the static descriptor table in `core::module`; this
/// enum is the key into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    #[serde(rename = "appctrl")]
    AppControl,
    #[serde(rename = "webfilter")]
    WebFilter,
    #[serde(rename = "ips")]
    Ips,
    #[serde(rename = "dns")]
    Dns,
    #[serde(rename = "antivirus")]
    Antivirus,
}

impl ModuleKind {
    /// All modules, in the order they are generated and listed.
    pub fn all() -> [ModuleKind; 5] {
        [
            ModuleKind::AppControl,
            ModuleKind::WebFilter,
            ModuleKind::Ips,
            ModuleKind::Dns,
            ModuleKind::Antivirus,
        ]
    }

    /// Short lowercase identifier used in CLI arguments, config keys,
    /// and log output.
    pub fn slug(self) -> &'static str {
        match self {
            ModuleKind::AppControl => "appctrl",
            ModuleKind::WebFilter => "webfilter",
            ModuleKind::Ips => "ips",
            ModuleKind::Dns => "dns",
            ModuleKind::Antivirus => "antivirus",
        }
    }

    /// Parse a CLI module argument, accepting historical aliases.
    pub fn from_arg(arg: &str) -> Option<ModuleKind> {
        match arg.to_ascii_lowercase().as_str() {
            "appctrl" | "app-ctrl" | "appcontrol" => Some(ModuleKind::AppControl),
            "webfilter" | "web-filter" => Some(ModuleKind::WebFilter),
            "ips" => Some(ModuleKind::Ips),
            "dns" => Some(ModuleKind::Dns),
            "antivirus" | "av" | "virus" => Some(ModuleKind::Antivirus),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad() keeps width specifiers working for column layouts.
        f.pad(self.slug())
    }
}

// =============================================================================
// Records
// =============================================================================

/// One normalized log record: the parsed field set plus the event
/// timestamp assembled from the `date` and `time` fields.
///
/// Records carry no identity; duplicate lines produce duplicate records
/// on purpose, since counts must reflect log volume.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub fields: FieldMap,
}

// =============================================================================
// Ranked tables
// =============================================================================

/// One row of a ranked frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub label: String,
    pub count: u64,
    /// Representative supporting values (first-seen), present only for
    /// tables whose descriptor declares extra columns (IPS attack rows,
    /// DNS domain rows).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl RankedRow {
    pub fn new(label: impl Into<String>, count: u64) -> RankedRow {
        RankedRow {
            label: label.into(),
            count,
            extra: Vec::new(),
        }
    }
}

/// An ordered frequency table: rows sorted by count descending, ties in
/// first-seen order, truncated to the table's top-N.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedTable {
    pub rows: Vec<RankedRow>,
}

impl RankedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Chart view: the first `n` rows as (label, count) pairs. A derived
    /// view over the same rows, not separately stored data.
    pub fn chart_slice(&self, n: usize) -> Vec<(&str, u64)> {
        self.rows
            .iter()
            .take(n)
            .map(|r| (r.label.as_str(), r.count))
            .collect()
    }
}

/// A ranked table tagged with its descriptor id (`"apps"`, `"attacks"`,
/// ...). The id, not the display title, is what the sidecar persists and
/// the monthly roll-up merges on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub id: String,
    pub table: RankedTable,
}

// =============================================================================
// Daily summary
// =============================================================================

/// One fully-resolved detail row: the record timestamp plus the values of
/// the module's detail columns, in descriptor order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub timestamp: NaiveDateTime,
    pub values: Vec<String>,
}

/// The Daily Aggregator's structured output for one module+day.
///
/// This is the payload the daily HTML renders and, serialized as the
/// JSON sidecar, the monthly roll-up's primary source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub module: ModuleKind,
    pub date: NaiveDate,
    /// Every record that normalized successfully, notable or not.
    pub total_records: u64,
    /// Records passing the module's subtype gate.
    pub gated_records: u64,
    /// Gated records passing the notability predicate.
    pub notable_records: u64,
    /// Records dropped for an unparseable `date`+`time`.
    pub dropped_records: u64,
    pub tables: Vec<SummaryTable>,
    /// Most recent notable records, newest first, capped per module.
    pub detail: Vec<DetailRow>,
}

impl DailySummary {
    /// Look up a ranked table by descriptor id.
    pub fn table(&self, id: &str) -> Option<&RankedTable> {
        self.tables.iter().find(|t| t.id == id).map(|t| &t.table)
    }
}

// =============================================================================
// Monthly summary
// =============================================================================

/// The monthly roll-up's merged output for one module+month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub module: ModuleKind,
    pub month: MonthKey,
    /// Daily artifacts whose filename date fell inside the month.
    pub days_found: usize,
    /// Daily artifacts that actually contributed data (sidecar read or
    /// legacy HTML extraction succeeded).
    pub days_read: usize,
    /// Sum of the contributing days' notable counts.
    pub total_notable: u64,
    pub tables: Vec<SummaryTable>,
    /// Notable count per day of month; index 0 is day 1, days without a
    /// readable report stay 0.
    pub trend: Vec<u64>,
}

impl MonthlySummary {
    pub fn table(&self, id: &str) -> Option<&RankedTable> {
        self.tables.iter().find(|t| t.id == id).map(|t| &t.table)
    }
}

// =============================================================================
// Tests
// =============================================================================
