// FortiRep - core/rollup.rs
//
// Monthly roll-up: merge the per-day ranked tables recovered from daily
// artifacts into month-level tables by summing counts for identical
// label tuples. Daily tables are already truncated to their daily top-N,
// so the merge is deliberately lossy below each day's cutoff; monthly
// numbers are "top of the top", not exact month totals.

use std::collections::HashMap;

use chrono::Datelike;

use crate::core::model::{MonthlySummary, RankedRow, RankedTable, SummaryTable};
use crate::core::module::{ModuleSpec, TableSpec};
use crate::core::period::MonthKey;

/// One day's recovered payload, from a sidecar or extracted from HTML.
#[derive(Debug, Clone)]
pub struct DailyContribution {
    pub date: chrono::NaiveDate,
    /// That day's notable count, from the sidecar or the page's stat span.
    pub notable: u64,
    pub tables: Vec<SummaryTable>,
}

/// Trend series length; day-of-month slots 1 through 31.
const TREND_DAYS: usize = 31;

/// Merge a month's daily contributions into a monthly summary.
pub fn build_monthly_summary(
    spec: &ModuleSpec,
    month: MonthKey,
    days_found: usize,
    contributions: &[DailyContribution],
) -> MonthlySummary {
    let mut ordered: Vec<&DailyContribution> = contributions.iter().collect();
    ordered.sort_by_key(|c| c.date);

    let tables = spec
        .tables
        .iter()
        .map(|table| SummaryTable {
            id: table.id.to_string(),
            table: merge_table(table, &ordered),
        })
        .collect();

    let mut trend = vec![0u64; TREND_DAYS];
    for contribution in &ordered {
        let slot = contribution.date.day() as usize - 1;
        if slot < TREND_DAYS {
            trend[slot] = contribution.notable;
        }
    }

    let summary = MonthlySummary {
        module: spec.kind,
        month,
        days_found,
        days_read: ordered.len(),
        total_notable: ordered.iter().map(|c| c.notable).sum(),
        tables,
        trend,
    };
    tracing::info!(
        module = %spec.display_name,
        month = %month.stamp(),
        days_found = summary.days_found,
        days_read = summary.days_read,
        total_notable = summary.total_notable,
        "Merged monthly roll-up"
    );
    summary
}

/// Merge one table id across all contributing days.
///
/// The merge key is the label joined with the extras the descriptor
/// marks as key columns; non-key extras keep the first-seen day's
/// values. Accumulation walks days in date order, so the stable
/// descending sort leaves tied rows in first-seen order.
fn merge_table(table: &TableSpec, ordered: &[&DailyContribution]) -> RankedTable {
    let mut index: HashMap<(String, Vec<String>), usize> = HashMap::new();
    let mut rows: Vec<RankedRow> = Vec::new();

    for contribution in ordered {
        let Some(daily) = contribution.tables.iter().find(|t| t.id == table.id) else {
            continue;
        };
        for row in &daily.table.rows {
            let key_extras: Vec<String> = table
                .merge_keys
                .iter()
                .filter_map(|&k| row.extra.get(k).cloned())
                .collect();
            let key = (row.label.clone(), key_extras);
            match index.get(&key) {
                Some(&slot) => rows[slot].count += row.count,
                None => {
                    index.insert(key, rows.len());
                    rows.push(row.clone());
                }
            }
        }
    }

    rows.sort_by_key(|row| std::cmp::Reverse(row.count));
    rows.truncate(table.monthly_top_n);
    RankedTable { rows }
}

// =============================================================================
// Tests
// =============================================================================
