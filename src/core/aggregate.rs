// FortiRep - core/aggregate.rs
//
// Daily aggregation: gate a normalized batch, apply the notability
// predicate, and fold the notable records into the module's ranked
// tables and detail slice. Pure computation; rendering and I/O live in
// the report and app layers.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::model::{DailySummary, DetailRow, LogRecord, RankedRow, RankedTable, SummaryTable};
use crate::core::module::{ClassifyOptions, ModuleSpec, TableSpec};
use crate::core::normalize::NormalizeOutcome;

/// Build one module's daily summary from a normalized batch.
///
/// An empty notable set is not an error; the summary carries zero counts
/// and empty tables and still renders downstream.
pub fn build_daily_summary(
    spec: &ModuleSpec,
    date: NaiveDate,
    outcome: &NormalizeOutcome,
    opts: &ClassifyOptions,
) -> DailySummary {
    let gated: Vec<&LogRecord> = outcome
        .records
        .iter()
        .filter(|r| spec.admits(&r.fields, opts))
        .collect();
    let notable: Vec<&LogRecord> = gated
        .iter()
        .copied()
        .filter(|r| spec.is_notable(&r.fields))
        .collect();

    let tables = spec
        .tables
        .iter()
        .map(|table| SummaryTable {
            id: table.id.to_string(),
            table: ranked_table(table, &notable, table.top_n),
        })
        .collect();

    // Most recent K notable records, newest first.
    let detail = notable
        .iter()
        .rev()
        .take(spec.detail_limit)
        .map(|record| DetailRow {
            timestamp: record.timestamp,
            values: spec
                .detail_columns
                .iter()
                .map(|column| column.source.resolve_or_default(&record.fields))
                .collect(),
        })
        .collect();

    let summary = DailySummary {
        module: spec.kind,
        date,
        total_records: outcome.records.len() as u64,
        gated_records: gated.len() as u64,
        notable_records: notable.len() as u64,
        dropped_records: outcome.dropped,
        tables,
        detail,
    };
    tracing::info!(
        module = %spec.display_name,
        date = %date,
        total = summary.total_records,
        notable = summary.notable_records,
        dropped = summary.dropped_records,
        "Aggregated daily records"
    );
    summary
}

/// Fold notable records into one ranked table.
///
/// Counting walks the batch in ascending time order, so ties in the
/// final descending sort stay in first-seen order (the sort is stable).
/// Records whose axis falls through to its chain default are excluded;
/// representative extra columns capture the first-seen record's values.
pub fn ranked_table(table: &TableSpec, notable: &[&LogRecord], top_n: usize) -> RankedTable {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<RankedRow> = Vec::new();

    for record in notable {
        let Some(label) = table.axis.resolve(&record.fields) else {
            continue;
        };
        match index.get(&label) {
            Some(&slot) => rows[slot].count += 1,
            None => {
                let extra = table
                    .extra
                    .iter()
                    .map(|source| source.resolve_or_default(&record.fields))
                    .collect();
                index.insert(label.clone(), rows.len());
                rows.push(RankedRow {
                    label,
                    count: 1,
                    extra,
                });
            }
        }
    }

    rows.sort_by_key(|row| std::cmp::Reverse(row.count));
    rows.truncate(top_n);
    RankedTable { rows }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ModuleKind;
    use crate::core::normalize::normalize_content;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summarize(kind: ModuleKind, date: NaiveDate, content: &str) -> DailySummary {
        let outcome = normalize_content(content);
        build_daily_summary(kind.spec(), date, &outcome, &ClassifyOptions::default())
    }

    #[test]
    fn webfilter_daily_counts_and_tables() {
        let content = "\
date=2025-06-01 time=08:00:00 subtype=webfilter action=blocked url=\"bad.example\" catdesc=\"Malware\" srcip=10.0.0.5\n\
date=2025-06-01 time=09:00:00 subtype=webfilter action=allowed url=\"ok.example\"\n";
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), content);

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.gated_records, 2);
        assert_eq!(summary.notable_records, 1);
        assert_eq!(summary.dropped_records, 0);

        let urls = summary.table("urls").unwrap();
        assert_eq!(urls.rows.len(), 1);
        assert_eq!(urls.rows[0].label, "bad.example");
        assert_eq!(urls.rows[0].count, 1);

        let categories = summary.table("categories").unwrap();
        assert_eq!(categories.rows[0].label, "Malware");

        let sources = summary.table("sources").unwrap();
        assert_eq!(sources.rows[0].label, "10.0.0.5");
    }

    #[test]
    fn records_outside_the_gate_count_toward_total_only() {
        let content = "\
date=2025-06-01 time=08:00:00 subtype=webfilter action=blocked url=a.example\n\
date=2025-06-01 time=08:01:00 subtype=dns qname=other.example cat=63\n";
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), content);
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.gated_records, 1);
        assert_eq!(summary.notable_records, 1);
    }

    #[test]
    fn ranking_sorts_descending_with_first_seen_ties() {
        // beta and gamma tie at 2; beta appeared first in time order.
        let content = "\
date=2025-06-01 time=08:00:00 subtype=webfilter action=blocked url=beta.example\n\
date=2025-06-01 time=08:01:00 subtype=webfilter action=blocked url=gamma.example\n\
date=2025-06-01 time=08:02:00 subtype=webfilter action=blocked url=alpha.example\n\
date=2025-06-01 time=08:03:00 subtype=webfilter action=blocked url=gamma.example\n\
date=2025-06-01 time=08:04:00 subtype=webfilter action=blocked url=beta.example\n\
date=2025-06-01 time=08:05:00 subtype=webfilter action=blocked url=alpha.example\n\
date=2025-06-01 time=08:06:00 subtype=webfilter action=blocked url=alpha.example\n";
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), content);
        let urls = summary.table("urls").unwrap();
        let order: Vec<_> = urls.rows.iter().map(|r| (r.label.as_str(), r.count)).collect();
        assert_eq!(
            order,
            [("alpha.example", 3), ("beta.example", 2), ("gamma.example", 2)]
        );
    }

    #[test]
    fn labels_resolved_from_defaults_are_excluded() {
        // No url and no hostname: the URL axis falls through to its
        // default and the record must not appear in the URL table, while
        // the source-IP table still counts it.
        let content =
            "date=2025-06-01 time=08:00:00 subtype=webfilter action=blocked srcip=10.0.0.9\n";
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), content);
        assert_eq!(summary.notable_records, 1);
        assert!(summary.table("urls").unwrap().is_empty());
        assert_eq!(summary.table("sources").unwrap().rows[0].label, "10.0.0.9");
    }

    #[test]
    fn ranked_tables_truncate_to_top_n() {
        let mut content = String::new();
        for i in 0..20 {
            content.push_str(&format!(
                "date=2025-06-01 time=08:{i:02}:00 subtype=webfilter action=blocked url=site{i}.example srcip=10.0.0.{i}\n"
            ));
        }
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), &content);
        assert_eq!(summary.table("urls").unwrap().rows.len(), 15);
        assert_eq!(summary.table("sources").unwrap().rows.len(), 10);
    }

    #[test]
    fn detail_slice_is_newest_first_and_capped() {
        let mut content = String::new();
        for i in 0..60 {
            content.push_str(&format!(
                "date=2025-06-01 time={:02}:{:02}:00 subtype=dns cat=63 qname=d{i}.example srcip=10.1.0.1\n",
                8 + i / 60,
                i % 60
            ));
        }
        let summary = summarize(ModuleKind::Dns, day(2025, 6, 1), &content);
        assert_eq!(summary.notable_records, 60);
        // DNS detail caps at 50, newest first.
        assert_eq!(summary.detail.len(), 50);
        let first = &summary.detail[0];
        let second = &summary.detail[1];
        assert!(first.timestamp > second.timestamp);
        // Domain column is the lowercased qname of the latest record.
        assert_eq!(first.values[2], "d59.example");
    }

    #[test]
    fn ips_extras_keep_first_seen_representatives() {
        let content = "\
date=2025-06-01 time=08:00:00 subtype=ips eventtype=signature severity=critical attack=\"SQL Injection\" srcip=1.2.3.4 srccountry=\"France\" dstip=10.0.0.2 service=HTTPS action=detected\n\
date=2025-06-01 time=09:00:00 subtype=ips eventtype=signature severity=critical attack=\"SQL Injection\" srcip=5.6.7.8 srccountry=\"Brazil\" dstip=10.0.0.3 service=HTTP action=dropped\n";
        let summary = summarize(ModuleKind::Ips, day(2025, 6, 1), content);
        let attacks = summary.table("attacks").unwrap();
        assert_eq!(attacks.rows.len(), 1);
        let row = &attacks.rows[0];
        assert_eq!(row.label, "SQL Injection");
        assert_eq!(row.count, 2);
        assert_eq!(
            row.extra,
            ["detected", "1.2.3.4", "France", "10.0.0.2", "HTTPS"]
        );
    }

    #[test]
    fn empty_notable_set_yields_zeroed_summary() {
        let content = "date=2025-06-01 time=08:00:00 subtype=webfilter action=passthrough url=x\n";
        let summary = summarize(ModuleKind::WebFilter, day(2025, 6, 1), content);
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.notable_records, 0);
        assert!(summary.tables.iter().all(|t| t.table.is_empty()));
        assert!(summary.detail.is_empty());
    }

    #[test]
    fn dns_domain_counting_folds_case() {
        let content = "\
date=2025-06-01 time=08:00:00 subtype=dns cat=62 qname=Evil.Example action=block\n\
date=2025-06-01 time=09:00:00 subtype=dns cat=62 qname=evil.example action=block\n";
        let summary = summarize(ModuleKind::Dns, day(2025, 6, 1), content);
        let domains = summary.table("domains").unwrap();
        assert_eq!(domains.rows.len(), 1);
        assert_eq!(domains.rows[0].label, "evil.example");
        assert_eq!(domains.rows[0].count, 2);
    }
}
