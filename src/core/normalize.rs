// FortiRep - core/normalize.rs
//
// Raw log content -> normalized records. Splits content into lines,
// parses each into a FieldMap, attaches a real timestamp from the
// date/time fields, and returns the batch sorted ascending by time.
// Records whose date/time pair does not parse are dropped and counted,
// never fatal.

use chrono::NaiveDateTime;

use crate::core::fields::FieldMap;
use crate::core::model::LogRecord;
use crate::util::constants;

/// Result of normalizing one file's content.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    /// Normalized records in ascending timestamp order. Ties keep their
    /// original file order, which downstream first-seen semantics rely on.
    pub records: Vec<LogRecord>,
    /// Lines that yielded no key=value pairs (blank, comment, junk).
    pub skipped_lines: u64,
    /// Parsed records dropped for an unparseable or missing date/time.
    pub dropped: u64,
}

/// Normalize a whole file's content.
pub fn normalize_content(content: &str) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    for line in content.lines() {
        let Some(fields) = FieldMap::parse(line) else {
            if !line.trim().is_empty() {
                tracing::trace!(line = %preview(line), "Skipped line with no parsable fields");
            }
            outcome.skipped_lines += 1;
            continue;
        };
        match record_timestamp(&fields) {
            Some(timestamp) => outcome.records.push(LogRecord { timestamp, fields }),
            None => {
                tracing::debug!(line = %preview(line), "Dropped record with bad timestamp");
                outcome.dropped += 1;
            }
        }
    }

    // Stable: equal timestamps keep file order.
    outcome.records.sort_by_key(|r| r.timestamp);
    outcome
}

/// Parse `date` + `time` under the canonical log timestamp format.
fn record_timestamp(fields: &FieldMap) -> Option<NaiveDateTime> {
    let date = fields.get("date")?;
    let time = fields.get("time")?;
    NaiveDateTime::parse_from_str(
        &format!("{date} {time}"),
        constants::LOG_TIMESTAMP_FORMAT,
    )
    .ok()
}

/// Truncated copy of a line for debug logging.
fn preview(line: &str) -> String {
    if line.len() <= constants::DEBUG_MAX_LINE_PREVIEW {
        line.to_string()
    } else {
        line.chars()
            .take(constants::DEBUG_MAX_LINE_PREVIEW)
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_sorts_ascending() {
        let content = "\
date=2025-06-01 time=09:30:00 subtype=dns qname=b.example\n\
date=2025-06-01 time=08:00:00 subtype=dns qname=a.example\n";
        let outcome = normalize_content(content);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.records[0].fields.get("qname"), Some("a.example"));
        assert_eq!(outcome.records[1].fields.get("qname"), Some("b.example"));
    }

    #[test]
    fn equal_timestamps_keep_file_order() {
        let content = "\
date=2025-06-01 time=08:00:00 seq=first\n\
date=2025-06-01 time=08:00:00 seq=second\n\
date=2025-06-01 time=08:00:00 seq=third\n";
        let outcome = normalize_content(content);
        let order: Vec<_> = outcome
            .records
            .iter()
            .map(|r| r.fields.get("seq").unwrap())
            .collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn bad_timestamp_drops_exactly_that_record() {
        let content = "\
date=2025-06-01 time=08:00:00 subtype=ips attack=A\n\
date=2025-06-01 time=25:99:00 subtype=ips attack=B\n\
date=junk time=08:00:00 subtype=ips attack=C\n";
        let outcome = normalize_content(content);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.records[0].fields.get("attack"), Some("A"));
    }

    #[test]
    fn missing_date_or_time_field_drops_the_record() {
        let content = "\
time=08:00:00 subtype=virus virus=X\n\
date=2025-06-01 subtype=virus virus=Y\n";
        let outcome = normalize_content(content);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped, 2);
    }

    #[test]
    fn comments_and_blanks_are_skipped_not_dropped() {
        let content = "\n# header comment\n   \ndate=2025-06-01 time=08:00:00 a=1\n";
        let outcome = normalize_content(content);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped_lines, 3);
        assert_eq!(outcome.dropped, 0);
    }

    #[test]
    fn quoted_values_survive_normalization() {
        let content = "date=2025-06-01 time=12:00:00 msg=\"two words here\" url=\"http://x/y z\"\n";
        let outcome = normalize_content(content);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.records[0].fields.get("msg"),
            Some("two words here")
        );
    }
}
