// FortiRep - report/extract.rs
//
// Versioned extraction adapter: recovers ranked tables and the notable
// count from a daily HTML page when its sidecar is missing. Reads only
// pages stamped with the layout version this adapter was written
// against; anything else is a classified HtmlShape error, never a
// silently empty result.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use crate::core::model::{RankedRow, RankedTable, SummaryTable};
use crate::core::module::{ModuleSpec, TableSpec};
use crate::util::constants;
use crate::util::error::ExtractError;

/// What the adapter can recover from one daily page. Detail rows are
/// not recovered; the monthly roll-up has no use for them.
#[derive(Debug)]
pub struct ExtractedDaily {
    pub notable: u64,
    pub tables: Vec<SummaryTable>,
}

/// Extract one module's daily payload from rendered HTML.
pub fn extract_daily(
    path: &Path,
    html: &str,
    spec: &ModuleSpec,
) -> Result<ExtractedDaily, ExtractError> {
    let document = Html::parse_document(html);

    check_version(path, &document)?;
    let notable = extract_notable(path, &document)?;

    let mut tables = Vec::with_capacity(spec.tables.len());
    for table_spec in spec.tables {
        let selector = table_selector(table_spec.id);
        let table = match document.select(&selector).next() {
            Some(element) => parse_ranked_table(path, table_spec, element)?,
            // The renderer emits a no-data paragraph instead of an empty
            // table, so absence means the day legitimately had no rows.
            None => RankedTable::default(),
        };
        tables.push(SummaryTable {
            id: table_spec.id.to_string(),
            table,
        });
    }

    tracing::debug!(
        path = %path.display(),
        notable,
        "Extracted daily payload from HTML"
    );
    Ok(ExtractedDaily { notable, tables })
}

fn check_version(path: &Path, document: &Html) -> Result<(), ExtractError> {
    let selector =
        Selector::parse("[data-report-version]").expect("hard-coded selector must parse");
    let found = document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("data-report-version"))
        .and_then(|v| v.parse::<u32>().ok());
    match found {
        Some(version) if version == constants::HTML_CONTRACT_VERSION => Ok(()),
        Some(version) => Err(ExtractError::HtmlShape {
            path: path.to_path_buf(),
            expected: format!(
                "report layout version {}, found {version}",
                constants::HTML_CONTRACT_VERSION
            ),
        }),
        None => Err(ExtractError::HtmlShape {
            path: path.to_path_buf(),
            expected: "a data-report-version marker (page predates it or is foreign)".to_string(),
        }),
    }
}

fn extract_notable(path: &Path, document: &Html) -> Result<u64, ExtractError> {
    let selector =
        Selector::parse("[data-stat=\"notable\"]").expect("hard-coded selector must parse");
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .and_then(|text| text.trim().parse::<u64>().ok())
        .ok_or_else(|| ExtractError::HtmlShape {
            path: path.to_path_buf(),
            expected: "a numeric data-stat=\"notable\" span".to_string(),
        })
}

fn table_selector(id: &str) -> Selector {
    Selector::parse(&format!(
        "table.{}[data-table=\"{id}\"]",
        constants::HTML_TABLE_CLASS
    ))
    .expect("descriptor table ids must form valid selectors")
}

fn parse_ranked_table(
    path: &Path,
    table_spec: &TableSpec,
    element: ElementRef<'_>,
) -> Result<RankedTable, ExtractError> {
    let row_selector = Selector::parse("tr").expect("hard-coded selector must parse");
    let cell_selector = Selector::parse("td").expect("hard-coded selector must parse");
    let expected_columns = 2 + table_spec.extra.len();

    let mut rows = Vec::new();
    for tr in element.select(&row_selector) {
        let cells: Vec<String> = tr.select(&cell_selector).map(cell_text).collect();
        if cells.is_empty() {
            // Header row: th cells only.
            continue;
        }
        if cells.len() != expected_columns {
            return Err(ExtractError::HtmlShape {
                path: path.to_path_buf(),
                expected: format!(
                    "{expected_columns} columns in table '{}', found {}",
                    table_spec.id,
                    cells.len()
                ),
            });
        }
        let count = cells[1].parse::<u64>().map_err(|_| ExtractError::HtmlShape {
            path: path.to_path_buf(),
            expected: format!("a numeric count column in table '{}'", table_spec.id),
        })?;
        rows.push(RankedRow {
            label: cells[0].clone(),
            count,
            extra: cells[2..].to_vec(),
        });
    }
    Ok(RankedTable { rows })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

// =============================================================================
// Tests
// =============================================================================
