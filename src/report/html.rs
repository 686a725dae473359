// FortiRep - report/html.rs
//
// Self-contained HTML rendering for daily and monthly reports. Pages
// carry machine-readable markers (a layout version on the container,
// data-table ids on ranked tables, data-stat spans in the stats block)
// that the extraction adapter in report/extract.rs keys on; the two
// files change together under HTML_CONTRACT_VERSION.

use crate::core::model::{DailySummary, MonthlySummary, RankedTable};
use crate::core::module::{ModuleSpec, TableSpec};
use crate::util::constants;

/// Chart.js pie palette, one slot per chart slice.
const PIE_COLORS: &str =
    "['#e74c3c','#e67e22','#f1c40f','#27ae60','#3498db','#9b59b6','#1abc9c','#34495e']";

/// Render one module's daily report page.
pub fn render_daily(summary: &DailySummary, source_name: &str) -> String {
    let spec = summary.module.spec();
    let title = format!(
        "{} Daily Report - {}",
        spec.display_name,
        summary.date.format("%Y-%m-%d")
    );

    let mut page = page_head(&title, spec.accent);
    page.push_str(&format!(
        "<div class=\"container\" data-report-version=\"{}\">\n",
        constants::HTML_CONTRACT_VERSION
    ));
    page.push_str(&format!("<h1>{} Events</h1>\n", escape(spec.display_name)));
    page.push_str(&format!(
        "<p class=\"report-date\">{}</p>\n",
        summary.date.format("%A, %d %B %Y")
    ));

    page.push_str("<div class=\"stats\">\n");
    page.push_str(&format!("<b>Log File:</b> {}<br>\n", escape(source_name)));
    page.push_str(&format!(
        "<b>Total Records:</b> <span data-stat=\"total\">{}</span><br>\n",
        summary.total_records
    ));
    page.push_str(&format!(
        "<b>{} Records:</b> {}<br>\n",
        escape(spec.display_name),
        summary.gated_records
    ));
    page.push_str(&format!(
        "<b>Notable Events:</b> <span data-stat=\"notable\">{}</span><br>\n",
        summary.notable_records
    ));
    page.push_str(&format!(
        "<b>Dropped (bad timestamp):</b> {}\n",
        summary.dropped_records
    ));
    page.push_str("</div>\n");

    let mut scripts = String::new();
    for entry in &summary.tables {
        let Some(table_spec) = spec.table_spec(&entry.id) else {
            continue;
        };
        page.push_str(&ranked_section(table_spec, &entry.table, table_spec.title));
        if table_spec.chart && !entry.table.is_empty() {
            scripts.push_str(&pie_script(table_spec.id, &entry.table));
        }
    }

    page.push_str(&detail_section(spec, summary));
    page.push_str(&script_block(&scripts));
    page.push_str(&footer());
    page.push_str("</div>\n</body>\n</html>\n");
    page
}

/// Render one module's monthly recap page.
pub fn render_monthly(summary: &MonthlySummary) -> String {
    let spec = summary.module.spec();
    let month_name = summary.month.first_day().format("%B %Y").to_string();
    let title = format!("{} Monthly Report - {month_name}", spec.display_name);

    let mut page = page_head(&title, spec.accent);
    page.push_str(&format!(
        "<div class=\"container\" data-report-version=\"{}\">\n",
        constants::HTML_CONTRACT_VERSION
    ));
    page.push_str(&format!(
        "<h1>{} Monthly Recap</h1>\n",
        escape(spec.display_name)
    ));
    page.push_str(&format!("<p class=\"report-date\">{month_name}</p>\n"));

    page.push_str("<div class=\"stats\">\n");
    page.push_str(&format!(
        "<b>Daily Reports Found:</b> {}<br>\n",
        summary.days_found
    ));
    page.push_str(&format!(
        "<b>Daily Reports Read:</b> {}<br>\n",
        summary.days_read
    ));
    page.push_str(&format!(
        "<b>Total Notable Events:</b> <span data-stat=\"notable\">{}</span>\n",
        summary.total_notable
    ));
    page.push_str("</div>\n");

    let mut scripts = String::new();
    if spec.monthly_trend {
        page.push_str(
            "<h2>Daily Trend</h2>\n<div class=\"trend\"><canvas id=\"trend\"></canvas></div>\n",
        );
        // Trend slots run through day 31; plot only the month's real days.
        let days = (summary.month.days_in_month() as usize).min(summary.trend.len());
        scripts.push_str(&trend_script(&summary.trend[..days], spec.accent));
    }
    for entry in &summary.tables {
        let Some(table_spec) = spec.table_spec(&entry.id) else {
            continue;
        };
        page.push_str(&ranked_section(
            table_spec,
            &entry.table,
            table_spec.monthly_title,
        ));
        if table_spec.chart && !entry.table.is_empty() {
            scripts.push_str(&pie_script(table_spec.id, &entry.table));
        }
    }

    page.push_str(&script_block(&scripts));
    page.push_str(&footer());
    page.push_str("</div>\n</body>\n</html>\n");
    page
}

/// Minimal HTML entity escaping for text content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_head(title: &str, accent: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
<script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>\n\
<style>\n\
body {{ font-family: Arial; margin: 40px; background: #f8f9fa; }}\n\
.container {{ max-width: 1500px; margin: auto; background: white; padding: 30px; border-radius: 10px; box-shadow: 0 0 20px rgba(0,0,0,0.1); }}\n\
h1 {{ color: {accent}; text-align: center; }}\n\
.report-date {{ text-align: center; font-size: 1.4em; color: {accent}; }}\n\
.stats {{ background: #f0f2f5; padding: 20px; border-radius: 8px; }}\n\
table {{ width: 100%; border-collapse: collapse; margin: 25px 0; }}\n\
th, td {{ border: 1px solid #ddd; padding: 12px; text-align: left; }}\n\
th {{ background: {accent}; color: white; }}\n\
tr:nth-child(even) {{ background: #f9f9f9; }}\n\
.pie {{ width: 400px; height: 400px; margin: 30px auto; }}\n\
.trend {{ max-width: 1100px; margin: 30px auto; }}\n\
.footer {{ text-align: center; color: #7f8c8d; margin-top: 30px; font-size: 0.9em; }}\n\
</style>\n</head>\n<body>\n",
        title = escape(title),
        accent = accent,
    )
}

/// One ranked table as a section: heading, table (or the no-data
/// paragraph), and the chart canvas when the descriptor asks for one.
fn ranked_section(table_spec: &TableSpec, table: &RankedTable, title: &str) -> String {
    let mut section = format!("<h2>{}</h2>\n", escape(title));
    if table.is_empty() {
        section.push_str("<p>No data available.</p>\n");
        return section;
    }

    section.push_str(&format!(
        "<table class=\"{}\" data-table=\"{}\">\n<tr><th>{}</th><th>{}</th>",
        constants::HTML_TABLE_CLASS,
        table_spec.id,
        escape(table_spec.label_header),
        escape(table_spec.count_header)
    ));
    for header in table_spec.extra_headers {
        section.push_str(&format!("<th>{}</th>", escape(header)));
    }
    section.push_str("</tr>\n");

    for row in &table.rows {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td>",
            escape(&row.label),
            row.count
        ));
        for value in &row.extra {
            section.push_str(&format!("<td>{}</td>", escape(value)));
        }
        section.push_str("</tr>\n");
    }
    section.push_str("</table>\n");

    if table_spec.chart {
        section.push_str(&format!(
            "<div class=\"pie\"><canvas id=\"chart-{}\"></canvas></div>\n",
            table_spec.id
        ));
    }
    section
}

fn detail_section(spec: &ModuleSpec, summary: &DailySummary) -> String {
    let mut section = String::from("<h2>Recent Notable Events (Latest First)</h2>\n");
    if summary.detail.is_empty() {
        section.push_str("<p>No data available.</p>\n");
        return section;
    }

    section.push_str(&format!(
        "<table class=\"{}\" data-table=\"detail\">\n<tr><th>Time</th>",
        constants::HTML_TABLE_CLASS
    ));
    for column in spec.detail_columns {
        section.push_str(&format!("<th>{}</th>", escape(column.header)));
    }
    section.push_str("</tr>\n");

    for row in &summary.detail {
        section.push_str(&format!(
            "<tr><td>{}</td>",
            row.timestamp.format(constants::LOG_TIMESTAMP_FORMAT)
        ));
        for value in &row.values {
            section.push_str(&format!("<td>{}</td>", escape(value)));
        }
        section.push_str("</tr>\n");
    }
    section.push_str("</table>\n");
    section
}

fn pie_script(canvas_id: &str, table: &RankedTable) -> String {
    let slice = table.chart_slice(constants::CHART_TOP_N);
    let labels: Vec<&str> = slice.iter().map(|(label, _)| *label).collect();
    let values: Vec<u64> = slice.iter().map(|(_, count)| *count).collect();
    format!(
        "new Chart(document.getElementById('chart-{canvas_id}'), {{\n\
  type: 'pie',\n\
  data: {{ labels: {labels}, datasets: [{{ data: {values},\n\
    backgroundColor: {PIE_COLORS} }}] }},\n\
  options: {{ responsive: true, plugins: {{ legend: {{ position: 'right' }} }} }}\n\
}});\n",
        labels = json_array(&labels),
        values = json_array(&values),
    )
}

fn trend_script(trend: &[u64], accent: &str) -> String {
    let days: Vec<usize> = (1..=trend.len()).collect();
    format!(
        "new Chart(document.getElementById('trend'), {{\n\
  type: 'line',\n\
  data: {{ labels: {labels}, datasets: [{{ label: 'Notable events', data: {values},\n\
    borderColor: '{accent}', backgroundColor: '{accent}33', fill: true, tension: 0.25 }}] }},\n\
  options: {{ responsive: true, scales: {{ y: {{ beginAtZero: true }} }} }}\n\
}});\n",
        labels = json_array(&days),
        values = json_array(trend),
    )
}

/// Serialize a value into a script-safe JSON literal. `</` is split so
/// a hostile label cannot close the surrounding script element.
fn json_array<T: serde::Serialize>(values: &[T]) -> String {
    serde_json::to_string(values)
        .unwrap_or_else(|_| String::from("[]"))
        .replace("</", "<\\/")
}

fn script_block(scripts: &str) -> String {
    if scripts.is_empty() {
        String::new()
    } else {
        format!("<script>\n{scripts}</script>\n")
    }
}

fn footer() -> String {
    format!(
        "<div class=\"footer\">{} v{}</div>\n",
        constants::APP_NAME,
        constants::APP_VERSION
    )
}

// =============================================================================
// Tests
// =============================================================================
