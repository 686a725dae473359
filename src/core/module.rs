// FortiRep - core/module.rs
//
// Per-module descriptor table.
//
// One generic pipeline serves all five security modules; everything that
// differs between them (subtype gate, notability predicate, ranking
// axes, detail columns, filename prefixes, raw-log aliases, the DNS
// category taxonomy) is data in the static MODULES table below. Adding
// a module means adding a descriptor, not another pipeline.

use chrono::NaiveDate;

use crate::core::fields::{FieldMap, FieldSpec};
use crate::core::model::ModuleKind;
use crate::core::period::{self, MonthKey};
use crate::util::constants;

// =============================================================================
// Classification constants
// =============================================================================

/// Actions counted as blocking for the IPS and DNS notability predicates.
pub const BLOCKING_ACTIONS: [&str; 3] = ["blocked", "block", "deny"];

/// Severities that make an IPS signature event notable on their own.
pub const IPS_NOTABLE_SEVERITIES: [&str; 2] = ["high", "critical"];

/// Both action spellings are kept for Antivirus; the log source has
/// emitted each at different firmware levels.
pub const AV_NOTABLE_ACTIONS: [&str; 2] = ["blocked", "block"];

/// Client-risk levels that make a blocked Antivirus event notable.
pub const AV_NOTABLE_CRLEVELS: [&str; 2] = ["critical", "high"];

/// FortiGate event id for DNS security filter verdicts. Only consulted
/// when the strict DNS gate refinement is enabled.
pub const DNS_SECURITY_LOGID: &str = "1501054802";

/// Catch-all DNS category for unmapped or missing `cat` codes.
pub const DNS_OTHER_CATEGORY: &str = "Other";

/// DNS security category codes carried in the numeric `cat` field.
pub const DNS_CATEGORY_CODES: &[(u32, &str)] = &[
    (62, "Phishing"),
    (63, "Malicious Websites"),
    (64, "Newly Observed Domain"),
    (65, "Newly Registered Domain"),
    (66, "Dynamic DNS"),
    (67, "Spam URLs"),
    (68, "Gambling"),
    (69, "Pornography"),
];

/// Look up the human label for a DNS category code.
pub fn dns_category_name(code: u32) -> Option<&'static str> {
    DNS_CATEGORY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Derive the DNS threat category for a record. Unmapped, missing, and
/// non-numeric codes all land in the catch-all category.
pub fn dns_category(fields: &FieldMap) -> &'static str {
    DNS_CAT
        .resolve_or_default(fields)
        .parse::<u32>()
        .ok()
        .and_then(dns_category_name)
        .unwrap_or(DNS_OTHER_CATEGORY)
}

/// Tunable classification behavior, resolved from config at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    /// Additionally require `logid=1501054802` on the DNS gate. Off by
    /// default; the broad `subtype=dns` gate is canonical.
    pub dns_strict_logid: bool,
}

// =============================================================================
// Field-resolution chains
// =============================================================================
// Candidate key lists and default literals are load-bearing: which
// fallback resolves decides whether a record appears in a ranked table,
// so report totals depend on these chains staying exactly as documented.

// Application Control
const APP_APP: FieldSpec = FieldSpec::new("app", &["app"], "Unknown");
const APP_HOST: FieldSpec = FieldSpec::new("host", &["hostname", "dstip"], "No Hostname");
const APP_URL: FieldSpec = FieldSpec::new("url", &["url"], "-");
const APP_SRCIP: FieldSpec = FieldSpec::new("srcip", &["srcip"], "Unknown");
const APP_RISK: FieldSpec = FieldSpec::new("risk", &["apprisk"], "unknown");
const APP_CATEGORY: FieldSpec = FieldSpec::new("category", &["appcat"], "Uncategorized");
const APP_SERVICE: FieldSpec = FieldSpec::new("service", &["service"], "-");
const APP_MSG: FieldSpec = FieldSpec::new("msg", &["msg"], "-");

// Web Filter
const WEB_URL: FieldSpec = FieldSpec::new("url", &["url", "hostname"], "Unknown");
const WEB_CATEGORY: FieldSpec = FieldSpec::new("category", &["catdesc"], "Uncategorized");
const WEB_SRCIP: FieldSpec = FieldSpec::new("srcip", &["srcip"], "Unknown");
const WEB_HOSTNAME: FieldSpec = FieldSpec::new("hostname", &["hostname"], "-");
const WEB_MSG: FieldSpec = FieldSpec::new("msg", &["msg"], "-");

// IPS
const IPS_ATTACK: FieldSpec = FieldSpec::new("attack", &["attack"], "Unknown Attack");
const IPS_ACTION: FieldSpec = FieldSpec::new("action", &["action"], "unknown");
const IPS_SRCIP: FieldSpec = FieldSpec::new("srcip", &["srcip"], "Unknown");
const IPS_DSTIP: FieldSpec = FieldSpec::new("dstip", &["dstip", "dst"], "Unknown");
const IPS_COUNTRY: FieldSpec = FieldSpec::new("country", &["srccountry"], "Unknown");
const IPS_SERVICE: FieldSpec = FieldSpec::new("service", &["service"], "-");
const IPS_MSG: FieldSpec = FieldSpec::new("msg", &["msg"], "-");

// DNS
const DNS_QNAME: FieldSpec = FieldSpec::new("qname", &["qname"], "-");
const DNS_ACTION: FieldSpec = FieldSpec::new("action", &["action"], "pass");
const DNS_CAT: FieldSpec = FieldSpec::new("cat", &["cat"], "0");
const DNS_SRCIP: FieldSpec = FieldSpec::new("srcip", &["srcip"], "Unknown");
const DNS_DESTIP: FieldSpec = FieldSpec::new("destip", &["dstip", "dst", "destip"], "N/A");
const DNS_QTYPE: FieldSpec = FieldSpec::new("qtype", &["qtype"], "-");
const DNS_RESPONSE: FieldSpec = FieldSpec::new("response", &["ipaddr", "response"], "-");

// Antivirus
const AV_VIRUS: FieldSpec = FieldSpec::new("virus", &["virus"], "Unknown");
const AV_URL: FieldSpec = FieldSpec::new("url", &["url"], "N/A");
const AV_FILE: FieldSpec = FieldSpec::new("filename", &["filename"], "N/A");
const AV_SRCIP: FieldSpec = FieldSpec::new("srcip", &["srcip"], "N/A");
const AV_DESTIP: FieldSpec = FieldSpec::new("destip", &["dstip", "dst", "destip"], "N/A");
const AV_ACTION: FieldSpec = FieldSpec::new("action", &["action"], "N/A");
const AV_CRLEVEL: FieldSpec = FieldSpec::new("crlevel", &["crlevel"], "low");
const AV_LEVEL: FieldSpec = FieldSpec::new("level", &["level"], "info");
const AV_AGENT: FieldSpec = FieldSpec::new("agent", &["agent"], "N/A");

// =============================================================================
// Value sources
// =============================================================================

/// Where a table label or detail cell comes from.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    /// Resolve through a fallback chain.
    Field(FieldSpec),
    /// Resolve through a fallback chain, then lowercase. FortiGate mixes
    /// case in `qname` and `crlevel`; counting must not split on case.
    FieldLower(FieldSpec),
    /// The derived DNS threat category.
    DnsCategory,
}

impl ValueSource {
    /// Resolve against a FieldMap. `None` means every candidate key was
    /// absent and the value would be the chain's default literal; ranked
    /// tables exclude such rows.
    pub fn resolve(&self, fields: &FieldMap) -> Option<String> {
        match self {
            ValueSource::Field(spec) => spec.resolve(fields).map(str::to_string),
            ValueSource::FieldLower(spec) => {
                spec.resolve(fields).map(|v| v.to_ascii_lowercase())
            }
            ValueSource::DnsCategory => Some(dns_category(fields).to_string()),
        }
    }

    /// Resolve, falling through to the default literal. Used for detail
    /// rows and representative columns, which always display something.
    pub fn resolve_or_default(&self, fields: &FieldMap) -> String {
        match self {
            ValueSource::Field(spec) => spec.resolve_or_default(fields).to_string(),
            ValueSource::FieldLower(spec) => {
                spec.resolve_or_default(fields).to_ascii_lowercase()
            }
            ValueSource::DnsCategory => dns_category(fields).to_string(),
        }
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// One ranked table's shape: axis, headers, extras, truncation, and how
/// the monthly roll-up merges its rows.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Stable identifier persisted in sidecars and merged on monthly.
    pub id: &'static str,
    pub title: &'static str,
    pub monthly_title: &'static str,
    pub label_header: &'static str,
    pub count_header: &'static str,
    pub axis: ValueSource,
    /// Representative supporting columns (first-seen values per label).
    pub extra: &'static [ValueSource],
    pub extra_headers: &'static [&'static str],
    /// Indices into `extra` that join the label to form the monthly merge
    /// key. Non-key extras keep their first-seen value after a merge.
    pub merge_keys: &'static [usize],
    pub top_n: usize,
    pub monthly_top_n: usize,
    /// Render a top-8 pie chart beside this table.
    pub chart: bool,
}

/// One column of the detail table.
#[derive(Debug, Clone, Copy)]
pub struct DetailColumn {
    pub header: &'static str,
    pub source: ValueSource,
}

/// Everything module-specific the generic pipeline needs.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSpec {
    pub kind: ModuleKind,
    pub display_name: &'static str,
    /// Default base directory name under the configured data root.
    pub dir_name: &'static str,
    /// Token used in raw-log filename stems and the fallback scan.
    pub log_token: &'static str,
    /// Historical raw-log filename stems tried after the generic ones.
    pub legacy_aliases: &'static [&'static str],
    pub daily_prefix: &'static str,
    pub monthly_prefix: &'static str,
    /// Uppercase tag in error-log filenames.
    pub error_tag: &'static str,
    /// Accent color for report headings and chart strokes.
    pub accent: &'static str,
    /// Cap on the most-recent detail slice.
    pub detail_limit: usize,
    /// Render a day-of-month activity trend on the monthly report.
    pub monthly_trend: bool,
    pub detail_columns: &'static [DetailColumn],
    pub tables: &'static [TableSpec],
}

impl ModuleSpec {
    /// Subtype gate: does this record belong to the module at all.
    pub fn admits(&self, fields: &FieldMap, opts: &ClassifyOptions) -> bool {
        match self.kind {
            ModuleKind::AppControl => {
                fields.get("type") == Some("utm") && fields.get("subtype") == Some("app-ctrl")
            }
            ModuleKind::WebFilter => fields
                .get("subtype")
                .map_or(false, |s| s.contains("webfilter")),
            ModuleKind::Ips => {
                fields.get("subtype") == Some("ips")
                    && fields.get("eventtype") == Some("signature")
            }
            ModuleKind::Dns => {
                let gated = fields.get("subtype") == Some("dns");
                if opts.dns_strict_logid {
                    gated && fields.get("logid") == Some(DNS_SECURITY_LOGID)
                } else {
                    gated
                }
            }
            ModuleKind::Antivirus => {
                fields.get("subtype") == Some("virus")
                    && fields.get("eventtype") == Some("infected")
            }
        }
    }

    /// Notability predicate: does a gated record count as blocked /
    /// critical / threat-categorized for reporting.
    pub fn is_notable(&self, fields: &FieldMap) -> bool {
        match self.kind {
            ModuleKind::AppControl => fields.get("action") == Some("block"),
            ModuleKind::WebFilter => fields.get("action") == Some("blocked"),
            ModuleKind::Ips => {
                let by_severity = fields
                    .get("severity")
                    .map_or(false, |s| IPS_NOTABLE_SEVERITIES.contains(&s));
                let by_action = fields
                    .get("action")
                    .map_or(false, |a| BLOCKING_ACTIONS.contains(&a));
                by_severity || by_action
            }
            ModuleKind::Dns => {
                dns_category(fields) != DNS_OTHER_CATEGORY
                    || fields
                        .get("action")
                        .map_or(false, |a| BLOCKING_ACTIONS.contains(&a))
            }
            ModuleKind::Antivirus => {
                let by_action = fields
                    .get("action")
                    .map_or(false, |a| AV_NOTABLE_ACTIONS.contains(&a));
                let crlevel = AV_CRLEVEL.resolve_or_default(fields).to_ascii_lowercase();
                let level = AV_LEVEL.resolve_or_default(fields);
                by_action
                    && (AV_NOTABLE_CRLEVELS.contains(&crlevel.as_str()) || level == "warning")
            }
        }
    }

    pub fn table_spec(&self, id: &str) -> Option<&'static TableSpec> {
        self.tables.iter().find(|t| t.id == id)
    }

    // -- Artifact naming ----------------------------------------------------

    pub fn daily_artifact_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.html", self.daily_prefix, period::day_stamp(date))
    }

    pub fn daily_sidecar_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.json", self.daily_prefix, period::day_stamp(date))
    }

    pub fn daily_csv_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.csv", self.daily_prefix, period::day_stamp(date))
    }

    pub fn monthly_artifact_name(&self, month: MonthKey) -> String {
        format!(
            "{}_{}_{}.html",
            self.monthly_prefix,
            constants::MONTHLY_INFIX,
            month.stamp()
        )
    }
}

impl ModuleKind {
    /// The module's static descriptor.
    pub fn spec(self) -> &'static ModuleSpec {
        match self {
            ModuleKind::AppControl => &MODULES[0],
            ModuleKind::WebFilter => &MODULES[1],
            ModuleKind::Ips => &MODULES[2],
            ModuleKind::Dns => &MODULES[3],
            ModuleKind::Antivirus => &MODULES[4],
        }
    }
}

// =============================================================================
// The descriptor table
// =============================================================================

pub static MODULES: [ModuleSpec; 5] = [
    ModuleSpec {
        kind: ModuleKind::AppControl,
        display_name: "Application Control",
        dir_name: "fortigate",
        log_token: "appctrl",
        legacy_aliases: &["app-ctrl-all", "application-control"],
        daily_prefix: "AppCtrl_Blocked",
        monthly_prefix: "AppCtrl",
        error_tag: "APPCTRL",
        accent: "#9b59b6",
        detail_limit: 200,
        monthly_trend: false,
        detail_columns: &[
            DetailColumn {
                header: "Source IP",
                source: ValueSource::Field(APP_SRCIP),
            },
            DetailColumn {
                header: "Application",
                source: ValueSource::Field(APP_APP),
            },
            DetailColumn {
                header: "Destination Host",
                source: ValueSource::Field(APP_HOST),
            },
            DetailColumn {
                header: "URL",
                source: ValueSource::Field(APP_URL),
            },
            DetailColumn {
                header: "Risk",
                source: ValueSource::Field(APP_RISK),
            },
            DetailColumn {
                header: "Service",
                source: ValueSource::Field(APP_SERVICE),
            },
            DetailColumn {
                header: "Message",
                source: ValueSource::Field(APP_MSG),
            },
        ],
        tables: &[
            TableSpec {
                id: "apps",
                title: "Top 10 Blocked Applications",
                monthly_title: "Most Blocked Applications",
                label_header: "Application",
                count_header: "Block Count",
                axis: ValueSource::Field(APP_APP),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_APP_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "sources",
                title: "Top 10 Source IPs",
                monthly_title: "Most Active Source IPs",
                label_header: "Source IP",
                count_header: "Count",
                axis: ValueSource::Field(APP_SRCIP),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "hosts",
                title: "Top 10 Destination Hosts",
                monthly_title: "Most Blocked Destination Hosts",
                label_header: "Destination Host",
                count_header: "Count",
                axis: ValueSource::Field(APP_HOST),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "categories",
                title: "Top Blocked Categories",
                monthly_title: "Most Blocked Categories",
                label_header: "Category",
                count_header: "Count",
                axis: ValueSource::Field(APP_CATEGORY),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: true,
            },
            TableSpec {
                id: "risk",
                title: "Blocked Events by App Risk",
                monthly_title: "Blocked Events by App Risk",
                label_header: "Risk Level",
                count_header: "Count",
                axis: ValueSource::Field(APP_RISK),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
        ],
    },
    ModuleSpec {
        kind: ModuleKind::WebFilter,
        display_name: "Web Filter",
        dir_name: "fortigate_webfilter",
        log_token: "webfilter",
        legacy_aliases: &["disk-webf"],
        daily_prefix: "WebFilter_Blocked",
        monthly_prefix: "WebFilter",
        error_tag: "WEBFILTER",
        accent: "#c0392b",
        detail_limit: 200,
        monthly_trend: false,
        detail_columns: &[
            DetailColumn {
                header: "Source IP",
                source: ValueSource::Field(WEB_SRCIP),
            },
            DetailColumn {
                header: "Hostname",
                source: ValueSource::Field(WEB_HOSTNAME),
            },
            DetailColumn {
                header: "URL",
                source: ValueSource::Field(WEB_URL),
            },
            DetailColumn {
                header: "Category",
                source: ValueSource::Field(WEB_CATEGORY),
            },
            DetailColumn {
                header: "Message",
                source: ValueSource::Field(WEB_MSG),
            },
        ],
        tables: &[
            TableSpec {
                id: "sources",
                title: "Top 10 Source IPs",
                monthly_title: "Most Active Source IPs",
                label_header: "Source IP",
                count_header: "Count",
                axis: ValueSource::Field(WEB_SRCIP),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "urls",
                title: "Top 15 Blocked URLs",
                monthly_title: "Most Blocked URLs",
                label_header: "URL",
                count_header: "Count",
                axis: ValueSource::Field(WEB_URL),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::WEBFILTER_URL_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "categories",
                title: "Top Blocked Categories",
                monthly_title: "Most Blocked Categories",
                label_header: "Category",
                count_header: "Count",
                axis: ValueSource::Field(WEB_CATEGORY),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: true,
            },
        ],
    },
    ModuleSpec {
        kind: ModuleKind::Ips,
        display_name: "IPS",
        dir_name: "fortigate_ips",
        log_token: "ips",
        legacy_aliases: &["ips-all", "utm-ips"],
        daily_prefix: "IPS_Critical_Events",
        monthly_prefix: "IPS",
        error_tag: "IPS",
        accent: "#e74c3c",
        detail_limit: 100,
        monthly_trend: true,
        detail_columns: &[
            DetailColumn {
                header: "Source IP",
                source: ValueSource::Field(IPS_SRCIP),
            },
            DetailColumn {
                header: "Target IP",
                source: ValueSource::Field(IPS_DSTIP),
            },
            DetailColumn {
                header: "Attack",
                source: ValueSource::Field(IPS_ATTACK),
            },
            DetailColumn {
                header: "Action",
                source: ValueSource::Field(IPS_ACTION),
            },
            DetailColumn {
                header: "Service",
                source: ValueSource::Field(IPS_SERVICE),
            },
            DetailColumn {
                header: "Message",
                source: ValueSource::Field(IPS_MSG),
            },
        ],
        tables: &[TableSpec {
            id: "attacks",
            title: "Top 10 Attack Types",
            monthly_title: "Most Frequent Attacks",
            label_header: "Attack Name",
            count_header: "Count",
            axis: ValueSource::Field(IPS_ATTACK),
            extra: &[
                ValueSource::Field(IPS_ACTION),
                ValueSource::Field(IPS_SRCIP),
                ValueSource::Field(IPS_COUNTRY),
                ValueSource::Field(IPS_DSTIP),
                ValueSource::Field(IPS_SERVICE),
            ],
            extra_headers: &["Action", "Source IP", "Country", "Target IP", "Service"],
            // Monthly rows merge on attack+srcip+country+dstip; action and
            // service stay representative.
            merge_keys: &[1, 2, 3],
            top_n: constants::DAILY_TOP_N,
            monthly_top_n: constants::MONTHLY_ATTACK_TOP_N,
            chart: false,
        }],
    },
    ModuleSpec {
        kind: ModuleKind::Dns,
        display_name: "DNS Filter",
        dir_name: "fortigate_dns",
        log_token: "dns",
        legacy_aliases: &["dns-all"],
        daily_prefix: "DNS_Events_Report",
        monthly_prefix: "DNS",
        error_tag: "DNS",
        accent: "#e74c3c",
        detail_limit: 50,
        monthly_trend: false,
        detail_columns: &[
            DetailColumn {
                header: "Source IP",
                source: ValueSource::Field(DNS_SRCIP),
            },
            DetailColumn {
                header: "Destination IP",
                source: ValueSource::Field(DNS_DESTIP),
            },
            DetailColumn {
                header: "Domain",
                source: ValueSource::FieldLower(DNS_QNAME),
            },
            DetailColumn {
                header: "Query Type",
                source: ValueSource::Field(DNS_QTYPE),
            },
            DetailColumn {
                header: "Category",
                source: ValueSource::DnsCategory,
            },
            DetailColumn {
                header: "Action",
                source: ValueSource::Field(DNS_ACTION),
            },
            DetailColumn {
                header: "Response",
                source: ValueSource::Field(DNS_RESPONSE),
            },
        ],
        tables: &[
            TableSpec {
                id: "categories",
                title: "Threat Categories",
                monthly_title: "Threat Categories",
                label_header: "Category",
                count_header: "Count",
                axis: ValueSource::DnsCategory,
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: true,
            },
            TableSpec {
                id: "domains",
                title: "Top 10 Malicious Domains",
                monthly_title: "Most Seen Malicious Domains",
                label_header: "Domain",
                count_header: "Count",
                axis: ValueSource::FieldLower(DNS_QNAME),
                extra: &[ValueSource::Field(DNS_ACTION)],
                extra_headers: &["Action"],
                // Monthly rows merge on domain+action.
                merge_keys: &[0],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_DOMAIN_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "sources",
                title: "Top 10 Source IPs",
                monthly_title: "Most Active Source IPs",
                label_header: "Source IP",
                count_header: "Count",
                axis: ValueSource::Field(DNS_SRCIP),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
        ],
    },
    ModuleSpec {
        kind: ModuleKind::Antivirus,
        display_name: "Antivirus",
        dir_name: "fortigate_antivirus",
        log_token: "antivirus",
        legacy_aliases: &["av", "disk-av", "utm-virus"],
        daily_prefix: "AV_Infected_Report",
        monthly_prefix: "AV",
        error_tag: "ANTIVIRUS",
        accent: "#c0392b",
        detail_limit: 100,
        monthly_trend: false,
        detail_columns: &[
            DetailColumn {
                header: "Source IP",
                source: ValueSource::Field(AV_SRCIP),
            },
            DetailColumn {
                header: "Destination IP",
                source: ValueSource::Field(AV_DESTIP),
            },
            DetailColumn {
                header: "URL",
                source: ValueSource::Field(AV_URL),
            },
            DetailColumn {
                header: "Filename",
                source: ValueSource::Field(AV_FILE),
            },
            DetailColumn {
                header: "Virus",
                source: ValueSource::Field(AV_VIRUS),
            },
            DetailColumn {
                header: "Action",
                source: ValueSource::Field(AV_ACTION),
            },
            DetailColumn {
                header: "User Agent",
                source: ValueSource::Field(AV_AGENT),
            },
        ],
        tables: &[
            TableSpec {
                id: "viruses",
                title: "Top 10 Detected Viruses",
                monthly_title: "Most Detected Viruses",
                label_header: "Virus Name",
                count_header: "Count",
                axis: ValueSource::Field(AV_VIRUS),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_ATTACK_TOP_N,
                chart: true,
            },
            TableSpec {
                id: "urls",
                title: "Top 10 Infected URLs",
                monthly_title: "Most Seen Infected URLs",
                label_header: "URL",
                count_header: "Count",
                axis: ValueSource::Field(AV_URL),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "files",
                title: "Top 10 Infected Files",
                monthly_title: "Most Seen Infected Files",
                label_header: "Filename",
                count_header: "Count",
                axis: ValueSource::Field(AV_FILE),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
            TableSpec {
                id: "sources",
                title: "Top 10 Source IPs",
                monthly_title: "Most Active Source IPs",
                label_header: "Source IP",
                count_header: "Count",
                axis: ValueSource::Field(AV_SRCIP),
                extra: &[],
                extra_headers: &[],
                merge_keys: &[],
                top_n: constants::DAILY_TOP_N,
                monthly_top_n: constants::MONTHLY_TOP_N,
                chart: false,
            },
        ],
    },
];

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn map(line: &str) -> FieldMap {
        FieldMap::parse(line).expect("test line must parse")
    }

    fn opts() -> ClassifyOptions {
        ClassifyOptions::default()
    }

    #[test]
    fn descriptor_table_is_keyed_consistently() {
        for kind in ModuleKind::all() {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn appctrl_gate_requires_utm_type_and_subtype() {
        let spec = ModuleKind::AppControl.spec();
        assert!(spec.admits(&map("type=utm subtype=app-ctrl action=block"), &opts()));
        assert!(!spec.admits(&map("type=traffic subtype=app-ctrl"), &opts()));
        assert!(!spec.admits(&map("type=utm subtype=webfilter"), &opts()));
    }

    #[test]
    fn appctrl_block_is_notable_all_other_actions_are_not() {
        let spec = ModuleKind::AppControl.spec();
        assert!(spec.is_notable(&map("type=utm subtype=app-ctrl action=block")));
        for action in ["pass", "allow", "blocked", "monitor", "reset", ""] {
            let line = format!("type=utm subtype=app-ctrl action=\"{action}\"");
            assert!(
                !spec.is_notable(&map(&line)),
                "action={action:?} must not be notable"
            );
        }
        // Missing action entirely is also not notable.
        assert!(!spec.is_notable(&map("type=utm subtype=app-ctrl app=Tor")));
    }

    #[test]
    fn webfilter_gate_matches_any_subtype_containing_webfilter() {
        let spec = ModuleKind::WebFilter.spec();
        assert!(spec.admits(&map("subtype=webfilter action=blocked"), &opts()));
        assert!(spec.admits(&map("subtype=ssl-webfilter action=blocked"), &opts()));
        assert!(!spec.admits(&map("subtype=dns"), &opts()));
    }

    #[test]
    fn webfilter_notable_only_on_blocked() {
        let spec = ModuleKind::WebFilter.spec();
        assert!(spec.is_notable(&map("subtype=webfilter action=blocked")));
        assert!(!spec.is_notable(&map("subtype=webfilter action=allowed")));
        assert!(!spec.is_notable(&map("subtype=webfilter action=block")));
    }

    #[test]
    fn ips_gate_requires_signature_events() {
        let spec = ModuleKind::Ips.spec();
        assert!(spec.admits(&map("subtype=ips eventtype=signature"), &opts()));
        assert!(!spec.admits(&map("subtype=ips eventtype=anomaly"), &opts()));
    }

    #[test]
    fn ips_notable_by_severity_or_blocking_action() {
        let spec = ModuleKind::Ips.spec();
        assert!(spec.is_notable(&map("subtype=ips eventtype=signature severity=critical action=detected")));
        assert!(spec.is_notable(&map("subtype=ips eventtype=signature severity=high")));
        assert!(spec.is_notable(&map("subtype=ips eventtype=signature severity=low action=deny")));
        assert!(spec.is_notable(&map("subtype=ips eventtype=signature action=block")));
    }

    /// A low-severity pass-through signature fails both clauses.
    #[test]
    fn ips_low_severity_pass_action_is_not_notable() {
        let spec = ModuleKind::Ips.spec();
        assert!(!spec.is_notable(&map("subtype=ips eventtype=signature severity=low action=pass")));
    }

    #[test]
    fn dns_category_codes_map_to_labels() {
        assert_eq!(dns_category_name(62), Some("Phishing"));
        assert_eq!(dns_category_name(63), Some("Malicious Websites"));
        assert_eq!(dns_category_name(69), Some("Pornography"));
        assert_eq!(dns_category_name(1), None);
        assert_eq!(dns_category(&map("subtype=dns cat=66")), "Dynamic DNS");
        assert_eq!(dns_category(&map("subtype=dns cat=7")), DNS_OTHER_CATEGORY);
        assert_eq!(dns_category(&map("subtype=dns")), DNS_OTHER_CATEGORY);
        assert_eq!(dns_category(&map("subtype=dns cat=abc")), DNS_OTHER_CATEGORY);
    }

    /// A mapped category is notable even when the action is the
    /// pass-through default.
    #[test]
    fn dns_mapped_category_is_notable_without_action() {
        let spec = ModuleKind::Dns.spec();
        assert!(spec.is_notable(&map("subtype=dns cat=63 qname=evil.example")));
        assert!(!spec.is_notable(&map("subtype=dns cat=2 qname=ok.example")));
        assert!(spec.is_notable(&map("subtype=dns cat=2 action=block qname=ok.example")));
    }

    #[test]
    fn dns_strict_logid_refines_the_gate() {
        let spec = ModuleKind::Dns.spec();
        let strict = ClassifyOptions {
            dns_strict_logid: true,
        };
        let with_logid = map("subtype=dns logid=1501054802 cat=63");
        let without = map("subtype=dns cat=63");
        assert!(spec.admits(&with_logid, &opts()));
        assert!(spec.admits(&without, &opts()));
        assert!(spec.admits(&with_logid, &strict));
        assert!(!spec.admits(&without, &strict));
    }

    #[test]
    fn av_notability_needs_action_and_severity_clause() {
        let spec = ModuleKind::Antivirus.spec();
        assert!(spec.is_notable(&map("subtype=virus eventtype=infected action=blocked crlevel=critical")));
        assert!(spec.is_notable(&map("subtype=virus eventtype=infected action=block crlevel=high")));
        assert!(spec.is_notable(&map("subtype=virus eventtype=infected action=blocked level=warning")));
        // Blocking action alone is not enough.
        assert!(!spec.is_notable(&map("subtype=virus eventtype=infected action=blocked")));
        // Severity alone is not enough either.
        assert!(!spec.is_notable(&map("subtype=virus eventtype=infected action=monitored crlevel=critical")));
    }

    #[test]
    fn av_crlevel_comparison_ignores_case() {
        let spec = ModuleKind::Antivirus.spec();
        assert!(spec.is_notable(&map("subtype=virus eventtype=infected action=blocked crlevel=Critical")));
    }

    #[test]
    fn artifact_names_follow_the_naming_convention() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let month = MonthKey::new(2025, 6).unwrap();
        assert_eq!(
            ModuleKind::AppControl.spec().daily_artifact_name(date),
            "AppCtrl_Blocked_20250601.html"
        );
        assert_eq!(
            ModuleKind::Ips.spec().daily_artifact_name(date),
            "IPS_Critical_Events_20250601.html"
        );
        assert_eq!(
            ModuleKind::Dns.spec().daily_sidecar_name(date),
            "DNS_Events_Report_20250601.json"
        );
        assert_eq!(
            ModuleKind::WebFilter.spec().monthly_artifact_name(month),
            "WebFilter_Monthly_Report_202506.html"
        );
        assert_eq!(
            ModuleKind::Antivirus.spec().daily_csv_name(date),
            "AV_Infected_Report_20250601.csv"
        );
    }

    #[test]
    fn ips_merge_keys_reference_declared_extras() {
        for spec in &MODULES {
            for table in spec.tables {
                assert_eq!(table.extra.len(), table.extra_headers.len());
                for key in table.merge_keys {
                    assert!(*key < table.extra.len());
                }
            }
        }
    }
}
