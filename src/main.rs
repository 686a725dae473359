// FortiRep - main.rs
//
// CLI entry point. Handles:
// 1. Argument parsing (subcommands daily / monthly / list)
// 2. Configuration loading and warning reporting
// 3. Logging initialisation (debug mode support)
// 4. Pipeline dispatch and process exit code
//
// Stdout carries only artifact paths and `list` output; everything else
// goes to stderr via the logging layer, so scheduled invocations can
// capture results cleanly.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fortirep::app::{generate, inventory};
use fortirep::core::model::ModuleKind;
use fortirep::core::period::{self, Period};
use fortirep::platform::config::{load_config, AppConfig};
use fortirep::util;
use fortirep::util::error::{ArgumentError, Result};

/// FortiRep - FortiGate firewall log reporting.
///
/// Generates daily HTML reports from raw FortiGate log exports, and
/// monthly recaps from the daily reports, for five security modules:
/// application control, web filter, IPS, DNS filter, and antivirus.
#[derive(Parser, Debug)]
#[command(name = "fortirep", version, about)]
struct Cli {
    /// Explicit config file (load errors are fatal when this is given).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate daily reports from raw logs.
    Daily {
        /// Module to run: appctrl, webfilter, ips, dns, antivirus, or all.
        #[arg(long, default_value = "all")]
        module: String,

        /// Day to report on as YYYY_MM_DD (defaults to yesterday).
        #[arg(long)]
        date: Option<String>,

        /// Also write the detail rows as CSV beside the HTML.
        #[arg(long)]
        csv: bool,
    },

    /// Roll daily reports up into monthly recaps.
    Monthly {
        /// Module to run: appctrl, webfilter, ips, dns, antivirus, or all.
        #[arg(long, default_value = "all")]
        module: String,

        /// Month to recap as YYYYMM, YYYY_MM, or YYYY-MM (defaults to
        /// the last full month).
        #[arg(long)]
        month: Option<String>,
    },

    /// List report artifacts on disk.
    List {
        /// Module to list: appctrl, webfilter, ips, dns, antivirus, or all.
        #[arg(long, default_value = "all")]
        module: String,

        /// Narrow the listing to one period: daily or monthly.
        #[arg(long)]
        period: Option<String>,

        /// Output JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Config before logging: the config file may set the log level.
    // Fatal config errors therefore go straight to stderr.
    let (config, warnings) = match load_config(cli.config.as_deref()) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    util::logging::init(cli.debug, config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "FortiRep starting"
    );

    let exit_code = match run(&cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            1
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(command: &Command, config: &AppConfig) -> Result<i32> {
    match command {
        Command::Daily { module, date, csv } => {
            let kinds = resolve_modules(module)?;
            let date = match date {
                Some(arg) => period::parse_day_arg(arg)?,
                None => period::yesterday(),
            };
            let mut config = config.clone();
            config.detail_csv |= *csv;
            let results = generate::run_daily_all(&config, &kinds, date);
            Ok(report_outcomes(
                results.into_iter().map(|(kind, r)| (kind, r.map(Some))),
            ))
        }

        Command::Monthly { module, month } => {
            let kinds = resolve_modules(module)?;
            let month = match month {
                Some(arg) => period::parse_month_arg(arg)?,
                None => period::last_full_month(),
            };
            let results = generate::run_monthly_all(config, &kinds, month);
            Ok(report_outcomes(results))
        }

        Command::List {
            module,
            period: period_arg,
            json,
        } => {
            let kinds = resolve_modules(module)?;
            let period = period_arg
                .as_deref()
                .map(|arg| {
                    Period::from_arg(arg).ok_or_else(|| ArgumentError::InvalidPeriod {
                        given: arg.to_string(),
                    })
                })
                .transpose()?;
            let entries = inventory::collect_inventory(config, &kinds, period);
            if *json {
                let text = inventory::to_json(&entries).unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Inventory serialisation failed");
                    "[]".to_string()
                });
                println!("{text}");
            } else {
                for entry in &entries {
                    println!("{}", inventory::to_text_line(entry));
                }
            }
            Ok(0)
        }
    }
}

/// Resolve the module argument to the set of modules to run.
fn resolve_modules(arg: &str) -> Result<Vec<ModuleKind>> {
    if arg.eq_ignore_ascii_case("all") {
        return Ok(ModuleKind::all().to_vec());
    }
    match ModuleKind::from_arg(arg) {
        Some(kind) => Ok(vec![kind]),
        None => Err(ArgumentError::InvalidModule {
            given: arg.to_string(),
        }
        .into()),
    }
}

/// Print artifact paths to stdout and derive the process exit code:
/// 0 when every module succeeded, 1 when any failed. A module that
/// legitimately produced no artifact is not a failure.
fn report_outcomes<I>(results: I) -> i32
where
    I: IntoIterator<Item = (ModuleKind, Result<Option<PathBuf>>)>,
{
    let mut failures = 0u32;
    for (kind, result) in results {
        match result {
            Ok(Some(path)) => println!("{}", path.display()),
            Ok(None) => tracing::info!(module = %kind, "No artifact produced"),
            Err(e) => {
                failures += 1;
                eprintln!("Error [{kind}]: {e}");
            }
        }
    }
    if failures > 0 {
        1
    } else {
        0
    }
}
