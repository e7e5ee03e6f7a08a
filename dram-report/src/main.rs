use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use libdramlog::catalog;
use libdramlog::service::report::{ConsumptionReport, HistoryQuery, HistoryStats};
use libdramlog::service::validation::DATE_FORMAT;
use libdramlog::service::DramlogService;
use libdramlog::{DramlogError, EventStatus};

#[derive(Parser, Debug)]
#[command(name = "dram-report")]
#[command(version, about = "Report bottle consumption across tasting events")]
#[command(long_about = r#"Report bottle consumption across tasting events with filtering and formatting options.

EXAMPLES:
    # Last 20 events (default), newest first; --summary covers all matches
    dram-report

    # Only closed events
    dram-report --status completed

    # Events in a date range
    dram-report --since 2025-11-01 --until 2025-11-30

    # Search title, location, organizer and ambassador
    dram-report --search amsterdam

    # Totals per whisky
    dram-report --summary
    dram-report --summary --format json | jq '.by_whisky'

    # JSON output for scripting
    dram-report --format json | jq '.[] | .total_consumed_cl'

    # One row per bottle for a spreadsheet
    dram-report --format csv > consumption.csv

OUTPUT FORMATS:
    text  - One line per event with poured volume (default)
    json  - JSON array of consumption reports
    jsonl - One consumption report per line
    csv   - One row per bottle per event, with headers

EXIT CODES:
    0 - Success (including empty results)
    2 - Store or configuration error
    3 - Invalid input (bad date)
"#)]
struct Args {
    /// Filter by status (draft, active, completed)
    #[arg(long, value_name = "STATUS")]
    status: Option<EventStatus>,

    /// Show events on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    since: Option<String>,

    /// Show events on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    until: Option<String>,

    /// Case-insensitive search in title, location, organizer and ambassador
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Maximum number of events to return (default: 20 for event lists, all for --summary)
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Print aggregate totals instead of individual events
    #[arg(long)]
    summary: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "jsonl", "csv"])]
    format: String,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Events listed when `--limit` is not given
const DEFAULT_LIMIT: usize = 20;

/// Parse a `YYYY-MM-DD` command-line date
fn parse_date(date_str: &str) -> std::result::Result<NaiveDate, DramlogError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
        DramlogError::InvalidInput(format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))
    })
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn main() {
    let args = Args::parse();

    libdramlog::logging::init_for_cli(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<DramlogError>()
            .map(DramlogError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    tracing::debug!("dram-report started with args: {:?}", args);

    let query = HistoryQuery {
        status: args.status,
        since: args.since.as_deref().map(parse_date).transpose()?,
        until: args.until.as_deref().map(parse_date).transpose()?,
        search: args.search,
        // summaries cover every match unless a limit is asked for
        limit: match (args.limit, args.summary) {
            (Some(limit), _) => Some(limit),
            (None, true) => None,
            (None, false) => Some(DEFAULT_LIMIT),
        },
    };

    let service = DramlogService::new()?;

    if args.summary {
        let stats = service.reports().summary(&query)?;
        return output_summary(&stats, &args.format);
    }

    let reports: Vec<ConsumptionReport> = service
        .reports()
        .query(&query)?
        .iter()
        .map(ConsumptionReport::for_event)
        .collect();

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        "jsonl" => {
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }
        "csv" => {
            println!("event_id,date,title,location,status,whisky_id,whisky,start_cl,end_cl,consumed_cl");
            for report in &reports {
                for line in &report.lines {
                    let end_cl = line.end_cl.map(|cl| cl.to_string()).unwrap_or_default();
                    println!(
                        "{},{},{},{},{},{},{},{},{},{}",
                        report.event_id,
                        report.date,
                        csv_field(&report.title),
                        csv_field(&report.location),
                        report.status,
                        csv_field(&line.whisky_id),
                        csv_field(&line.name),
                        line.start_cl,
                        end_cl,
                        line.consumed_cl
                    );
                }
            }
        }
        _ => {
            // empty results print nothing
            for report in &reports {
                let poured = if report.status == EventStatus::Completed {
                    format!(
                        "{} cl poured ({} bottles)",
                        report.total_consumed_cl,
                        catalog::format_bottles(report.total_consumed_cl)
                    )
                } else {
                    format!("{}/{} bottles measured", report.reported_items, report.lines.len())
                };

                println!(
                    "{} | {} | {} @ {} | {} | {}",
                    report.date, report.event_id, report.title, report.location, report.status, poured
                );
            }
        }
    }

    Ok(())
}

fn output_summary(stats: &HistoryStats, format: &str) -> Result<()> {
    match format {
        "json" | "jsonl" => {
            println!("{}", serde_json::to_string(stats)?);
        }
        "csv" => {
            println!("whisky_id,whisky,consumed_cl");
            for (whisky_id, cl) in &stats.by_whisky {
                println!(
                    "{},{},{}",
                    csv_field(whisky_id),
                    csv_field(catalog::display_name(whisky_id)),
                    cl
                );
            }
        }
        _ => {
            println!(
                "Events: {} ({} active, {} completed, {} draft)",
                stats.total_events, stats.active_events, stats.completed_events, stats.draft_events
            );
            println!(
                "Poured: {} cl ({} bottles)",
                stats.total_consumed_cl,
                catalog::format_bottles(stats.total_consumed_cl)
            );
            for (whisky_id, cl) in &stats.by_whisky {
                println!("  {:<30} {:>5} cl", catalog::display_name(whisky_id), cl);
            }
        }
    }
    Ok(())
}
