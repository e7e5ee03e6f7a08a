//! dram-event - Run the inventory side of a tasting event
//!
//! Unix-style tool for opening an event, recording start and end volumes,
//! closing it and inspecting its consumption report.

use anyhow::Context;
use clap::{Parser, Subcommand};
use libdramlog::catalog;
use libdramlog::service::report::ConsumptionReport;
use libdramlog::service::validation::EventRequest;
use libdramlog::service::DramlogService;
use libdramlog::{DramlogError, EventStatus};

#[derive(Parser, Debug)]
#[command(name = "dram-event")]
#[command(version)]
#[command(about = "Track bottle inventory for tasting events")]
#[command(long_about = "\
dram-event - Track bottle inventory for tasting events

DESCRIPTION:
    dram-event opens a tasting event with the bottles you bring, records how
    much is left when the event ends, and reports what was poured.
    Volumes are in centiliters (cl); one bottle is 70 cl.

COMMANDS:
    new       Open an event and record its starting inventory
    start     Adjust starting volumes of an open event
    end       Record ending volumes (unmeasured bottles default to their start)
    complete  Close the event
    delete    Delete an event
    show      Show an event's consumption report
    catalog   List the bottles that can be selected

USAGE EXAMPLES:
    # Open an event with two bottles, the Caol Ila counted double
    dram-event new --title \"Islay Tasting Night\" --location Amsterdam \\
        --ambassador Sanne --whisky lag-16,ci-12 --start ci-12=140

    # Record what is left, then close
    dram-event end <EVENT_ID> lag-16=20 ci-12=100
    dram-event complete <EVENT_ID>

    # Consumption report as JSON
    dram-event show <EVENT_ID> --format json

CONFIGURATION:
    Configuration file: ~/.config/dramlog/config.toml
    Event store:        ~/.local/share/dramlog/diageo_whisky_events.json

    Override with environment variables:
        DRAMLOG_CONFIG      - Path to config file
        DRAMLOG_STORE_PATH  - Path to event store

EXIT CODES:
    0 - Success
    1 - Operation not allowed (event already completed)
    2 - Store or configuration error
    3 - Invalid input (missing fields, unknown event or whisky id)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open an event and record its starting inventory
    New {
        /// Event title
        #[arg(long)]
        title: Option<String>,

        /// Event date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Venue or city
        #[arg(long)]
        location: Option<String>,

        /// Organizing party (default: from config)
        #[arg(long)]
        organizer: Option<String>,

        /// Ambassador running the event (default: from config)
        #[arg(long)]
        ambassador: Option<String>,

        /// Catalog ids of the bottles brought (repeatable or comma-separated)
        #[arg(short, long = "whisky", value_delimiter = ',')]
        whiskies: Vec<String>,

        /// Starting volume other than one bottle, as WHISKY=CL
        #[arg(long = "start", value_parser = parse_volume)]
        starts: Vec<(String, u32)>,

        /// Output format: text (event id) or json (full event)
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Adjust starting volumes of an open event
    Start {
        /// Event id
        event_id: String,

        /// New starting volumes as WHISKY=CL
        #[arg(required = true, value_parser = parse_volume)]
        volumes: Vec<(String, u32)>,
    },

    /// Record ending volumes of an open event
    End {
        /// Event id
        event_id: String,

        /// Remaining volumes as WHISKY=CL
        #[arg(value_parser = parse_volume)]
        volumes: Vec<(String, u32)>,
    },

    /// Close an event
    Complete {
        /// Event id
        event_id: String,

        /// Remaining volumes to record before closing, as WHISKY=CL
        #[arg(value_parser = parse_volume)]
        volumes: Vec<(String, u32)>,
    },

    /// Delete an event
    Delete {
        /// Event id
        event_id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show an event's consumption report
    Show {
        /// Event id
        event_id: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the bottles that can be selected
    Catalog {
        /// Output format: text or json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Parse a `WHISKY=CL` assignment
fn parse_volume(s: &str) -> Result<(String, u32), String> {
    let (id, cl) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected WHISKY=CL, got '{}'", s))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("Missing whisky id in '{}'", s));
    }
    let cl = cl
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid volume '{}': expected a whole number of cl", cl))?;
    Ok((id.to_string(), cl))
}

fn main() {
    let cli = Cli::parse();

    libdramlog::logging::init_for_cli(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<DramlogError>()
            .map(DramlogError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!("dram-event started with args: {:?}", cli);

    let service = DramlogService::new()?;

    match cli.command {
        Commands::New {
            title,
            date,
            location,
            organizer,
            ambassador,
            whiskies,
            starts,
            format,
        } => {
            let defaults = &service.config().defaults;
            // missing fields are left empty so validation can report them together
            let request = EventRequest {
                title: title.unwrap_or_default(),
                date,
                location: location.unwrap_or_default(),
                organizer: organizer
                    .or_else(|| defaults.organizer.clone())
                    .unwrap_or_default(),
                ambassador: ambassador
                    .or_else(|| defaults.ambassador.clone())
                    .unwrap_or_default(),
                whiskies,
                start_overrides: starts,
            };
            cmd_new(&service, request, &format)?;
        }
        Commands::Start { event_id, volumes } => {
            service.events().set_starts(&event_id, &volumes)?;
            print_status(&service, &event_id)?;
        }
        Commands::End { event_id, volumes } => {
            service.events().set_ends(&event_id, &volumes)?;
            print_status(&service, &event_id)?;
        }
        Commands::Complete { event_id, volumes } => {
            let event = service.events().complete_with(&event_id, &volumes)?;
            println!(
                "Completed {}: {} cl poured ({} bottles)",
                event.id,
                event.total_consumed_cl(),
                catalog::format_bottles(event.total_consumed_cl())
            );
        }
        Commands::Delete { event_id, force } => {
            cmd_delete(&service, &event_id, force)?;
        }
        Commands::Show { event_id, format } => {
            let report = service
                .reports()
                .report(&event_id)?
                .ok_or_else(|| DramlogError::NotFound(format!("Event {}", event_id)))?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Catalog { format } => {
            cmd_catalog(&format)?;
        }
    }

    Ok(())
}

fn cmd_new(service: &DramlogService, request: EventRequest, format: &str) -> anyhow::Result<()> {
    let event = service.events().create(request)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!("{}", event.id);
    }
    Ok(())
}

fn cmd_delete(service: &DramlogService, event_id: &str, force: bool) -> anyhow::Result<()> {
    let event = service
        .events()
        .get(event_id)?
        .ok_or_else(|| DramlogError::NotFound(format!("Event {}", event_id)))?;

    if !force && atty::is(atty::Stream::Stdin) {
        use std::io::{self, Write};
        print!("Delete event '{}' ({})? [y/N]: ", event.title, event.id);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    service.events().delete(event_id)?;
    println!("Deleted {}", event_id);
    Ok(())
}

fn cmd_catalog(format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(catalog::all())?);
        return Ok(());
    }

    for whisky in catalog::all() {
        println!(
            "{:<10} {:<30} {} ({}, {} cl)",
            whisky.id, whisky.name, whisky.distillery, whisky.region, whisky.bottle_size_cl
        );
    }
    Ok(())
}

/// One line per item with the current start/end volumes
fn print_status(service: &DramlogService, event_id: &str) -> anyhow::Result<()> {
    let event = service
        .events()
        .get(event_id)?
        .ok_or_else(|| DramlogError::NotFound(format!("Event {}", event_id)))?;

    for item in &event.inventory {
        let end = item
            .end_cl
            .map(|cl| format!("{} cl", cl))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} start {:>4} cl  end {:>7}",
            item.whisky_id, item.start_cl, end
        );
    }
    Ok(())
}

fn print_report(report: &ConsumptionReport) {
    println!("{} [{}]", report.title, report.status);
    println!("  id:         {}", report.event_id);
    println!("  date:       {}", report.date);
    println!("  location:   {}", report.location);
    if !report.organizer.is_empty() {
        println!("  organizer:  {}", report.organizer);
    }
    println!("  ambassador: {}", report.ambassador);
    println!();

    for line in &report.lines {
        match line.end_cl {
            Some(end) => println!(
                "  {:<30} start {:>4} cl  end {:>4} cl  poured {:>4} cl ({:.2} bottles)",
                line.name, line.start_cl, end, line.consumed_cl, line.consumed_bottles
            ),
            None => println!(
                "  {:<30} start {:>4} cl  not measured",
                line.name, line.start_cl
            ),
        }
    }

    if report.status == EventStatus::Completed {
        println!();
        println!(
            "  Total poured: {} cl ({:.2} bottles)",
            report.total_consumed_cl, report.total_consumed_bottles
        );
    }
}
