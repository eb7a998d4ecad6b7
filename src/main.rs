//! Quakemap - earthquake catalog fetch/filter/marker pipeline.
//!
//! Fetches a CSV event catalog from USGS, builds a validated in-memory
//! table, applies inclusive magnitude/year filters, and emits either the
//! matching events or renderable map markers.

use std::io;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Utc};
use clap::Parser;
use tracing::{error, info, warn};

mod catalog;
mod cli;
mod client;
mod errors;
mod filters;
mod markers;
mod output;
mod store;

use catalog::{EventTable, SeismicEvent};
use cli::{Cli, Command};
use client::{CatalogClient, FeedQuery};
use filters::{filter, FilterParams};
use markers::{markers, DepthBands, MarkerSpec};
use store::ParameterStore;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Events(args) => cmd_events(args),
        Command::Map(args) => cmd_map(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the fetch window: end defaults to today, start to 30 days back.
fn resolve_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or_else(|| Utc::now().date_naive());
    let start = start.unwrap_or_else(|| end.checked_sub_days(Days::new(30)).unwrap_or(end));
    (start, end)
}

/// Resolve year bounds against what the table actually holds.
fn resolve_params(
    min_magnitude: f64,
    year_start: Option<i32>,
    year_end: Option<i32>,
    table: &EventTable,
) -> FilterParams {
    let (lo, hi) = table.year_span().unwrap_or_else(|| {
        let year = Utc::now().year();
        (year, year)
    });

    FilterParams {
        min_magnitude,
        year_start: year_start.unwrap_or(lo),
        year_end: year_end.unwrap_or(hi),
    }
}

/// Execute the `events` command - fetch, filter, print events.
fn cmd_events(args: cli::EventsArgs) -> Result<()> {
    let client = CatalogClient::new().context("failed to create catalog client")?;

    let (start_date, end_date) = resolve_window(args.start, args.end);
    let query = FeedQuery {
        start_date,
        end_date,
        min_magnitude: args.feed_floor,
        bbox: args.bbox,
    };

    // A failed fetch degrades to an empty table; "0 events match" is a
    // legitimate state, not an error.
    let table = client.fetch_table_or_empty(&query);
    let params = resolve_params(args.min_magnitude, args.year_start, args.year_end, &table);

    let view = filter(&table, &params);
    info!("{} of {} events match", view.len(), table.len());

    let events: Vec<&SeismicEvent> = view.events().iter().copied().take(args.limit).collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_events(&mut handle, &events, args.format)?;

    Ok(())
}

/// Execute the `map` command - fetch, filter, emit marker specs.
///
/// Wires the pipeline through the parameter store the way an embedding
/// UI would: the store triggers recomputation, the subscriber filters
/// and maps, and the initial render comes from a refresh.
fn cmd_map(args: cli::MapArgs) -> Result<()> {
    let client = CatalogClient::new().context("failed to create catalog client")?;

    let (start_date, end_date) = resolve_window(args.start, args.end);
    let query = FeedQuery {
        start_date,
        end_date,
        min_magnitude: args.feed_floor,
        bbox: args.bbox,
    };

    let table = Rc::new(client.fetch_table_or_empty(&query));
    let params = resolve_params(args.min_magnitude, args.year_start, args.year_end, &table);

    let bands = DepthBands {
        shallow_max_km: args.shallow_max,
        intermediate_max_km: args.intermediate_max,
    };
    let format = args.format;
    let limit = args.limit;

    let mut store = ParameterStore::new(params);
    let source = Rc::clone(&table);
    store.subscribe(move |params| {
        let view = filter(&source, &params);
        let specs: Vec<MarkerSpec> = markers(&view, bands).take(limit).collect();
        info!("{} of {} events match", view.len(), source.len());

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = output::write_markers(&mut handle, &specs, format) {
            warn!("failed to write markers: {e}");
        }
    });

    let params = store.params();
    info!(
        "magnitude floor M{:.1}, years {}..={}",
        params.min_magnitude, params.year_start, params.year_end
    );

    store.refresh();

    Ok(())
}
