//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::client::BBox;
use crate::output::Format;

/// Fetch, filter, and map earthquake catalog events from your terminal.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and filter catalog events, print them
    Events(EventsArgs),

    /// Fetch catalog events and emit map marker specs
    Map(MapArgs),
}

/// Arguments for the `events` command.
#[derive(Parser, Debug)]
pub struct EventsArgs {
    /// Catalog window start date, YYYY-MM-DD (default: 30 days before end)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Catalog window end date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Minimum magnitude requested from the catalog
    #[arg(long, default_value = "2.5")]
    pub feed_floor: f64,

    /// Bounding box applied at fetch time: minlat,minlon,maxlat,maxlon
    #[arg(long, value_parser = parse_bbox)]
    pub bbox: Option<BBox>,

    /// Magnitude floor applied to the fetched table (inclusive)
    #[arg(long, default_value = "4.0")]
    pub min_magnitude: f64,

    /// First year of the inclusive range (default: earliest in table)
    #[arg(long)]
    pub year_start: Option<i32>,

    /// Last year of the inclusive range (default: latest in table)
    #[arg(long)]
    pub year_end: Option<i32>,

    /// Maximum number of rows to emit
    #[arg(long, short = 'n', default_value = "200")]
    pub limit: usize,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `map` command.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Catalog window start date, YYYY-MM-DD (default: 30 days before end)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Catalog window end date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Minimum magnitude requested from the catalog
    #[arg(long, default_value = "2.5")]
    pub feed_floor: f64,

    /// Bounding box applied at fetch time: minlat,minlon,maxlat,maxlon
    #[arg(long, value_parser = parse_bbox)]
    pub bbox: Option<BBox>,

    /// Magnitude floor applied to the fetched table (inclusive)
    #[arg(long, default_value = "4.0")]
    pub min_magnitude: f64,

    /// First year of the inclusive range (default: earliest in table)
    #[arg(long)]
    pub year_start: Option<i32>,

    /// Last year of the inclusive range (default: latest in table)
    #[arg(long)]
    pub year_end: Option<i32>,

    /// Depth below which events count as shallow (km)
    #[arg(long, default_value = "15.0")]
    pub shallow_max: f64,

    /// Depth below which events count as intermediate (km)
    #[arg(long, default_value = "70.0")]
    pub intermediate_max: f64,

    /// Maximum number of markers to emit
    #[arg(long, short = 'n', default_value = "200")]
    pub limit: usize,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a calendar date from string.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a bounding box from string.
fn parse_bbox(s: &str) -> Result<BBox, String> {
    s.parse()
}
