//! Output formatters for events and markers.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::catalog::SeismicEvent;
use crate::markers::MarkerSpec;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Magnitude severity colors
const RED: &str = "\x1b[91m"; // mag >= 7.0
const YELLOW: &str = "\x1b[93m"; // mag >= 6.0
const CYAN: &str = "\x1b[96m"; // mag >= 4.5
const GREEN: &str = "\x1b[92m"; // mag >= 3.0
const WHITE: &str = "\x1b[97m"; // mag < 3.0

// Marker color names to ANSI
const MARKER_RED: &str = "\x1b[91m";
const MARKER_ORANGE: &str = "\x1b[33m";
const MARKER_BLUE: &str = "\x1b[94m";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Get the color code for a magnitude value.
fn magnitude_color(mag: f64) -> &'static str {
    if mag >= 7.0 {
        RED
    } else if mag >= 6.0 {
        YELLOW
    } else if mag >= 4.5 {
        CYAN
    } else if mag >= 3.0 {
        GREEN
    } else {
        WHITE
    }
}

/// Get severity label for magnitude.
fn magnitude_label(mag: f64) -> &'static str {
    if mag >= 7.0 {
        "MAJOR"
    } else if mag >= 6.0 {
        "STRONG"
    } else if mag >= 4.5 {
        "MODERATE"
    } else if mag >= 3.0 {
        "LIGHT"
    } else if mag >= 2.0 {
        "MINOR"
    } else {
        "MICRO"
    }
}

/// ANSI code for a marker color name.
fn marker_color(name: &str) -> &'static str {
    match name {
        "red" => MARKER_RED,
        "orange" => MARKER_ORANGE,
        "blue" => MARKER_BLUE,
        _ => WHITE,
    }
}

/// Normalized event structure for JSON/NDJSON output.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub time: String,
    pub year: i32,
    pub magnitude: f64,
    pub depth_km: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub place: String,
}

impl From<&SeismicEvent> for EventRecord {
    fn from(event: &SeismicEvent) -> Self {
        Self {
            time: event.occurred_at.to_rfc3339(),
            year: event.year(),
            magnitude: event.magnitude,
            depth_km: event.depth_km,
            latitude: event.latitude,
            longitude: event.longitude,
            place: event.place_label.clone(),
        }
    }
}

/// Write events in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events_human<W: Write>(writer: &mut W, events: &[&SeismicEvent]) -> io::Result<()> {
    for event in events {
        let time = event.occurred_at.format("%Y-%m-%d %H:%M:%S");
        let place = if event.place_label.is_empty() {
            "Unknown location"
        } else {
            event.place_label.as_str()
        };

        let color = magnitude_color(event.magnitude);
        let label = magnitude_label(event.magnitude);

        writeln!(
            writer,
            "{color}{BOLD}M{:.1}{RESET} │ \
             {color}{label:8}{RESET} │ \
             {DIM}{:>5.0}km{RESET} │ \
             {time} UTC │ \
             {place}",
            event.magnitude, event.depth_km
        )?;
    }
    Ok(())
}

/// Write events in the specified format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_events<W: Write>(
    writer: &mut W,
    events: &[&SeismicEvent],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_events_human(writer, events),
        Format::Json => {
            let records: Vec<EventRecord> = events.iter().copied().map(EventRecord::from).collect();
            write_json(writer, &records)
        }
        Format::Ndjson => {
            let records = events.iter().copied().map(EventRecord::from);
            write_ndjson(writer, records)
        }
    }
}

/// Write markers in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers_human<W: Write>(writer: &mut W, specs: &[MarkerSpec]) -> io::Result<()> {
    for spec in specs {
        let color = marker_color(spec.color);
        writeln!(
            writer,
            "{color}{BOLD}●{RESET} ({:>8.3}, {:>9.3}) │ \
             {DIM}r={:>5.1}{RESET} │ \
             {color}{:7}{RESET} │ \
             {}",
            spec.latitude, spec.longitude, spec.radius, spec.color, spec.tooltip
        )?;
    }
    Ok(())
}

/// Write markers in the specified format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_markers<W: Write>(
    writer: &mut W,
    specs: &[MarkerSpec],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_markers_human(writer, specs),
        Format::Json => write_json(writer, specs),
        Format::Ndjson => write_ndjson(writer, specs.iter().cloned()),
    }
}

/// Write a slice as a pretty-printed JSON array.
fn write_json<W: Write, S: Serialize>(writer: &mut W, items: &[S]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(items)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write items as newline-delimited JSON, one object per line.
fn write_ndjson<W: Write, S: Serialize>(
    writer: &mut W,
    items: impl Iterator<Item = S>,
) -> io::Result<()> {
    for item in items {
        let json = serde_json::to_string(&item)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}
