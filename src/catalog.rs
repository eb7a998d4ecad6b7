//! Event table built from catalog CSV responses.
//!
//! Rows are resolved by column NAME, not position, so a reordered
//! header still parses. Rows that fail validation are dropped
//! individually; the table keeps whatever survived.

use chrono::{DateTime, Datelike, Utc};
use csv::StringRecord;
use tracing::debug;

use crate::errors::QuakemapError;

/// A single validated earthquake event.
///
/// The calendar year is always derived from `occurred_at`; there is no
/// stored year field that could drift out of sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicEvent {
    /// WGS84 latitude, degrees, within [-90, 90].
    pub latitude: f64,
    /// WGS84 longitude, degrees, within [-180, 180].
    pub longitude: f64,
    /// Event magnitude.
    pub magnitude: f64,
    /// Hypocenter depth in kilometers, non-negative.
    pub depth_km: f64,
    /// Source event time.
    pub occurred_at: DateTime<Utc>,
    /// Free-text place description. Advisory only, never parsed.
    pub place_label: String,
    /// Remaining columns carried verbatim as (header, value) pairs.
    pub extra: Vec<(String, String)>,
}

impl SeismicEvent {
    /// UTC calendar year of the event.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.occurred_at.year()
    }

    /// Build an event from one CSV record, or `None` if the row is invalid.
    ///
    /// A row is invalid when any of latitude, longitude, magnitude, or
    /// depth is absent or fails to parse as a finite number, when the
    /// coordinates fall outside plausible WGS84 ranges, when the depth is
    /// negative, or when the timestamp does not parse.
    fn from_record(
        columns: &ColumnIndex,
        headers: &StringRecord,
        record: &StringRecord,
    ) -> Option<Self> {
        let latitude = parse_finite(record.get(columns.latitude)?)?;
        let longitude = parse_finite(record.get(columns.longitude)?)?;
        let magnitude = parse_finite(record.get(columns.mag)?)?;
        let depth_km = parse_finite(record.get(columns.depth)?)?;

        if !(-90.0..=90.0).contains(&latitude) {
            return None;
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        if depth_km < 0.0 {
            return None;
        }

        let occurred_at = DateTime::parse_from_rfc3339(record.get(columns.time)?.trim())
            .ok()?
            .with_timezone(&Utc);

        let place_label = columns
            .place
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();

        let extra = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| !columns.is_core(*i))
            .map(|(_, (h, v))| (h.to_string(), v.to_string()))
            .collect();

        Some(Self {
            latitude,
            longitude,
            magnitude,
            depth_km,
            occurred_at,
            place_label,
            extra,
        })
    }
}

/// Parse a field as a finite float, rejecting blanks and NaN/inf.
fn parse_finite(field: &str) -> Option<f64> {
    let value: f64 = field.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Positions of the required columns within the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    time: usize,
    latitude: usize,
    longitude: usize,
    depth: usize,
    mag: usize,
    place: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, QuakemapError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(QuakemapError::MissingColumn(name))
        };

        Ok(Self {
            time: find("time")?,
            latitude: find("latitude")?,
            longitude: find("longitude")?,
            depth: find("depth")?,
            mag: find("mag")?,
            place: headers.iter().position(|h| h.trim() == "place"),
        })
    }

    /// Whether a column position holds one of the typed core fields.
    fn is_core(&self, index: usize) -> bool {
        index == self.time
            || index == self.latitude
            || index == self.longitude
            || index == self.depth
            || index == self.mag
            || self.place == Some(index)
    }
}

/// Immutable, ordered collection of validated events.
///
/// Built once per successful fetch and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    events: Vec<SeismicEvent>,
}

impl EventTable {
    /// Create a table with no events (the fetch-failure fallback state).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a CSV catalog response.
    ///
    /// A header with zero data rows is valid and yields an empty table.
    /// Individual malformed rows are dropped; the whole parse only fails
    /// when a required column is missing from the header.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is absent.
    pub fn from_csv(body: &str) -> Result<Self, QuakemapError> {
        if body.trim().is_empty() {
            return Ok(Self::empty());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut events = Vec::new();
        let mut dropped = 0usize;

        for record in reader.records() {
            let Ok(record) = record else {
                dropped += 1;
                continue;
            };

            match SeismicEvent::from_record(&columns, &headers, &record) {
                Some(event) => events.push(event),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!("dropped {dropped} invalid catalog rows");
        }
        debug!("built event table with {} events", events.len());

        Ok(Self { events })
    }

    /// All events, in catalog order.
    #[must_use]
    pub fn events(&self) -> &[SeismicEvent] {
        &self.events
    }

    /// Number of events in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the table holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Earliest and latest event years, or `None` for an empty table.
    ///
    /// Hosts use this to bound their year-range controls.
    #[must_use]
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut span: Option<(i32, i32)> = None;
        for event in &self.events {
            let year = event.year();
            span = Some(match span {
                None => (year, year),
                Some((lo, hi)) => (lo.min(year), hi.max(year)),
            });
        }
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../tools/sample_query.csv");

    #[test]
    fn test_parse_sample_catalog() {
        let table = EventTable::from_csv(SAMPLE).expect("failed to parse sample");

        // 7 data rows, 2 invalid (missing latitude, non-numeric mag)
        assert_eq!(table.len(), 5);

        for event in table.events() {
            assert!((-90.0..=90.0).contains(&event.latitude));
            assert!((-180.0..=180.0).contains(&event.longitude));
            assert!(event.depth_km >= 0.0);
        }
    }

    #[test]
    fn test_year_derived_from_timestamp() {
        let table = EventTable::from_csv(SAMPLE).unwrap();

        let first = &table.events()[0];
        assert_eq!(first.year(), first.occurred_at.year());
        assert_eq!(table.year_span(), Some((2024, 2025)));
    }

    #[test]
    fn test_header_only_input_is_valid() {
        let table = EventTable::from_csv("time,latitude,longitude,depth,mag,place\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.year_span(), None);
    }

    #[test]
    fn test_blank_body_yields_empty_table() {
        let table = EventTable::from_csv("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_required_column() {
        let result = EventTable::from_csv("time,latitude,longitude,depth,place\n");
        assert!(matches!(result, Err(QuakemapError::MissingColumn("mag"))));
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let csv = "mag,place,time,depth,longitude,latitude\n\
                   5.5,\"Taiwan region\",2024-04-03T00:58:11.000Z,34.8,121.56,23.82\n";
        let table = EventTable::from_csv(csv).unwrap();

        assert_eq!(table.len(), 1);
        let event = &table.events()[0];
        assert!((event.magnitude - 5.5).abs() < f64::EPSILON);
        assert!((event.latitude - 23.82).abs() < f64::EPSILON);
        assert_eq!(event.year(), 2024);
    }

    #[test]
    fn test_row_with_missing_field_is_dropped() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2025-01-01T00:00:00.000Z,24.0,121.5,10.0,4.5,A\n\
                   2025-01-02T00:00:00.000Z,,121.5,10.0,4.5,B\n";
        let table = EventTable::from_csv(csv).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.events()[0].place_label, "A");
    }

    #[test]
    fn test_out_of_range_coordinates_dropped() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2025-01-01T00:00:00.000Z,95.0,121.5,10.0,4.5,A\n\
                   2025-01-01T00:00:00.000Z,24.0,181.5,10.0,4.5,B\n\
                   2025-01-01T00:00:00.000Z,24.0,121.5,-5.0,4.5,C\n";
        let table = EventTable::from_csv(csv).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_extra_columns_retained_verbatim() {
        let table = EventTable::from_csv(SAMPLE).unwrap();
        let event = &table.events()[0];

        let status = event
            .extra
            .iter()
            .find(|(h, _)| h == "status")
            .map(|(_, v)| v.as_str());
        assert_eq!(status, Some("reviewed"));
    }
}
