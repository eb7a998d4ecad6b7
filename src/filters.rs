//! Magnitude and year-range filtering over the event table.
//!
//! Filtering is a pure projection: the table is never mutated and the
//! view is recomputed from scratch on every parameter change. Both the
//! magnitude floor and the year bounds are inclusive.

use tracing::debug;

use crate::catalog::{EventTable, SeismicEvent};

/// Snapshot of the UI-selected filter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Inclusive magnitude floor. No upper bound.
    pub min_magnitude: f64,
    /// First year of the inclusive range.
    pub year_start: i32,
    /// Last year of the inclusive range.
    pub year_end: i32,
}

impl FilterParams {
    /// Whether an event satisfies the magnitude and year predicates.
    #[must_use]
    pub fn matches(&self, event: &SeismicEvent) -> bool {
        event.magnitude >= self.min_magnitude
            && (self.year_start..=self.year_end).contains(&event.year())
    }
}

/// Subset of an [`EventTable`] matching a parameter snapshot.
///
/// Preserves table insertion order for deterministic output.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    events: Vec<&'a SeismicEvent>,
}

impl<'a> FilteredView<'a> {
    /// Matching events, in table order.
    #[must_use]
    pub fn events(&self) -> &[&'a SeismicEvent] {
        &self.events
    }

    /// Number of matching events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Apply a parameter snapshot to this view again.
    #[must_use]
    pub(crate) fn refine(&self, params: &FilterParams) -> FilteredView<'a> {
        let events = self
            .events
            .iter()
            .copied()
            .filter(|e| params.matches(e))
            .collect();
        FilteredView { events }
    }
}

/// Select the events matching a parameter snapshot.
///
/// An inverted year range (`year_start > year_end`) selects nothing.
/// Filtering an empty table always yields an empty view.
#[must_use]
pub fn filter<'a>(table: &'a EventTable, params: &FilterParams) -> FilteredView<'a> {
    if params.year_start > params.year_end {
        debug!(
            "inverted year range {}..{}, returning empty view",
            params.year_start, params.year_end
        );
        return FilteredView { events: Vec::new() };
    }

    let events = table
        .events()
        .iter()
        .filter(|e| params.matches(e))
        .collect();

    FilteredView { events }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(magnitude: f64, depth_km: f64, year: i32, place: &str) -> SeismicEvent {
        SeismicEvent {
            latitude: 24.0,
            longitude: 121.5,
            magnitude,
            depth_km,
            occurred_at: Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap(),
            place_label: place.to_string(),
            extra: Vec::new(),
        }
    }

    fn table(events: Vec<SeismicEvent>) -> EventTable {
        let mut csv = String::from("time,latitude,longitude,depth,mag,place\n");
        for e in &events {
            csv.push_str(&format!(
                "{},{},{},{},{},\"{}\"\n",
                e.occurred_at.to_rfc3339(),
                e.latitude,
                e.longitude,
                e.depth_km,
                e.magnitude,
                e.place_label
            ));
        }
        EventTable::from_csv(&csv).unwrap()
    }

    fn params(min_magnitude: f64, year_start: i32, year_end: i32) -> FilterParams {
        FilterParams {
            min_magnitude,
            year_start,
            year_end,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let t = table(vec![
            event(4.0, 10.0, 2020, "at-floor"),
            event(3.9, 10.0, 2020, "below-floor"),
            event(5.0, 10.0, 2021, "at-year-end"),
            event(5.0, 10.0, 2022, "past-year-end"),
        ]);

        let view = filter(&t, &params(4.0, 2020, 2021));
        let places: Vec<&str> = view.events().iter().map(|e| e.place_label.as_str()).collect();
        assert_eq!(places, vec!["at-floor", "at-year-end"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let t = table(vec![
            event(5.0, 10.0, 2020, "a"),
            event(3.0, 200.0, 2019, "b"),
            event(6.1, 40.0, 2020, "c"),
        ]);
        let p = params(4.0, 2019, 2020);

        let once = filter(&t, &p);
        let twice = once.refine(&p);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_raising_floor_never_grows_view() {
        let t = table(vec![
            event(2.5, 10.0, 2020, "a"),
            event(4.0, 10.0, 2020, "b"),
            event(5.5, 10.0, 2020, "c"),
            event(7.2, 10.0, 2020, "d"),
        ]);

        let mut previous = usize::MAX;
        for floor in [2.0, 3.0, 4.0, 5.0, 6.0, 8.0] {
            let size = filter(&t, &params(floor, 2020, 2020)).len();
            assert!(size <= previous, "floor {floor} grew the view");
            previous = size;
        }
    }

    #[test]
    fn test_empty_table_yields_empty_view() {
        let empty = EventTable::empty();
        let view = filter(&empty, &params(4.0, 2019, 2025));
        assert!(view.is_empty());
    }

    #[test]
    fn test_inverted_year_range_selects_nothing() {
        let t = table(vec![event(5.0, 10.0, 2020, "a")]);
        let view = filter(&t, &params(0.0, 2021, 2019));
        assert!(view.is_empty());
    }

    #[test]
    fn test_order_follows_table_insertion() {
        let t = table(vec![
            event(6.0, 10.0, 2020, "first"),
            event(5.0, 10.0, 2020, "second"),
            event(7.0, 10.0, 2020, "third"),
        ]);

        let view = filter(&t, &params(4.0, 2020, 2020));
        let places: Vec<&str> = view.events().iter().map(|e| e.place_label.as_str()).collect();
        assert_eq!(places, vec!["first", "second", "third"]);
    }
}
