//! Marker construction for the map rendering surface.
//!
//! Each retained event becomes one circle marker: radius grows with
//! magnitude, color comes from a fixed depth banding, and the tooltip
//! carries place, year, magnitude, and depth. The marker sequence is
//! rebuilt fresh on every call; nothing here holds cursor state.

use serde::Serialize;

use crate::catalog::SeismicEvent;
use crate::filters::FilteredView;

/// Display scaling constant for marker radii.
const RADIUS_SCALE: f64 = 0.5;

/// Dot size at magnitude zero; shrinks smoothly below it.
const MIN_RADIUS: f64 = 1.0;

/// Depth classification used only for color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthBand {
    Shallow,
    Intermediate,
    Deep,
}

impl DepthBand {
    /// Fixed display color for this band.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Shallow => "red",
            Self::Intermediate => "orange",
            Self::Deep => "blue",
        }
    }
}

/// Band boundaries in kilometers. Configuration, never derived from data.
#[derive(Debug, Clone, Copy)]
pub struct DepthBands {
    /// Depths strictly below this are shallow.
    pub shallow_max_km: f64,
    /// Depths strictly below this (and not shallow) are intermediate.
    pub intermediate_max_km: f64,
}

impl Default for DepthBands {
    fn default() -> Self {
        Self {
            shallow_max_km: 15.0,
            intermediate_max_km: 70.0,
        }
    }
}

impl DepthBands {
    /// Classify a depth into its band.
    #[must_use]
    pub fn classify(&self, depth_km: f64) -> DepthBand {
        if depth_km < self.shallow_max_km {
            DepthBand::Shallow
        } else if depth_km < self.intermediate_max_km {
            DepthBand::Intermediate
        } else {
            DepthBand::Deep
        }
    }
}

/// One renderable circle marker, the unit handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub latitude: f64,
    pub longitude: f64,
    /// Display radius, convex in magnitude.
    pub radius: f64,
    /// Fixed color name from the depth band.
    pub color: &'static str,
    /// Place, year, magnitude, and depth, formatted for display.
    pub tooltip: String,
}

impl MarkerSpec {
    /// Build the marker for one event.
    #[must_use]
    pub fn for_event(event: &SeismicEvent, bands: DepthBands) -> Self {
        Self {
            latitude: event.latitude,
            longitude: event.longitude,
            radius: radius_for(event.magnitude),
            color: bands.classify(event.depth_km).color(),
            tooltip: tooltip(event),
        }
    }
}

/// Display radius for a magnitude.
///
/// Quadratic above magnitude zero so large events stand out, plus a
/// base dot size that decays exponentially below zero. Strictly
/// increasing over all magnitudes, including the sub-zero values
/// catalogs occasionally report, and always positive.
#[must_use]
pub fn radius_for(magnitude: f64) -> f64 {
    RADIUS_SCALE * magnitude.max(0.0).powi(2) + MIN_RADIUS * magnitude.min(0.0).exp()
}

/// Tooltip text carrying all four display fields.
fn tooltip(event: &SeismicEvent) -> String {
    let place = if event.place_label.is_empty() {
        "Unknown location"
    } else {
        event.place_label.as_str()
    };

    format!(
        "{place} | {} | M{:.1} | {:.0} km",
        event.year(),
        event.magnitude,
        event.depth_km
    )
}

/// Markers for every event in a view, lazily and in view order.
///
/// Returns a fresh iterator per call; callers may restart by calling again.
pub fn markers<'v>(
    view: &'v FilteredView<'_>,
    bands: DepthBands,
) -> impl Iterator<Item = MarkerSpec> + 'v {
    view.events()
        .iter()
        .map(move |event| MarkerSpec::for_event(event, bands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EventTable;
    use crate::filters::{filter, FilterParams};

    #[test]
    fn test_radius_grows_with_magnitude() {
        let magnitudes = [-1.2, -0.5, -0.2, 0.0, 0.5, 1.0, 2.5, 4.0, 5.5, 7.0, 9.0];
        for pair in magnitudes.windows(2) {
            assert!(
                radius_for(pair[1]) > radius_for(pair[0]),
                "radius not increasing between M{} and M{}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_radius_stays_positive_for_negative_magnitudes() {
        for magnitude in [-3.0, -1.0, -0.1] {
            assert!(radius_for(magnitude) > 0.0);
        }
    }

    #[test]
    fn test_depth_bands() {
        let bands = DepthBands::default();

        assert_eq!(bands.classify(0.0), DepthBand::Shallow);
        assert_eq!(bands.classify(14.9), DepthBand::Shallow);
        assert_eq!(bands.classify(15.0), DepthBand::Intermediate);
        assert_eq!(bands.classify(69.9), DepthBand::Intermediate);
        assert_eq!(bands.classify(70.0), DepthBand::Deep);
        assert_eq!(bands.classify(600.0), DepthBand::Deep);
    }

    #[test]
    fn test_band_colors_are_distinct() {
        let colors = [
            DepthBand::Shallow.color(),
            DepthBand::Intermediate.color(),
            DepthBand::Deep.color(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_concrete_filter_and_marker_scenario() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2020-03-15T08:00:00.000Z,24.0,121.5,10,5.0,X\n\
                   2019-11-02T21:30:00.000Z,23.5,121.0,200,3.0,Y\n";
        let table = EventTable::from_csv(csv).unwrap();

        let params = FilterParams {
            min_magnitude: 4.0,
            year_start: 2020,
            year_end: 2020,
        };
        let view = filter(&table, &params);
        assert_eq!(view.len(), 1);

        let specs: Vec<MarkerSpec> = markers(&view, DepthBands::default()).collect();
        assert_eq!(specs.len(), 1);

        let marker = &specs[0];
        assert_eq!(marker.color, DepthBand::Shallow.color());
        assert!(marker.tooltip.contains('X'));
        assert!(marker.tooltip.contains("2020"));
        assert!(marker.tooltip.contains("5.0"));
        assert!(marker.tooltip.contains("10"));
    }

    #[test]
    fn test_marker_sequence_restarts_fresh() {
        let csv = "time,latitude,longitude,depth,mag,place\n\
                   2025-01-01T00:00:00.000Z,24.0,121.5,12,4.5,A\n\
                   2025-01-02T00:00:00.000Z,24.2,121.6,80,5.5,B\n";
        let table = EventTable::from_csv(csv).unwrap();
        let params = FilterParams {
            min_magnitude: 0.0,
            year_start: 2025,
            year_end: 2025,
        };
        let view = filter(&table, &params);

        let first: Vec<MarkerSpec> = markers(&view, DepthBands::default()).collect();
        let second: Vec<MarkerSpec> = markers(&view, DepthBands::default()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_empty_view_yields_no_markers() {
        let empty = EventTable::empty();
        let view = filter(
            &empty,
            &FilterParams {
                min_magnitude: 4.0,
                year_start: 2020,
                year_end: 2025,
            },
        );

        assert_eq!(markers(&view, DepthBands::default()).count(), 0);
    }
}
