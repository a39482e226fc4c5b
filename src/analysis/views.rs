/// View models for the dashboard's reactive outputs.
///
/// The page has three inputs: a year, a set of EF scales, and the state
/// last clicked on the map. Each output is a pure function of
/// (`&Dashboard`, `&FilterState`) that reads only the inputs it depends on:
///
/// | view         | year | scales | location |
/// |--------------|------|--------|----------|
/// | map points   |  ✓   |   ✓    |          |
/// | choropleth   |  ✓   |   ✓    |          |
/// | trend        |      |   ✓    |    ✓     |
/// | severity     |      |        |    ✓     |
///
/// With no location selected, trend and severity fall back to national
/// totals. A location with no matching rows produces a view with an explicit
/// `message` and empty series instead of an error. Nothing is cached; every
/// call recomputes from the aggregate tables.

use serde::Serialize;

use crate::analysis::groupings::{national_by_year, totals_by_severity};
use crate::dashboard::Dashboard;
use crate::model::{ScaleSelection, Severity};

/// Label used when no state is selected.
pub const NATIONAL_LABEL: &str = "United States";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Current values of the dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Selected year; `None` only when the dataset has no years at all.
    pub year: Option<i32>,
    pub scales: ScaleSelection,
    /// Postal code of the clicked state; `None` means national.
    pub location: Option<String>,
}

impl FilterState {
    /// Initial control values: latest year, all scales, no location.
    pub fn initial(dashboard: &Dashboard) -> Self {
        Self {
            year: dashboard.default_year(),
            scales: ScaleSelection::all(),
            location: None,
        }
    }

    /// Sets the location from a map click. Codes are trimmed and
    /// upper-cased; a blank value clears the selection.
    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location
            .map(|l| l.trim().to_uppercase())
            .filter(|l| !l.is_empty());
        self
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleOption {
    pub label: &'static str,
    pub rank: u8,
}

/// Options for the year dropdown and scale checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub years: Vec<i32>,
    pub default_year: Option<i32>,
    pub scales: Vec<ScaleOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: Option<Severity>,
    pub rank: Option<u8>,
    pub begin: String,
}

/// Touchdown points for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub year: Option<i32>,
    pub title: String,
    pub points: Vec<MapPoint>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    pub state_abbrev: String,
    pub state: String,
    pub count: usize,
}

/// Per-state counts for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethView {
    pub year: Option<i32>,
    pub title: String,
    pub regions: Vec<RegionCount>,
    pub max_count: usize,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Counts per year for a state, or nationally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub location: Option<String>,
    pub label: String,
    pub title: String,
    pub points: Vec<YearCount>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub rank: u8,
    pub count: usize,
}

/// Counts per EF rating for a state, or nationally, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityView {
    pub location: Option<String>,
    pub label: String,
    pub title: String,
    pub buckets: Vec<SeverityCount>,
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// View functions
// ---------------------------------------------------------------------------

pub fn controls_view(dashboard: &Dashboard) -> ControlsView {
    ControlsView {
        years: dashboard.years().to_vec(),
        default_year: dashboard.default_year(),
        scales: Severity::ALL
            .iter()
            .map(|s| ScaleOption { label: s.as_str(), rank: s.rank() })
            .collect(),
    }
}

fn no_year_message(year: Option<i32>) -> String {
    match year {
        Some(y) => format!("No tornado data for {}.", y),
        None => "No tornado data available.".to_string(),
    }
}

/// Touchdown points for the selected year and scales. Events without
/// coordinates or without a resolved state are not plotted.
pub fn map_view(dashboard: &Dashboard, filter: &FilterState) -> MapView {
    let points: Vec<MapPoint> = match filter.year {
        Some(year) => dashboard
            .events()
            .iter()
            .filter(|e| e.year == year && filter.scales.admits(e.severity))
            .filter_map(|e| {
                let coords = e.coordinates?;
                Some(MapPoint {
                    state: e.state.clone()?,
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                    severity: e.severity,
                    rank: e.severity.map(|s| s.rank()),
                    begin: e.begin.format("%Y-%m-%d %H:%M").to_string(),
                })
            })
            .collect(),
        None => Vec::new(),
    };

    let title = match filter.year {
        Some(year) => format!("Tornado Locations in {}", year),
        None => "Tornado Locations".to_string(),
    };
    let message = points.is_empty().then(|| no_year_message(filter.year));

    MapView { year: filter.year, title, points, message }
}

/// Per-state counts for the selected year and scales.
pub fn choropleth_view(dashboard: &Dashboard, filter: &FilterState) -> ChoroplethView {
    let regions: Vec<RegionCount> = match filter.year {
        Some(year) => dashboard
            .counts_for(&filter.scales)
            .into_iter()
            .filter(|row| row.year == year)
            .map(|row| RegionCount {
                state: dashboard.label_for(&row.state),
                state_abbrev: row.state,
                count: row.count,
            })
            .collect(),
        None => Vec::new(),
    };

    let title = match filter.year {
        Some(year) => format!("Tornado Count by State in {}", year),
        None => "Tornado Count by State".to_string(),
    };
    let max_count = regions.iter().map(|r| r.count).max().unwrap_or(0);
    let message = regions.is_empty().then(|| no_year_message(filter.year));

    ChoroplethView { year: filter.year, title, regions, max_count, message }
}

/// Resolves the location to (code, label); national when unset.
fn location_label(dashboard: &Dashboard, filter: &FilterState) -> (Option<String>, String) {
    match filter.location.as_deref() {
        Some(code) => (Some(code.to_string()), dashboard.label_for(code)),
        None => (None, NATIONAL_LABEL.to_string()),
    }
}

/// Yearly counts for the selected location (or nationally) and scales.
/// Every available year appears, with zero where the location had none.
pub fn trend_view(dashboard: &Dashboard, filter: &FilterState) -> TrendView {
    let (location, label) = location_label(dashboard, filter);

    let rows: Vec<_> = dashboard
        .counts_for(&filter.scales)
        .into_iter()
        .filter(|row| location.as_deref().is_none_or(|code| row.state == code))
        .collect();
    let totals = national_by_year(&rows);
    let total: usize = totals.values().sum();

    let title = format!("Tornado Counts Over the Years for {}", label);
    if total == 0 {
        return TrendView {
            location,
            message: Some(format!("No tornado data found for {}.", label)),
            label,
            title,
            points: Vec::new(),
        };
    }

    let points = dashboard
        .years()
        .iter()
        .map(|&year| YearCount { year, count: totals.get(&year).copied().unwrap_or(0) })
        .collect();

    TrendView { location, label, title, points, message: None }
}

/// Counts per EF rating for the selected location (or nationally) over
/// all years and all six ratings. The scale selection is not applied.
pub fn severity_view(dashboard: &Dashboard, filter: &FilterState) -> SeverityView {
    let (location, label) = location_label(dashboard, filter);

    let totals = totals_by_severity(
        dashboard
            .state_year_severity()
            .iter()
            .filter(|row| location.as_deref().is_none_or(|code| row.state == code)),
    );

    let buckets: Vec<SeverityCount> = totals
        .into_iter()
        .map(|(severity, count)| SeverityCount { severity, rank: severity.rank(), count })
        .collect();

    let title = format!("Tornado Severity Distribution for {}", label);
    let message = buckets
        .is_empty()
        .then(|| format!("No tornado data found for {}.", label));

    SeverityView { location, label, title, buckets, message }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    fn dashboard() -> Dashboard {
        Dashboard::from_reader(fixture_multi_state_csv().as_bytes(), 5).expect("fixture should load")
    }

    fn year_counts(view: &TrendView) -> Vec<(i32, usize)> {
        view.points.iter().map(|p| (p.year, p.count)).collect()
    }

    #[test]
    fn test_initial_filter_state() {
        let d = dashboard();
        let filter = FilterState::initial(&d);
        assert_eq!(filter.year, Some(2002));
        assert_eq!(filter.scales, ScaleSelection::all());
        assert_eq!(filter.location, None);
    }

    #[test]
    fn test_with_location_normalizes_code() {
        let d = dashboard();
        let filter = FilterState::initial(&d).with_location(Some(" tx "));
        assert_eq!(filter.location.as_deref(), Some("TX"));
        let cleared = filter.with_location(Some(""));
        assert_eq!(cleared.location, None);
    }

    #[test]
    fn test_controls_list_scales_in_rank_order() {
        let controls = controls_view(&dashboard());
        assert_eq!(controls.years, vec![2001, 2002]);
        assert_eq!(controls.default_year, Some(2002));
        let labels: Vec<_> = controls.scales.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["EF0", "EF1", "EF2", "EF3", "EF4", "EF5"]);
    }

    #[test]
    fn test_map_view_filters_year_scales_and_missing_coordinates() {
        let d = dashboard();
        let filter = FilterState::initial(&d);
        let view = map_view(&d, &filter);

        // 2002 rated with coordinates and a resolved state: TX EF1, OK EF4 x2
        assert_eq!(view.points.len(), 3);
        assert!(view.points.iter().all(|p| p.state != "KS"));
        assert_eq!(view.title, "Tornado Locations in 2002");
        assert!(view.message.is_none());

        let strong = FilterState { scales: ScaleSelection::only(&[Severity::EF4]), ..filter };
        let view = map_view(&d, &strong);
        assert_eq!(view.points.len(), 2);
        assert!(view.points.iter().all(|p| p.rank == Some(4)));
    }

    #[test]
    fn test_map_view_ignores_location() {
        let d = dashboard();
        let national = FilterState::initial(&d);
        let clicked = national.clone().with_location(Some("OK"));
        assert_eq!(map_view(&d, &national), map_view(&d, &clicked));
        assert_eq!(choropleth_view(&d, &national), choropleth_view(&d, &clicked));
    }

    #[test]
    fn test_choropleth_counts_per_state() {
        let d = dashboard();
        let view = choropleth_view(&d, &FilterState::initial(&d));
        let counts: Vec<_> = view
            .regions
            .iter()
            .map(|r| (r.state_abbrev.as_str(), r.count))
            .collect();
        assert_eq!(counts, vec![("KS", 1), ("OK", 2), ("TX", 1)]);
        assert_eq!(view.max_count, 2);
        assert_eq!(view.regions[1].state, "Oklahoma");
        assert_eq!(view.title, "Tornado Count by State in 2002");
    }

    #[test]
    fn test_choropleth_empty_selection_has_message() {
        let d = dashboard();
        let filter = FilterState {
            scales: ScaleSelection::only(&[Severity::EF5]),
            ..FilterState::initial(&d)
        };
        let view = choropleth_view(&d, &filter);
        assert!(view.regions.is_empty());
        assert_eq!(view.message.as_deref(), Some("No tornado data for 2002."));
    }

    #[test]
    fn test_trend_without_click_is_national() {
        let d = dashboard();
        let view = trend_view(&d, &FilterState::initial(&d));
        assert_eq!(view.location, None);
        assert_eq!(view.label, NATIONAL_LABEL);
        assert_eq!(year_counts(&view), vec![(2001, 4), (2002, 4)]);
        assert_eq!(view.title, "Tornado Counts Over the Years for United States");
    }

    #[test]
    fn test_trend_ignores_selected_year() {
        let d = dashboard();
        let latest = FilterState::initial(&d);
        let earlier = FilterState { year: Some(2001), ..latest.clone() };
        assert_eq!(trend_view(&d, &latest), trend_view(&d, &earlier));
    }

    #[test]
    fn test_trend_for_state_zero_fills_years() {
        let d = dashboard();
        let filter = FilterState::initial(&d).with_location(Some("KS"));
        let view = trend_view(&d, &filter);
        assert_eq!(view.label, "Kansas");
        assert_eq!(year_counts(&view), vec![(2001, 0), (2002, 1)]);
    }

    #[test]
    fn test_trend_applies_scale_selection() {
        let d = dashboard();
        let filter = FilterState {
            scales: ScaleSelection::only(&[Severity::EF2]),
            ..FilterState::initial(&d)
        };
        assert_eq!(year_counts(&trend_view(&d, &filter)), vec![(2001, 2), (2002, 0)]);
    }

    #[test]
    fn test_trend_unknown_state_reports_no_data() {
        let d = dashboard();
        let filter = FilterState::initial(&d).with_location(Some("ZZ"));
        let view = trend_view(&d, &filter);
        assert_eq!(view.label, "ZZ");
        assert!(view.points.is_empty());
        assert_eq!(view.message.as_deref(), Some("No tornado data found for ZZ."));
    }

    #[test]
    fn test_severity_view_in_rank_order() {
        let d = dashboard();
        let view = severity_view(&d, &FilterState::initial(&d).with_location(Some("TX")));
        let buckets: Vec<_> = view.buckets.iter().map(|b| (b.severity, b.count)).collect();
        assert_eq!(
            buckets,
            vec![(Severity::EF0, 1), (Severity::EF1, 1), (Severity::EF2, 2)]
        );
        assert_eq!(view.title, "Tornado Severity Distribution for Texas");
    }

    #[test]
    fn test_severity_view_does_not_apply_scale_selection() {
        let d = dashboard();
        let all = FilterState::initial(&d);
        let narrowed = FilterState { scales: ScaleSelection::only(&[Severity::EF4]), ..all.clone() };
        assert_eq!(severity_view(&d, &all), severity_view(&d, &narrowed));
        assert_eq!(severity_view(&d, &all).buckets.len(), 5);
    }

    #[test]
    fn test_severity_view_no_data_message() {
        let d = dashboard();
        let view = severity_view(&d, &FilterState::initial(&d).with_location(Some("VT")));
        assert!(view.buckets.is_empty());
        assert_eq!(view.message.as_deref(), Some("No tornado data found for VT."));
    }
}
