/// Aggregate tables over normalized tornado events.
///
/// `aggregate_state_year` and `aggregate_state_year_severity` take the flat
/// event list produced by the ingest layer and count events per
/// (state, year) and per (state, year, severity). The views never look at
/// raw events for counts; they reduce these tables instead.
///
/// Events without a resolved state are dropped here, never zero-filled.
/// Events without a valid rating are dropped from the severity table and,
/// whenever a `ScaleSelection::Scales` is in force, from the state/year
/// table as well. That keeps the two tables consistent: for any selection
/// of scales, summing the severity table over severity reproduces the
/// state/year table.
///
/// All functions are pure, and output rows come back sorted by their key
/// (severity in rank order), so repeated runs give identical results.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ScaleSelection, Severity, TornadoEvent};
use crate::states::StateTable;

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// (state, year) → count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateYearCount {
    pub state: String,
    pub year: i32,
    pub count: usize,
}

/// (state, year, severity) → count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateYearSeverityCount {
    pub state: String,
    pub year: i32,
    pub severity: Severity,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Counts events per (state, year) for the events `selection` admits.
pub fn aggregate_state_year(events: &[TornadoEvent], selection: &ScaleSelection) -> Vec<StateYearCount> {
    let mut grouped: BTreeMap<(&str, i32), usize> = BTreeMap::new();

    for event in events {
        let Some(state) = event.state.as_deref() else {
            continue;
        };
        if !selection.admits(event.severity) {
            continue;
        }
        *grouped.entry((state, event.year)).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|((state, year), count)| StateYearCount {
            state: state.to_string(),
            year,
            count,
        })
        .collect()
}

/// Counts rated events per (state, year, severity) for the events
/// `selection` admits. Unrated events are always excluded.
pub fn aggregate_state_year_severity(
    events: &[TornadoEvent],
    selection: &ScaleSelection,
) -> Vec<StateYearSeverityCount> {
    let mut grouped: BTreeMap<(&str, i32, Severity), usize> = BTreeMap::new();

    for event in events {
        let (Some(state), Some(severity)) = (event.state.as_deref(), event.severity) else {
            continue;
        };
        if !selection.admits(Some(severity)) {
            continue;
        }
        *grouped.entry((state, event.year, severity)).or_insert(0) += 1;
    }

    grouped
        .into_iter()
        .map(|((state, year, severity), count)| StateYearSeverityCount {
            state: state.to_string(),
            year,
            severity,
            count,
        })
        .collect()
}

/// Collapses the severity table to (state, year) for the scales in
/// `selection`. With `ScaleSelection::Unfiltered` every rated row counts.
pub fn sum_over_severity(
    rows: &[StateYearSeverityCount],
    selection: &ScaleSelection,
) -> Vec<StateYearCount> {
    let mut grouped: BTreeMap<(&str, i32), usize> = BTreeMap::new();

    for row in rows.iter().filter(|r| selection.admits(Some(r.severity))) {
        *grouped.entry((row.state.as_str(), row.year)).or_insert(0) += row.count;
    }

    grouped
        .into_iter()
        .map(|((state, year), count)| StateYearCount {
            state: state.to_string(),
            year,
            count,
        })
        .collect()
}

/// Sums per-state counts into one national count per year.
pub fn national_by_year(rows: &[StateYearCount]) -> BTreeMap<i32, usize> {
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.year).or_insert(0) += row.count;
    }
    totals
}

/// Sums severity rows into one count per severity, in rank order.
pub fn totals_by_severity<'a, I>(rows: I) -> BTreeMap<Severity, usize>
where
    I: IntoIterator<Item = &'a StateYearSeverityCount>,
{
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.severity).or_insert(0) += row.count;
    }
    totals
}

/// Distinct years present in a table, ascending.
pub fn available_years(rows: &[StateYearCount]) -> Vec<i32> {
    rows.iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Display names for the states present in a table, keyed by postal code.
pub fn state_labels(rows: &[StateYearCount], table: &StateTable) -> BTreeMap<String, &'static str> {
    rows.iter()
        .filter_map(|r| table.name_for_abbrev(&r.state).map(|name| (r.state.clone(), name)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
