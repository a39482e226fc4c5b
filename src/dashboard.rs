/// Startup data preparation for the dashboard service.
///
/// `Dashboard::prepare` runs once, before the HTTP surface starts:
/// 1. Ensures the dataset is on disk (downloading it if configured)
/// 2. Streams the CSV in batches and keeps normalized tornado events
/// 3. Builds the aggregate tables the views reduce
/// 4. Derives the year list and state labels for the controls
///
/// The resulting `Dashboard` is immutable. Request handlers share it
/// behind an `Arc` and never write to it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use tracing::info;

use crate::analysis::groupings::{
    self, StateYearCount, StateYearSeverityCount,
};
use crate::config::DashboardConfig;
use crate::ingest::fetch;
use crate::ingest::storm_events::{self, IngestReport, Ingested};
use crate::model::{DataError, ScaleSelection, TornadoEvent};
use crate::states::StateTable;

/// One record of the `/tornado-data` export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Full state name.
    #[serde(rename = "STATE")]
    pub state: String,
    pub year: i32,
    pub tornado_count: usize,
    pub state_abbrev: String,
}

/// In-memory tables backing every view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    events: Vec<TornadoEvent>,
    report: IngestReport,
    /// Every state-resolved event, rated or not.
    state_year: Vec<StateYearCount>,
    /// Every state-resolved, rated event.
    state_year_severity: Vec<StateYearSeverityCount>,
    labels: BTreeMap<String, &'static str>,
    years: Vec<i32>,
}

impl Dashboard {
    /// Runs the full startup pipeline for `config`.
    pub fn prepare(config: &DashboardConfig) -> Result<Self, DataError> {
        fetch::ensure_dataset(config)?;
        let states = StateTable::new();
        let ingested = storm_events::ingest_file(&config.data_path, config.batch_size, &states)?;
        Ok(Self::from_ingested(ingested, &states))
    }

    /// Builds a dashboard from any CSV source; used by tools and tests.
    pub fn from_reader<R: Read>(reader: R, batch_size: usize) -> Result<Self, DataError> {
        let states = StateTable::new();
        let ingested = storm_events::ingest_reader(reader, batch_size, &states)?;
        Ok(Self::from_ingested(ingested, &states))
    }

    /// Builds the aggregate tables; `states` supplies the display names.
    pub fn from_ingested(ingested: Ingested, states: &StateTable) -> Self {
        let Ingested { events, report } = ingested;

        let state_year = groupings::aggregate_state_year(&events, &ScaleSelection::Unfiltered);
        let state_year_severity =
            groupings::aggregate_state_year_severity(&events, &ScaleSelection::Unfiltered);
        let labels = groupings::state_labels(&state_year, states);
        let years = groupings::available_years(&state_year);

        info!(
            events = events.len(),
            state_year_rows = state_year.len(),
            severity_rows = state_year_severity.len(),
            first_year = years.first().copied(),
            last_year = years.last().copied(),
            "Aggregates built"
        );

        Self {
            events,
            report,
            state_year,
            state_year_severity,
            labels,
            years,
        }
    }

    pub fn events(&self) -> &[TornadoEvent] {
        &self.events
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn state_year(&self) -> &[StateYearCount] {
        &self.state_year
    }

    pub fn state_year_severity(&self) -> &[StateYearSeverityCount] {
        &self.state_year_severity
    }

    /// Years with at least one state-resolved event, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Most recent year with data.
    pub fn default_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// (state, year) counts for a scale selection, reduced from the
    /// aggregate tables.
    pub fn counts_for(&self, selection: &ScaleSelection) -> Vec<StateYearCount> {
        match selection {
            ScaleSelection::Unfiltered => self.state_year.clone(),
            ScaleSelection::Scales(_) => {
                groupings::sum_over_severity(&self.state_year_severity, selection)
            }
        }
    }

    /// Display name for a postal code. Codes with no data fall back to the
    /// code itself.
    pub fn label_for(&self, abbrev: &str) -> String {
        self.labels
            .get(abbrev)
            .map(|name| name.to_string())
            .unwrap_or_else(|| abbrev.to_string())
    }

    /// The full state/year table as export records.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.state_year
            .iter()
            .map(|row| ExportRow {
                state: self.label_for(&row.state),
                year: row.year,
                tornado_count: row.count,
                state_abbrev: row.state.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
