/// Shared data types for the tornado dashboard.
///
/// Everything downstream of ingestion speaks in these types: the ingest layer
/// produces `TornadoEvent`s, the analysis layer groups them into aggregate
/// rows, and the views filter on `ScaleSelection`. Errors that can abort
/// startup are collected in `DataError`.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset column names (after header normalization)
// ---------------------------------------------------------------------------

pub const COL_EVENT_TYPE: &str = "EVENT_TYPE";
pub const COL_BEGIN_DATE_TIME: &str = "BEGIN_DATE_TIME";
pub const COL_STATE: &str = "STATE";
pub const COL_BEGIN_LAT: &str = "BEGIN_LAT";
pub const COL_BEGIN_LON: &str = "BEGIN_LON";
pub const COL_TOR_F_SCALE: &str = "TOR_F_SCALE";

/// Columns without which the dataset cannot be used at all.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_EVENT_TYPE, COL_BEGIN_DATE_TIME, COL_STATE];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the source dataset, reduced to the fields the dashboard reads.
/// Every field is raw text exactly as found in the file (absent column or
/// empty cell → `None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEventRecord {
    pub event_type: Option<String>,
    pub begin_date_time: Option<String>,
    pub state: Option<String>,
    pub begin_lat: Option<String>,
    pub begin_lon: Option<String>,
    pub tor_f_scale: Option<String>,
}

/// WGS84 point where a tornado touched down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A tornado record that survived the event-type filter and whose begin
/// time parsed. State, severity and coordinates stay optional; each view
/// drops the events that lack the field it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TornadoEvent {
    pub begin: NaiveDateTime,
    pub year: i32,
    /// Two-letter postal code, present only when it resolves against the
    /// 50-state table.
    pub state: Option<String>,
    pub severity: Option<Severity>,
    pub coordinates: Option<Coordinates>,
}

// ---------------------------------------------------------------------------
// Severity (EF scale)
// ---------------------------------------------------------------------------

/// Enhanced Fujita rating. Legacy Fujita ratings are folded into the same
/// scale at ingestion. Ordering follows the rank, so `EF0 < EF5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    EF0,
    EF1,
    EF2,
    EF3,
    EF4,
    EF5,
}

impl Severity {
    /// All six ratings in rank order.
    pub const ALL: [Severity; 6] = [
        Severity::EF0,
        Severity::EF1,
        Severity::EF2,
        Severity::EF3,
        Severity::EF4,
        Severity::EF5,
    ];

    pub fn rank(&self) -> u8 {
        match self {
            Severity::EF0 => 0,
            Severity::EF1 => 1,
            Severity::EF2 => 2,
            Severity::EF3 => 3,
            Severity::EF4 => 4,
            Severity::EF5 => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::EF0 => "EF0",
            Severity::EF1 => "EF1",
            Severity::EF2 => "EF2",
            Severity::EF3 => "EF3",
            Severity::EF4 => "EF4",
            Severity::EF5 => "EF5",
        }
    }

    /// Normalizes a scale label from the dataset.
    ///
    /// Accepts exactly the twelve tokens `F0`..`F5` and `EF0`..`EF5`
    /// (case and surrounding whitespace ignored). Legacy `F` labels become
    /// `EF` labels by prefix substitution only; the number is never shifted.
    pub fn from_scale_label(raw: &str) -> Option<Self> {
        let token = raw.trim().to_uppercase();
        let modern = if token.starts_with('F') {
            format!("E{}", token)
        } else {
            token
        };

        match modern.as_str() {
            "EF0" => Some(Severity::EF0),
            "EF1" => Some(Severity::EF1),
            "EF2" => Some(Severity::EF2),
            "EF3" => Some(Severity::EF3),
            "EF4" => Some(Severity::EF4),
            "EF5" => Some(Severity::EF5),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which severity ratings a view admits.
///
/// `Unfiltered` places no requirement on severity at all (events without a
/// valid rating are kept). `Scales` keeps only events whose rating is in the
/// set, so selecting all six still drops unrated events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleSelection {
    Unfiltered,
    Scales(BTreeSet<Severity>),
}

impl ScaleSelection {
    pub fn all() -> Self {
        ScaleSelection::Scales(Severity::ALL.into_iter().collect())
    }

    pub fn only(scales: &[Severity]) -> Self {
        ScaleSelection::Scales(scales.iter().copied().collect())
    }

    pub fn admits(&self, severity: Option<Severity>) -> bool {
        match self {
            ScaleSelection::Unfiltered => true,
            ScaleSelection::Scales(set) => severity.is_some_and(|s| set.contains(&s)),
        }
    }
}

impl Default for ScaleSelection {
    fn default() -> Self {
        ScaleSelection::all()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that abort data preparation. Per-row problems never surface
/// here; they are counted in the ingestion report and dropped.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Dataset not found at {} and no download URL is configured", .0.display())]
    DatasetUnavailable(PathBuf),

    #[error("Download failed: {0}")]
    Fetch(String),

    #[error("Expected a CSV file from {0} but received an HTML page")]
    HtmlResponse(String),

    #[error("Downloaded file failed read-back check: {0}")]
    ReadBack(String),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_labels_map_by_prefix_only() {
        for (legacy, modern) in ["F0", "F1", "F2", "F3", "F4", "F5"]
            .iter()
            .zip(Severity::ALL.iter())
        {
            assert_eq!(Severity::from_scale_label(legacy), Some(*modern));
            assert_eq!(Severity::from_scale_label(modern.as_str()), Some(*modern));
        }
    }

    #[test]
    fn test_scale_label_ignores_case_and_whitespace() {
        assert_eq!(Severity::from_scale_label("  ef3 "), Some(Severity::EF3));
        assert_eq!(Severity::from_scale_label("f4"), Some(Severity::EF4));
    }

    #[test]
    fn test_scale_label_rejects_unknown_tokens() {
        for bad in ["", "EFU", "F6", "EF-1", "FF2", "EEF2", "2", "EF 2"] {
            assert_eq!(Severity::from_scale_label(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_severity_orders_by_rank_not_lexically() {
        let mut shuffled = vec![Severity::EF5, Severity::EF0, Severity::EF3, Severity::EF1];
        shuffled.sort();
        assert_eq!(shuffled, vec![Severity::EF0, Severity::EF1, Severity::EF3, Severity::EF5]);
        assert_eq!(Severity::EF4.rank(), 4);
    }

    #[test]
    fn test_scale_selection_admits() {
        let all = ScaleSelection::all();
        assert!(all.admits(Some(Severity::EF2)));
        assert!(!all.admits(None), "selecting scales drops unrated events");

        assert!(ScaleSelection::Unfiltered.admits(None));

        let strong = ScaleSelection::only(&[Severity::EF4, Severity::EF5]);
        assert!(strong.admits(Some(Severity::EF5)));
        assert!(!strong.admits(Some(Severity::EF1)));
        assert!(!strong.admits(None));
    }

    #[test]
    fn test_missing_columns_message_names_columns() {
        let err = DataError::MissingColumns(vec!["STATE".into(), "EVENT_TYPE".into()]);
        assert_eq!(
            err.to_string(),
            "Dataset is missing required column(s): STATE, EVENT_TYPE"
        );
    }
}
