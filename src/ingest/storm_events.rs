/// Storm events CSV ingestion.
///
/// Reads the US weather-events dataset (one row per reported event, all
/// event types mixed together) and keeps only tornadoes.
/// Source layout: comma-separated with a header row; narrative columns may
/// contain quoted commas and newlines, so rows are read with the `csv` crate
/// rather than split by hand.
///
/// The reader streams the file in batches of `batch_size` rows. Only the
/// current batch of raw rows is held in memory; each batch is filtered and
/// normalized before the next one is read, so the unfiltered dataset is
/// never materialized. Results do not depend on the batch size.
///
/// Row-level problems (non-tornado type, unparseable date, unknown state,
/// bad scale label, bad coordinates, undecodable row) are never errors; they
/// are tallied in `IngestReport` and the row (or field) is dropped.

use csv::ByteRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::ingest::timestamps::parse_begin_time;
use crate::model::{
    Coordinates, DataError, RawEventRecord, Severity, TornadoEvent, COL_BEGIN_DATE_TIME,
    COL_BEGIN_LAT, COL_BEGIN_LON, COL_EVENT_TYPE, COL_STATE, COL_TOR_F_SCALE, REQUIRED_COLUMNS,
};
use crate::states::StateTable;
use chrono::Datelike;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Tallies from one ingestion pass, logged at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows read from the file (header excluded).
    pub rows_read: usize,
    /// Rows skipped because the CSV reader could not decode them.
    pub malformed_rows: usize,
    /// Rows whose event type mentions "tornado".
    pub tornado_rows: usize,
    /// Tornado rows dropped because the begin time did not parse.
    pub unparsed_dates: usize,
    /// Tornado events kept.
    pub events: usize,
    /// Kept events whose state did not resolve (excluded from state aggregates).
    pub unresolved_states: usize,
    /// Kept events without a valid F/EF rating (excluded from severity views).
    pub unrated_events: usize,
    /// Kept events without usable coordinates (excluded from the point map).
    pub missing_coordinates: usize,
}

/// Normalized events plus the report that produced them.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub events: Vec<TornadoEvent>,
    pub report: IngestReport,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Column positions resolved from the header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    event_type: usize,
    begin_date_time: usize,
    state: usize,
    begin_lat: Option<usize>,
    begin_lon: Option<usize>,
    tor_f_scale: Option<usize>,
}

impl ColumnMap {
    /// Header names are trimmed and upper-cased before matching, so
    /// ` event_type` and `EVENT_TYPE` are the same column.
    ///
    /// # Errors
    /// `DataError::MissingColumns` listing every absent required column.
    pub fn from_headers(headers: &ByteRecord) -> Result<Self, DataError> {
        let mut col_map: HashMap<String, usize> = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let name = String::from_utf8_lossy(header)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_uppercase();
            // first occurrence wins on duplicate names
            col_map.entry(name).or_insert(idx);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !col_map.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::MissingColumns(missing));
        }

        Ok(ColumnMap {
            event_type: col_map[COL_EVENT_TYPE],
            begin_date_time: col_map[COL_BEGIN_DATE_TIME],
            state: col_map[COL_STATE],
            begin_lat: col_map.get(COL_BEGIN_LAT).copied(),
            begin_lon: col_map.get(COL_BEGIN_LON).copied(),
            tor_f_scale: col_map.get(COL_TOR_F_SCALE).copied(),
        })
    }

    /// Extracts the fields the dashboard reads from one row.
    pub fn raw_record(&self, row: &ByteRecord) -> RawEventRecord {
        let field = |idx: Option<usize>| -> Option<String> {
            let bytes = row.get(idx?)?;
            let text = String::from_utf8_lossy(bytes);
            if text.trim().is_empty() {
                None
            } else {
                Some(text.into_owned())
            }
        };

        RawEventRecord {
            event_type: field(Some(self.event_type)),
            begin_date_time: field(Some(self.begin_date_time)),
            state: field(Some(self.state)),
            begin_lat: field(self.begin_lat),
            begin_lon: field(self.begin_lon),
            tor_f_scale: field(self.tor_f_scale),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-row normalization stages
// ---------------------------------------------------------------------------

/// True when the event type mentions "tornado" in any case. A missing type
/// is simply not a tornado.
pub fn is_tornado(event_type: Option<&str>) -> bool {
    event_type.is_some_and(|t| t.to_lowercase().contains("tornado"))
}

/// Both coordinates must parse, be finite, and fall in WGS84 range.
pub fn parse_coordinates(lat: Option<&str>, lon: Option<&str>) -> Option<Coordinates> {
    let latitude: f64 = lat?.trim().parse().ok()?;
    let longitude: f64 = lon?.trim().parse().ok()?;

    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);

    valid.then_some(Coordinates { latitude, longitude })
}

/// Turns one raw row into a `TornadoEvent`, or `None` when the row is not a
/// tornado or its begin time does not parse. State, severity and
/// coordinates are resolved independently and left empty on failure.
pub fn normalize_record(raw: &RawEventRecord, states: &StateTable) -> Option<TornadoEvent> {
    if !is_tornado(raw.event_type.as_deref()) {
        return None;
    }
    let begin = parse_begin_time(raw.begin_date_time.as_deref()?)?;

    Some(TornadoEvent {
        begin,
        year: begin.year(),
        state: raw
            .state
            .as_deref()
            .and_then(|s| states.normalize(s))
            .map(str::to_string),
        severity: raw.tor_f_scale.as_deref().and_then(Severity::from_scale_label),
        coordinates: parse_coordinates(raw.begin_lat.as_deref(), raw.begin_lon.as_deref()),
    })
}

// ---------------------------------------------------------------------------
// Batched reading
// ---------------------------------------------------------------------------

/// Filters and normalizes one batch of raw rows.
fn process_batch(
    batch: &[ByteRecord],
    columns: &ColumnMap,
    states: &StateTable,
    report: &mut IngestReport,
) -> Vec<TornadoEvent> {
    let mut events = Vec::new();

    for row in batch {
        let raw = columns.raw_record(row);
        if !is_tornado(raw.event_type.as_deref()) {
            continue;
        }
        report.tornado_rows += 1;

        let Some(event) = normalize_record(&raw, states) else {
            report.unparsed_dates += 1;
            continue;
        };

        if event.state.is_none() {
            report.unresolved_states += 1;
        }
        if event.severity.is_none() {
            report.unrated_events += 1;
        }
        if event.coordinates.is_none() {
            report.missing_coordinates += 1;
        }
        events.push(event);
    }

    report.events += events.len();
    events
}

/// Streams a CSV source in batches of `batch_size` rows.
///
/// # Errors
/// - `DataError::MissingColumns` — the header lacks a required column.
/// - `DataError::Csv` — the header could not be read, or an I/O error
///   interrupted the stream. Undecodable individual rows are skipped.
pub fn ingest_reader<R: Read>(
    reader: R,
    batch_size: usize,
    states: &StateTable,
) -> Result<Ingested, DataError> {
    let batch_size = batch_size.max(1);
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.byte_headers()?)?;

    let mut report = IngestReport::default();
    let mut events = Vec::new();
    let mut batch: Vec<ByteRecord> = Vec::new();
    let mut batch_count = 0usize;
    let mut exhausted = false;

    while !exhausted {
        batch.clear();
        while batch.len() < batch_size {
            let mut row = ByteRecord::new();
            match csv_reader.read_byte_record(&mut row) {
                Ok(true) => {
                    report.rows_read += 1;
                    batch.push(row);
                }
                Ok(false) => {
                    exhausted = true;
                    break;
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    report.rows_read += 1;
                    report.malformed_rows += 1;
                    debug!("Skipping malformed row: {}", e);
                }
            }
        }

        if batch.is_empty() {
            continue;
        }
        batch_count += 1;
        let kept = process_batch(&batch, &columns, states, &mut report);
        debug!(batch = batch_count, rows = batch.len(), kept = kept.len(), "Processed batch");
        events.extend(kept);
    }

    Ok(Ingested { events, report })
}

/// Opens and ingests the dataset at `path`.
pub fn ingest_file(path: &Path, batch_size: usize, states: &StateTable) -> Result<Ingested, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let ingested = ingest_reader(file, batch_size, states)?;

    let r = &ingested.report;
    info!(
        path = %path.display(),
        rows = r.rows_read,
        tornado_rows = r.tornado_rows,
        events = r.events,
        unparsed_dates = r.unparsed_dates,
        unresolved_states = r.unresolved_states,
        unrated = r.unrated_events,
        "Ingested storm events"
    );
    Ok(ingested)
}

/// Reads only the header row and checks the required columns are present.
pub fn check_header<R: Read>(reader: R) -> Result<(), DataError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    ColumnMap::from_headers(csv_reader.byte_headers()?).map(|_| ())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
