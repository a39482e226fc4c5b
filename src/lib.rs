/// tornado_dashboard: interactive dashboard over US tornado events, 1980–2024.
///
/// # Module structure
///
/// ```text
/// tornado_dashboard
/// ├── model       — shared data types (TornadoEvent, Severity, ScaleSelection, DataError)
/// ├── config      — settings from dashboard.toml and the environment
/// ├── states      — 50-state name ↔ postal code registry
/// ├── dashboard   — startup preparation: fetch → ingest → aggregate
/// ├── endpoint    — HTTP surface: page, JSON views, export route
/// ├── logging     — tracing subscriber setup for the binaries
/// ├── ingest
/// │   ├── fetch        — one-time dataset download with HTML/read-back checks
/// │   ├── storm_events — batched CSV reading and per-row normalization
/// │   ├── timestamps   — flexible begin-time parsing
/// │   └── fixtures (test only) — small CSV payloads
/// └── analysis
///     ├── groupings — (state, year[, severity]) aggregate tables
///     └── views     — view models for map, choropleth, trend, severity
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod states;
