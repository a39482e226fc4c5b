/// Dataset acquisition and normalization.
///
/// - `fetch`        — one-time download of the CSV when it is not on disk
/// - `storm_events` — batched CSV reading, tornado filter, per-row normalization
/// - `timestamps`   — flexible BEGIN_DATE_TIME parsing
/// - `fixtures` (test only) — small CSV payloads

pub mod fetch;
pub mod storm_events;
pub mod timestamps;

#[cfg(test)]
pub(crate) mod fixtures;
