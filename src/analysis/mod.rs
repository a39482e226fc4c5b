/// Data analysis for the tornado dashboard.
///
/// Submodules:
/// - `groupings` — aggregate tables keyed by (state, year[, severity]).
/// - `views`     — pure view-model functions of the dashboard filter state.

pub mod groupings;
pub mod views;
