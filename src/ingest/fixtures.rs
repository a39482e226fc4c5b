/// Test fixtures: small storm-events CSV payloads.
///
/// These mirror the column layout of the NOAA storm events export
/// (upper-case headers, free-text STATE, mixed F/EF scale labels) but keep
/// only the columns the dashboard reads, plus a narrative column where a
/// fixture needs to exercise quoting.
///
/// Expected values for each fixture are spelled out in its doc comment so
/// tests can assert against them without re-deriving the counts.

/// The three-row scenario: a legacy-rated Texas tornado, a non-tornado row,
/// and a modern-rated TX tornado. Two events, both TX / 2001 / EF2.
#[cfg(test)]
pub(crate) fn fixture_three_row_csv() -> &'static str {
    "EVENT_TYPE,BEGIN_DATE_TIME,STATE,TOR_F_SCALE
Tornado,2001-05-03 14:00,Texas,F2
Thunderstorm Wind,2001-05-03 15:00,Texas,
Tornado,2001-06-01 09:00,TX,EF2
"
}

/// Quoted narratives containing commas, doubled quotes and a newline.
/// Two tornado events: OK (1999, EF5) then KS (2007, EF5).
#[cfg(test)]
pub(crate) fn fixture_quoted_narrative_csv() -> &'static str {
    r#"EVENT_ID,STATE,EVENT_TYPE,BEGIN_DATE_TIME,TOR_F_SCALE,BEGIN_LAT,BEGIN_LON,EVENT_NARRATIVE
1,OKLAHOMA,Tornado,03-MAY-99 18:26:00,F5,35.30,-97.50,"Long-track tornado, crossed I-44 near ""Bridge Creek"""
2,TEXAS,Hail,03-MAY-99 19:00:00,,32.00,-97.00,"Hail, 1.75 in"
3,KANSAS,Tornado,04-MAY-07 21:45:00,EF5,37.60,-99.30,"Greensburg
largely destroyed"
"#
}

/// Eight rows exercising every drop rule:
///
/// | row | outcome                                   |
/// |-----|-------------------------------------------|
/// | 1   | TX 2001 EF2, coordinates                  |
/// | 2   | not a tornado                             |
/// | 3   | tornado, unparseable date → dropped       |
/// | 4   | TX 2001 EF2, no coordinates               |
/// | 5   | OK 2013 EF5                               |
/// | 6   | OK 2013, unrated (EFU)                    |
/// | 7   | unresolved state (PR), unrated            |
/// | 8   | not a tornado                             |
#[cfg(test)]
pub(crate) fn fixture_mixed_quality_csv() -> &'static str {
    "EVENT_TYPE,BEGIN_DATE_TIME,STATE,TOR_F_SCALE,BEGIN_LAT,BEGIN_LON
Tornado,2001-05-03 14:00,TEXAS,F2,32.1,-97.2
Thunderstorm Wind,2001-05-03 15:00,TEXAS,,32.2,-97.3
Tornado,not recorded,KANSAS,F1,38.0,-98.0
TORNADO,2001-06-01 09:00,TX,EF2,,
Tornado,5/20/2013 14:56,oklahoma,EF5,35.3,-97.5
Tornado,2013-05-31 18:03,OKLAHOMA,EFU,35.5,-98.0
Tornado,2013-07-04 12:00,PUERTO RICO,,18.2,-66.5
Hail,2013-07-04 12:00,IOWA,,,
"
}

/// Three states over 2001–2002, used by the aggregation and view tests.
///
/// Rated, state-resolved counts:
///
/// | state | 2001           | 2002            |
/// |-------|----------------|-----------------|
/// | TX    | EF0, EF2, EF2  | EF1             |
/// | OK    | EF3            | EF4, EF4        |
/// | KS    | —              | EF0 (no coords) |
///
/// Also present: one unrated KS 2002 tornado, one GUAM 2002 EF1 tornado
/// (unresolved state) and one non-tornado row. Ten events in total.
#[cfg(test)]
pub(crate) fn fixture_multi_state_csv() -> &'static str {
    "EVENT_TYPE,BEGIN_DATE_TIME,STATE,TOR_F_SCALE,BEGIN_LAT,BEGIN_LON
Tornado,2001-04-01 10:00,TEXAS,F0,31.0,-97.0
Tornado,2001-05-03 14:00,Texas,F2,32.1,-97.2
Tornado,2001-06-01 09:00,TX,EF2,32.5,-97.5
Tornado,2002-03-15 16:20,TEXAS,F1,33.0,-98.0
Tornado,2001-05-10 18:00,OKLAHOMA,F3,35.3,-97.5
Tornado,2002-05-08 17:30,OKLAHOMA,F4,35.4,-97.6
Tornado,2002-05-09 19:10,OKLAHOMA,F4,35.6,-97.2
Tornado,2002-06-11 20:00,KANSAS,F0,,
Tornado,2002-06-12 21:00,KANSAS,,38.1,-98.2
Tornado,2002-07-01 12:00,GUAM,F1,13.4,144.7
Hail,2002-07-01 12:00,KANSAS,,38.1,-98.2
"
}
