/// US state registry for the tornado dashboard.
///
/// Defines the 50 states the dashboard maps, with their postal codes.
/// `StateTable` is built once at startup from `STATE_REGISTRY` and handed
/// by reference to ingestion and the views; nothing mutates it afterwards.
///
/// The dataset's STATE column is free text ("TEXAS", "texas ", "TX"), so
/// every lookup goes through `StateTable::normalize`.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// State metadata
// ---------------------------------------------------------------------------

/// One US state.
pub struct UsState {
    /// Title-cased full name, e.g. "New Hampshire".
    pub name: &'static str,
    /// Two-letter USPS code.
    pub abbrev: &'static str,
}

/// The 50 states, alphabetical by name. DC and territories are not mapped;
/// rows naming them drop out of every per-state aggregate.
pub static STATE_REGISTRY: &[UsState] = &[
    UsState { name: "Alabama", abbrev: "AL" },
    UsState { name: "Alaska", abbrev: "AK" },
    UsState { name: "Arizona", abbrev: "AZ" },
    UsState { name: "Arkansas", abbrev: "AR" },
    UsState { name: "California", abbrev: "CA" },
    UsState { name: "Colorado", abbrev: "CO" },
    UsState { name: "Connecticut", abbrev: "CT" },
    UsState { name: "Delaware", abbrev: "DE" },
    UsState { name: "Florida", abbrev: "FL" },
    UsState { name: "Georgia", abbrev: "GA" },
    UsState { name: "Hawaii", abbrev: "HI" },
    UsState { name: "Idaho", abbrev: "ID" },
    UsState { name: "Illinois", abbrev: "IL" },
    UsState { name: "Indiana", abbrev: "IN" },
    UsState { name: "Iowa", abbrev: "IA" },
    UsState { name: "Kansas", abbrev: "KS" },
    UsState { name: "Kentucky", abbrev: "KY" },
    UsState { name: "Louisiana", abbrev: "LA" },
    UsState { name: "Maine", abbrev: "ME" },
    UsState { name: "Maryland", abbrev: "MD" },
    UsState { name: "Massachusetts", abbrev: "MA" },
    UsState { name: "Michigan", abbrev: "MI" },
    UsState { name: "Minnesota", abbrev: "MN" },
    UsState { name: "Mississippi", abbrev: "MS" },
    UsState { name: "Missouri", abbrev: "MO" },
    UsState { name: "Montana", abbrev: "MT" },
    UsState { name: "Nebraska", abbrev: "NE" },
    UsState { name: "Nevada", abbrev: "NV" },
    UsState { name: "New Hampshire", abbrev: "NH" },
    UsState { name: "New Jersey", abbrev: "NJ" },
    UsState { name: "New Mexico", abbrev: "NM" },
    UsState { name: "New York", abbrev: "NY" },
    UsState { name: "North Carolina", abbrev: "NC" },
    UsState { name: "North Dakota", abbrev: "ND" },
    UsState { name: "Ohio", abbrev: "OH" },
    UsState { name: "Oklahoma", abbrev: "OK" },
    UsState { name: "Oregon", abbrev: "OR" },
    UsState { name: "Pennsylvania", abbrev: "PA" },
    UsState { name: "Rhode Island", abbrev: "RI" },
    UsState { name: "South Carolina", abbrev: "SC" },
    UsState { name: "South Dakota", abbrev: "SD" },
    UsState { name: "Tennessee", abbrev: "TN" },
    UsState { name: "Texas", abbrev: "TX" },
    UsState { name: "Utah", abbrev: "UT" },
    UsState { name: "Vermont", abbrev: "VT" },
    UsState { name: "Virginia", abbrev: "VA" },
    UsState { name: "Washington", abbrev: "WA" },
    UsState { name: "West Virginia", abbrev: "WV" },
    UsState { name: "Wisconsin", abbrev: "WI" },
    UsState { name: "Wyoming", abbrev: "WY" },
];

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

/// Name ↔ abbreviation lookups over `STATE_REGISTRY`.
#[derive(Debug, Clone)]
pub struct StateTable {
    by_name: HashMap<&'static str, &'static str>,
    by_abbrev: HashMap<&'static str, &'static str>,
}

impl StateTable {
    pub fn new() -> Self {
        let by_name = STATE_REGISTRY.iter().map(|s| (s.name, s.abbrev)).collect();
        let by_abbrev = STATE_REGISTRY.iter().map(|s| (s.abbrev, s.name)).collect();
        Self { by_name, by_abbrev }
    }

    /// Exact lookup on the title-cased full name.
    pub fn abbrev_for_name(&self, name: &str) -> Option<&'static str> {
        self.by_name.get(name).copied()
    }

    /// Exact lookup on an upper-case postal code.
    pub fn name_for_abbrev(&self, abbrev: &str) -> Option<&'static str> {
        self.by_abbrev.get(abbrev).copied()
    }

    /// Resolves a raw STATE value to a postal code.
    ///
    /// The value is trimmed; a two-character value is treated as a postal
    /// code and upper-cased, anything longer is title-cased and looked up
    /// by name. Either way the result must be one of the 50 table codes.
    pub fn normalize(&self, raw: &str) -> Option<&'static str> {
        let trimmed = raw.trim();
        if trimmed.chars().count() == 2 {
            let upper = trimmed.to_uppercase();
            return self.by_abbrev.get_key_value(upper.as_str()).map(|(k, _)| *k);
        }
        self.abbrev_for_name(&title_case(trimmed))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases
/// the rest ("NEW YORK" → "New York", "north  dakota" → "North  Dakota").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_fifty_states() {
        assert_eq!(STATE_REGISTRY.len(), 50);
        assert_eq!(StateTable::new().len(), 50);
    }

    #[test]
    fn test_no_duplicate_names_or_codes() {
        let mut names = std::collections::HashSet::new();
        let mut codes = std::collections::HashSet::new();
        for state in STATE_REGISTRY {
            assert!(names.insert(state.name), "duplicate name '{}'", state.name);
            assert!(codes.insert(state.abbrev), "duplicate code '{}'", state.abbrev);
        }
    }

    #[test]
    fn test_all_codes_are_two_uppercase_letters() {
        for state in STATE_REGISTRY {
            assert_eq!(state.abbrev.len(), 2, "bad code for '{}'", state.name);
            assert!(state.abbrev.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_inverse_lookup_round_trips() {
        let table = StateTable::new();
        for state in STATE_REGISTRY {
            assert_eq!(table.abbrev_for_name(state.name), Some(state.abbrev));
            assert_eq!(table.name_for_abbrev(state.abbrev), Some(state.name));
        }
    }

    #[test]
    fn test_normalize_full_names_any_case() {
        let table = StateTable::new();
        assert_eq!(table.normalize("TEXAS"), Some("TX"));
        assert_eq!(table.normalize("  texas "), Some("TX"));
        assert_eq!(table.normalize("NEW YORK"), Some("NY"));
        assert_eq!(table.normalize("north dakota"), Some("ND"));
    }

    #[test]
    fn test_normalize_two_letter_codes() {
        let table = StateTable::new();
        assert_eq!(table.normalize("TX"), Some("TX"));
        assert_eq!(table.normalize(" ok"), Some("OK"));
    }

    #[test]
    fn test_normalize_rejects_unmapped_values() {
        let table = StateTable::new();
        assert_eq!(table.normalize("PUERTO RICO"), None);
        assert_eq!(table.normalize("DISTRICT OF COLUMBIA"), None);
        assert_eq!(table.normalize("PR"), None, "territory codes are not in the table");
        assert_eq!(table.normalize("GULF OF MEXICO"), None);
        assert_eq!(table.normalize(""), None);
    }

    #[test]
    fn test_title_case_matches_word_boundaries() {
        assert_eq!(title_case("NEW HAMPSHIRE"), "New Hampshire");
        assert_eq!(title_case("rhode island"), "Rhode Island");
        assert_eq!(title_case("o'brien-x"), "O'Brien-X");
    }
}
