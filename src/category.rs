//! Issue category routing.
//!
//! Free-text category labels arrive from the reporting frontend
//! ("Road issue", "garbage pickup", "Streetlight out", ...). They are
//! resolved once, at this boundary, into a closed enum; everything
//! downstream dispatches on the enum, never on the raw string.

use std::fmt;

/// Closed set of issue categories the pipeline knows how to analyze.
///
/// Unrecognized labels are not an error: they route to [`IssueCategory::Other`],
/// which carries the original label and runs the generic extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueCategory {
    Pothole,
    Garbage,
    Construction,
    Water,
    Streetlight,
    Other(String),
}

impl IssueCategory {
    /// Resolve a free-text label.
    ///
    /// Case-insensitive substring match against fixed keyword sets, first
    /// match wins. The evaluation order is part of the contract: a label
    /// like "road construction" routes to potholes, not construction.
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_lowercase();
        let has = |kw: &str| lowered.contains(kw);

        if has("road") || has("pothole") {
            IssueCategory::Pothole
        } else if has("garbage") || has("waste") || has("dustbin") {
            IssueCategory::Garbage
        } else if has("construction") || has("infrastructure") {
            IssueCategory::Construction
        } else if has("water") || has("drainage") {
            IssueCategory::Water
        } else if has("streetlight") || has("light") {
            IssueCategory::Streetlight
        } else {
            IssueCategory::Other(label.to_string())
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCategory::Pothole => f.write_str("pothole"),
            IssueCategory::Garbage => f.write_str("garbage"),
            IssueCategory::Construction => f.write_str("construction"),
            IssueCategory::Water => f.write_str("water"),
            IssueCategory::Streetlight => f.write_str("streetlight"),
            IssueCategory::Other(label) => f.write_str(label),
        }
    }
}

/// Title-case a label the way the legacy reporting stack did: the first
/// letter of every alphabetic run is uppercased, the rest lowered, and
/// non-alphabetic characters pass through. `"unknown-thing"` becomes
/// `"Unknown-Thing"`, `"ROAD ISSUE"` becomes `"Road Issue"`.
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev_alpha = false;
    for ch in label.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_is_case_insensitive_and_substring() {
        assert_eq!(IssueCategory::from_label("ROAD ISSUE"), IssueCategory::Pothole);
        assert_eq!(IssueCategory::from_label("pothole report"), IssueCategory::Pothole);
        assert_eq!(IssueCategory::from_label("Road"), IssueCategory::Pothole);
        assert_eq!(IssueCategory::from_label("overflowing Dustbin"), IssueCategory::Garbage);
        assert_eq!(IssueCategory::from_label("Infrastructure damage"), IssueCategory::Construction);
        assert_eq!(IssueCategory::from_label("blocked DRAINAGE"), IssueCategory::Water);
        assert_eq!(IssueCategory::from_label("street Light broken"), IssueCategory::Streetlight);
    }

    #[test]
    fn first_match_wins_in_declared_order() {
        // "road construction" contains keywords for two categories; the
        // pothole keywords are checked first.
        assert_eq!(
            IssueCategory::from_label("road construction"),
            IssueCategory::Pothole
        );
        // "waste water" hits garbage before water.
        assert_eq!(IssueCategory::from_label("waste water"), IssueCategory::Garbage);
    }

    #[test]
    fn unrecognized_labels_route_to_other() {
        assert_eq!(
            IssueCategory::from_label("unknown-thing"),
            IssueCategory::Other("unknown-thing".to_string())
        );
        assert_eq!(IssueCategory::from_label(""), IssueCategory::Other(String::new()));
    }

    #[test]
    fn title_case_matches_legacy_semantics() {
        assert_eq!(title_case("unknown-thing"), "Unknown-Thing");
        assert_eq!(title_case("ROAD ISSUE"), "Road Issue");
        assert_eq!(title_case("road"), "Road");
        assert_eq!(title_case("abc3de"), "Abc3De");
        assert_eq!(title_case(""), "");
    }
}
