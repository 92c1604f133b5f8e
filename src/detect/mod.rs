//! Category-routed detection pipeline internals.
//!
//! - `profile`: per-category extraction parameters (the router selects one
//!   of these, never a separate code path).
//! - `extractor`: the single parameterized extraction routine.
//! - `outcome`: ephemeral region types handed to scoring.
//! - `score`: confidence/severity/priority/recommendation rules.

mod extractor;
mod outcome;
mod profile;
pub mod score;

pub use extractor::extract;
pub use outcome::{CandidateRegion, DetectionOutcome};
pub use profile::{ExtractorProfile, RegionFilter, SignalMask, BLUR_SIGMA, CANNY_HIGH, CANNY_LOW};
