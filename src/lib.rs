//! Civic Lens
//!
//! This crate implements image analysis for citizen-reported civic
//! infrastructure issues: a single photograph plus a free-text category
//! label in, a structured report out (detected flag, issue type,
//! confidence, severity, priority, recommendation).
//!
//! # Architecture
//!
//! The pipeline is a deterministic rule engine over image geometry, not a
//! trained classifier:
//!
//! 1. **Router** (`category`): resolves the label into a closed category
//!    enum once, at the boundary.
//! 2. **Extractor** (`detect`): one parameterized routine - color
//!    transform, signal mask, outer contours, area/shape filter - driven
//!    by a per-category profile.
//! 3. **Scoring** (`detect::score`): confidence from the detection count,
//!    severity from image coverage, priority from a fixed decision table.
//! 4. **Assembler** (`analyzer`): folds every failure into the uniform
//!    response record; nothing propagates to the caller as a fault.
//!
//! Each call is a pure function of (image, category): no shared state, no
//! coordination needed between concurrent analyses.
//!
//! The unrelated OTP microservice the outer process also hosts lives in
//! `otp`/`api` and shares nothing with the pipeline.

pub mod analyzer;
pub mod api;
pub mod category;
pub mod config;
pub mod detect;
pub mod imgproc;
pub mod otp;
pub mod report;

pub use analyzer::{analyze_decoded, analyze_for_potholes, analyze_image};
pub use category::IssueCategory;
pub use detect::{CandidateRegion, DetectionOutcome, ExtractorProfile};
pub use report::{AnalysisResponse, Priority, Severity};
