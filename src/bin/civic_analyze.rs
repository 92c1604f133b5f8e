//! civic_analyze - analyze one photo for a civic issue category.
//!
//! Emits the JSON analysis record on stdout; diagnostics go to stderr via
//! `RUST_LOG`. A missing input file produces a JSON failure record and a
//! non-zero exit status - the one path where the contract also signals
//! failure through the exit code.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use civic_lens::category::title_case;
use civic_lens::{analyze_image, AnalysisResponse};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the image to analyze. Without it the service only reports
    /// readiness.
    #[arg(long, value_name = "PATH")]
    analyze: Option<PathBuf>,

    /// Issue category label (free text; unrecognized labels run the
    /// generic detector).
    #[arg(long, default_value = "road")]
    category: String,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let Some(path) = args.analyze else {
        println!("Issue Detection Service initialized");
        return Ok(ExitCode::SUCCESS);
    };

    if !path.exists() {
        let record = AnalysisResponse::not_detected(
            Some(title_case(&args.category)),
            0.0,
            format!("Image file not found: {}", path.display()),
        );
        println!("{}", serde_json::to_string(&record)?);
        return Ok(ExitCode::FAILURE);
    }

    let record = analyze_image(&path, &args.category);
    println!("{}", serde_json::to_string(&record)?);
    Ok(ExitCode::SUCCESS)
}
