use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::detector::Detector;

#[derive(Args, Debug)]
/// Detection options.
pub struct DetectArgs {
    #[arg(short = 'p', long = "path", help = "Extra candidate path (repeatable)")]
    extra_paths: Vec<PathBuf>,
    #[arg(short = 'j', long, help = "Print a JSON report")]
    json: bool,
}

/// Run detection and report the outcome.
pub fn handle(args: DetectArgs) -> Result<()> {
    let mut detector = Detector::new();
    for path in args.extra_paths {
        detector.add_possible_path(path);
    }
    let result = detector.detect();

    if args.json {
        let report = match &result {
            Ok(path) => serde_json::json!({ "found": true, "path": path.display().to_string() }),
            Err(err) => serde_json::json!({ "found": false, "error": err.to_string() }),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let path = result?;
    println!("{}", path.display());
    Ok(())
}
