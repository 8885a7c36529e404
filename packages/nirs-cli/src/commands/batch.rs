use crate::cli::BatchArgs;
use crate::commands::validate::BatchReport;
use crate::exit_codes;
use crate::input;
use crate::output;
use rayon::prelude::*;
use std::time::Instant;

pub fn execute(args: BatchArgs) -> i32 {
    let files = match resolve_files(&args) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if files.is_empty() {
        eprintln!("Error: No matching files found");
        return exit_codes::INPUT_ERROR;
    }

    let start_time = Instant::now();

    // collect() keeps input order
    let reports: Vec<BatchReport> = files.par_iter().map(|f| validate_file(f)).collect();

    let total = reports.len();
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for report in &reports {
        if report.passes(args.deny_warnings) {
            succeeded += 1;
        } else {
            failed += 1;
        }

        match output::to_json(report, true).and_then(|json| output::write_output(&json, None)) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }

        if !report.passes(args.deny_warnings) && !args.continue_on_error {
            break;
        }
    }

    if !args.quiet {
        eprintln!(
            "Batch complete: {}/{} succeeded, {}/{} failed, {:.1}s",
            succeeded,
            total,
            failed,
            total,
            start_time.elapsed().as_secs_f64()
        );
    }

    if failed == 0 {
        exit_codes::SUCCESS
    } else if succeeded > 0 {
        exit_codes::PARTIAL_FAILURE
    } else {
        failure_code(&reports, args.deny_warnings)
    }
}

/// Exit code when no file passed: the code of the first failing report
fn failure_code(reports: &[BatchReport], deny_warnings: bool) -> i32 {
    reports
        .iter()
        .find(|r| !r.passes(deny_warnings))
        .map(|r| r.exit_code(deny_warnings))
        .unwrap_or(exit_codes::INVALID_CHANNELS)
}

fn validate_file(path: &str) -> BatchReport {
    match input::read_label_file(path) {
        Ok(labels) => BatchReport::from_labels(Some(path), &labels),
        Err(msg) => BatchReport::unreadable(Some(path), msg),
    }
}

fn resolve_files(args: &BatchArgs) -> Result<Vec<String>, String> {
    if let Some(ref pattern) = args.glob {
        resolve_glob(pattern)
    } else if let Some(ref files) = args.files {
        Ok(files.clone())
    } else {
        Err("One of --glob or --files must be specified".to_string())
    }
}

fn resolve_glob(pattern: &str) -> Result<Vec<String>, String> {
    let paths =
        glob::glob(pattern).map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut files: Vec<String> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(s) = path.to_str() {
                        files.push(s.to_string());
                    }
                }
            }
            Err(e) => log::warn!("glob error: {}", e),
        }
    }
    files.sort();
    Ok(files)
}
