use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::input;
use crate::output;
use nirs_channels::{validate_channel_batch, ChannelBatch};
use serde::Serialize;

/// Outcome of validating one batch, as printed by `validate` and `batch`
#[derive(Debug, Serialize)]
pub struct BatchReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub valid: bool,
    pub channel_count: usize,
    pub optode_pairs: Vec<String>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<ChannelBatch>,
    /// The label file could not be read, so no labels were checked
    #[serde(skip)]
    pub unreadable: bool,
}

impl BatchReport {
    pub fn from_labels(file: Option<&str>, labels: &[String]) -> Self {
        match validate_channel_batch(labels) {
            Ok(batch) => BatchReport {
                file: file.map(str::to_string),
                valid: true,
                channel_count: batch.len(),
                optode_pairs: batch.optode_pairs().iter().map(|p| p.to_string()).collect(),
                warnings: batch.warnings.iter().map(|w| w.to_string()).collect(),
                error: None,
                batch: Some(batch),
                unreadable: false,
            },
            Err(e) => BatchReport::failed(file, e.to_string()),
        }
    }

    pub fn failed(file: Option<&str>, error: String) -> Self {
        BatchReport {
            file: file.map(str::to_string),
            valid: false,
            channel_count: 0,
            optode_pairs: Vec::new(),
            warnings: Vec::new(),
            error: Some(error),
            batch: None,
            unreadable: false,
        }
    }

    pub fn unreadable(file: Option<&str>, error: String) -> Self {
        BatchReport {
            unreadable: true,
            ..BatchReport::failed(file, error)
        }
    }

    pub fn passes(&self, deny_warnings: bool) -> bool {
        self.valid && !(deny_warnings && !self.warnings.is_empty())
    }

    pub fn exit_code(&self, deny_warnings: bool) -> i32 {
        if self.unreadable {
            exit_codes::INPUT_ERROR
        } else if !self.valid {
            exit_codes::INVALID_CHANNELS
        } else if !self.passes(deny_warnings) {
            exit_codes::WARNINGS_DENIED
        } else {
            exit_codes::SUCCESS
        }
    }

    fn summary(&self) -> String {
        let Some(batch) = &self.batch else {
            return String::new();
        };
        let channel_type = batch
            .channel_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "none".to_string());
        let measures: Vec<String> = batch
            .distinct_measures()
            .iter()
            .map(|m| m.to_string())
            .collect();
        let mut text = format!(
            "Valid: {} channels, {} optode pairs, type {}",
            self.channel_count,
            self.optode_pairs.len(),
            channel_type
        );
        if !measures.is_empty() {
            text.push_str(&format!(", measures {}", measures.join(" ")));
        }
        for warning in &self.warnings {
            text.push_str(&format!("\nWarning: {}", warning));
        }
        text
    }
}

pub fn execute(args: ValidateArgs) -> i32 {
    let labels = match input::resolve_labels(&args.labels, args.file.as_deref()) {
        Ok(l) => l,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    log::info!("Validating {} channel labels", labels.len());

    let report = BatchReport::from_labels(args.file.as_deref(), &labels);
    let code = report.exit_code(args.deny_warnings);

    if args.json {
        return output::emit_json(&report, args.compact, args.output.as_deref(), code);
    }

    if let Some(ref err) = report.error {
        eprintln!("Error: {}", err);
    } else if !args.quiet {
        if let Err(e) = output::write_output(&report.summary(), args.output.as_deref()) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    code
}
