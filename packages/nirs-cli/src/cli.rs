use clap::{ArgGroup, Args, Parser, Subcommand};
use nirs_channels::HbSpecies;

#[derive(Parser)]
#[command(
    name = "nirs",
    version,
    about = "fNIRS channel label parser and validator",
    long_about = "Decode, canonicalize and validate fNIRS channel labels such as S1D2WL685 or S3D1HbR.\n\
                  Label files hold one label per line (# comments allowed) or a JSON array of strings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode channel labels into source, detector and measure
    Parse(ParseArgs),
    /// Build the canonical label for one channel
    Format(FormatArgs),
    /// Validate one batch of channel labels
    Validate(ValidateArgs),
    /// Validate many label files in parallel
    Batch(BatchArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    /// Channel labels to decode
    #[arg(required = true, num_args = 1..)]
    pub labels: Vec<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("measure").required(true).args(["wavelength", "hb"])))]
pub struct FormatArgs {
    /// Source index
    #[arg(long)]
    pub source: u32,

    /// Detector index
    #[arg(long)]
    pub detector: u32,

    /// Wavelength in nm
    #[arg(long)]
    pub wavelength: Option<u32>,

    /// Hemoglobin tag (O, R or T)
    #[arg(long, value_parser = parse_hb_tag)]
    pub hb: Option<HbSpecies>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Channel labels (alternative to --file)
    pub labels: Vec<String>,

    /// Label file: one label per line, or a .json array of strings
    #[arg(long, env = "NIRS_LABELS_FILE")]
    pub file: Option<String>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit with a non-zero code when validation produced warnings
    #[arg(long, env = "NIRS_DENY_WARNINGS", default_value_t = false)]
    pub deny_warnings: bool,

    /// Print nothing in text mode and silence warning logs; report through the exit code only
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for label files (e.g., "montages/*.txt")
    #[arg(long, conflicts_with = "files")]
    pub glob: Option<String>,

    /// Explicit list of label files
    #[arg(long, num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Report every file even after a failure
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// Count files with warnings as failed
    #[arg(long, env = "NIRS_DENY_WARNINGS", default_value_t = false)]
    pub deny_warnings: bool,

    /// Suppress progress messages and warning logs on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

/// Parse a hemoglobin tag argument ("O", "R", "T").
pub fn parse_hb_tag(s: &str) -> Result<HbSpecies, String> {
    HbSpecies::from_tag(s.trim()).ok_or_else(|| {
        format!(
            "Invalid hemoglobin tag '{}': expected one of O (oxy), R (deoxy), T (total)",
            s
        )
    })
}
