use crate::cli::ParseArgs;
use crate::exit_codes;
use crate::output;
use nirs_channels::{parse_channel_label, ChannelType, Measure};
use serde::Serialize;

#[derive(Serialize)]
struct ParsedLabel {
    label: String,
    canonical: String,
    source_index: u32,
    detector_index: u32,
    measure: Measure,
    channel_type: ChannelType,
}

pub fn execute(args: ParseArgs) -> i32 {
    let mut parsed = Vec::with_capacity(args.labels.len());

    for label in &args.labels {
        match parse_channel_label(label) {
            Ok(record) => parsed.push(ParsedLabel {
                label: label.clone(),
                canonical: record.to_string(),
                source_index: record.source_index,
                detector_index: record.detector_index,
                measure: record.measure,
                channel_type: record.channel_type(),
            }),
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::INVALID_CHANNELS;
            }
        }
    }

    if args.json {
        return output::emit_json(&parsed, false, None, exit_codes::SUCCESS);
    }

    for p in &parsed {
        let measure = match p.measure {
            Measure::Wavelength(nm) => format!("{} nm", nm),
            Measure::Hb(species) => species.name().to_string(),
        };
        println!(
            "{:<14} -> {:<12} source {:<4} detector {:<4} {:<10} {}",
            p.label,
            p.canonical,
            p.source_index,
            p.detector_index,
            p.channel_type.to_string(),
            measure
        );
    }

    exit_codes::SUCCESS
}
