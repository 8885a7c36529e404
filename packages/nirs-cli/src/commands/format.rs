use crate::cli::FormatArgs;
use crate::exit_codes;
use nirs_channels::{format_channel_label, Measure};

pub fn execute(args: FormatArgs) -> i32 {
    let measure = match (args.wavelength, args.hb) {
        (Some(nm), None) => Measure::Wavelength(nm),
        (None, Some(species)) => Measure::Hb(species),
        _ => {
            eprintln!("Error: Exactly one of --wavelength or --hb must be given");
            return exit_codes::INPUT_ERROR;
        }
    };

    println!("{}", format_channel_label(args.source, args.detector, measure));
    exit_codes::SUCCESS
}
