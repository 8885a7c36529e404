use clap::Parser;

mod cli;
mod commands;
mod exit_codes;
mod input;
mod output;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        cli::Command::Validate(args) => args.quiet,
        cli::Command::Batch(args) => args.quiet,
        _ => false,
    };

    let log_level = match cli.verbose {
        0 if quiet => log::LevelFilter::Error,
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let exit_code = match cli.command {
        cli::Command::Parse(args) => commands::parse::execute(args),
        cli::Command::Format(args) => commands::format::execute(args),
        cli::Command::Validate(args) => commands::validate::execute(args),
        cli::Command::Batch(args) => commands::batch::execute(args),
    };

    std::process::exit(exit_code);
}
