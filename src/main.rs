use anyhow::Result;
use clap::Parser;

use aps_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.command.name());
    let log = logging::Logger::new(args.command.name());

    match &args.command {
        cli::Command::Init(opts) => commands::init::run(&args.global, opts, &log),
        cli::Command::Doctor(opts) => {
            commands::doctor::run(&args.global, opts, &mut std::io::stdout().lock(), &log)
        }
        cli::Command::Platforms => {
            commands::platforms::run(&args.global, &mut std::io::stdout().lock(), &log)
        }
        cli::Command::Version => commands::version::run(&mut std::io::stdout().lock()),
    }
}
