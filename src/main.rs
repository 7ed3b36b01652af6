mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::commands::run::RunArgs;
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();
    cli::output::configure(args.verbose, args.quiet);

    let result = match &args.command {
        Commands::Run {
            config,
            dry_run,
            skip_existing,
            strict,
            journal,
        } => cli::commands::run::execute(
            config,
            &RunArgs {
                dry_run: *dry_run,
                skip_existing: *skip_existing,
                strict: *strict,
                journal: journal.clone(),
            },
        ),
        Commands::Sweep {
            target_dir,
            extensions,
            days_old,
            dry_run,
        } => cli::commands::sweep::execute(target_dir, extensions, *days_old, *dry_run),
        Commands::History {
            journal,
            config,
            target,
            since,
            last,
        } => cli::commands::history::execute(
            journal.as_deref(),
            config.as_deref(),
            target.as_deref(),
            since.as_deref(),
            *last,
        ),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        if e.is_fatal() {
            cli::output::error("Run aborted before any target was processed.");
        }
        std::process::exit(1);
    }
}
