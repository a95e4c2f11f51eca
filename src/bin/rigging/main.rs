//! Rigging CLI - build-graph composition for multi-project C++ workspaces

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rigging::core::workspace::RootNotFound;
use rigging::util::diagnostic::{emit, suggestions, Diagnostic};
use rigging::util::GlobalContext;
use rigging::ResolveError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("rigging=debug")
    } else {
        EnvFilter::new("rigging=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);
    let manifest_path = cli.manifest_path.as_deref();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&ctx, manifest_path, args),
        Commands::Plan(args) => commands::plan::execute(&ctx, manifest_path, args),
        Commands::Tree(args) => commands::tree::execute(&ctx, manifest_path, args),
        Commands::Toolset(args) => commands::toolset::execute(&ctx, manifest_path, args),
    }
}

fn report(err: &anyhow::Error, color: bool) {
    if let Some(resolve) = err.downcast_ref::<ResolveError>() {
        emit(&resolve.to_diagnostic(), color);
    } else if let Some(not_found) = err.downcast_ref::<RootNotFound>() {
        emit(
            &Diagnostic::error(not_found.to_string()).with_suggestion(suggestions::NO_ROOT),
            color,
        );
    } else {
        eprintln!("error: {:#}", err);
    }
}
