use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use breathe::cli::args::{Cli, Commands};
use breathe::cli::commands::{self, Context};
use breathe::config::{ColorSetting, Paths};
use breathe::error::BreatheError;
use breathe::logging::{init_logging, LogSink};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e.downcast_ref::<BreatheError>().map_or(1, BreatheError::exit_code);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::with_paths(&cli, Paths::new()?)?;
    let color = ctx.color(&cli);

    // The full-screen view owns the terminal, so its logs go to a file.
    let sink = if matches!(cli.command, Commands::Start(_)) {
        ctx.paths.ensure_dirs()?;
        LogSink::File(ctx.paths.log_file.clone())
    } else {
        LogSink::Stderr
    };
    init_logging(cli.verbose, &sink, color)?;

    match color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let output = match &cli.command {
        Commands::Start(args) => commands::start(&ctx, args)?,
        Commands::Plan(args) => commands::plan(&ctx, args)?,
        Commands::Patterns => commands::patterns(&ctx)?,
        Commands::Config(args) => commands::config(&ctx, &args.command)?,
        Commands::Completions { shell } => commands::completions(*shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
