//! The `gradviz` command line.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gradviz::{
    cli::{simulate, Cli, Commands, ObjectiveName},
    config::{load_config, Config},
};
use gradviz_render::{
    export::{export_all, ExportPlan, OutputFormat},
    figures::Figure,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    debug!(output = ?config.output, "loaded configuration");

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Render {
            figures,
            all,
            output,
            formats,
        } => cmd_render(&config, figures, all, output, formats),
        Commands::Trajectory {
            objective,
            start,
            learning_rate,
            iterations,
            json,
        } => cmd_trajectory(objective, &start, learning_rate, iterations, json),
    }
}

fn cmd_list() -> Result<()> {
    let width = Figure::ALL
        .iter()
        .map(|f| f.name().len())
        .max()
        .unwrap_or_default();
    for figure in Figure::ALL {
        println!("{:<width$}  {}", figure.name(), figure.title());
    }
    Ok(())
}

fn cmd_render(
    config: &Config,
    figures: Vec<Figure>,
    all: bool,
    output: Option<PathBuf>,
    formats: Vec<OutputFormat>,
) -> Result<()> {
    let selected = if all {
        Figure::ALL.to_vec()
    } else if figures.is_empty() {
        bail!("name at least one figure (see `gradviz list`) or pass --all");
    } else {
        figures
    };

    let configured = config.output.plan()?;
    let directory = output.unwrap_or(configured.directory);
    let plan = if formats.is_empty() {
        ExportPlan::new(directory, configured.formats)
    } else {
        ExportPlan::new(directory, formats)
    };
    info!(
        figures = selected.len(),
        directory = %plan.directory.display(),
        "rendering"
    );

    let reports = export_all(&selected, &config.style, &plan).context("invalid chart style")?;

    let mut attempted = 0;
    let mut failed = 0;
    for outcome in reports.iter().flat_map(|r| &r.outcomes) {
        attempted += 1;
        match &outcome.result {
            Ok(()) => println!("{}", outcome.path.display()),
            Err(error) => {
                failed += 1;
                eprintln!("error: {}: {error}", outcome.path.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {attempted} files could not be written");
    }
    Ok(())
}

fn cmd_trajectory(
    objective: ObjectiveName,
    start: &[f64],
    learning_rate: f64,
    iterations: usize,
    json: bool,
) -> Result<()> {
    let report = simulate(objective, start, learning_rate, iterations)
        .with_context(|| format!("simulating {}", objective.name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.table());
        if report.diverged() {
            eprintln!("note: the loss grew; try a learning rate below {learning_rate}");
        }
    }
    Ok(())
}
