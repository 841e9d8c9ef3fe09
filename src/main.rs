use anyhow::{anyhow, Context, Result};
use asintota::{
    cli::{Cli, OutputFormat},
    complexity::AnalysisConfig,
    csv_output::CsvOutput,
    json_output::JsonOutput,
    pipeline::{self, AnalysisReport},
    text_output,
};
use clap::Parser;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (if any) with command-line overrides applied
fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let base = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let config = args.apply_to(base);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text_output::render(report),
        OutputFormat::Json => {
            let mut json = JsonOutput::from_report(report)
                .to_json()
                .context("Failed to serialize report")?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => CsvOutput::from_report(report).to_csv(),
    })
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing (--debug raises verbosity)
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let report = pipeline::run(&args.properties, &args.data_dir, &config)?;
    let output = render(&report, args.format)?;

    match &args.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}
