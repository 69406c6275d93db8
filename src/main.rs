//! precis — summarize a PDF or ask it a question from the command line.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use precis::cli::{load_config, run, Cli};
use precis::Summarizer;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(pdf = %cli.pdf.display(), mode = %cli.mode, "starting");

    let setup = load_config(&cli).and_then(|config| {
        let summarizer = Summarizer::from_config(&config)?;
        Ok((config, summarizer))
    });
    let (config, summarizer) = match setup {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = run(
        &cli,
        &config,
        &summarizer,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    ExitCode::from(code)
}
