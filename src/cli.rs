//! The `precis` command line: argument parsing, config loading and the
//! presentation of one request.
//!
//! The binary is a thin shell around [`run`]. Status lines go to `err`, the
//! response goes to `out`, and the return value is the process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | response printed (and exported unless `--no-export`) |
//! | 1 | internal failure: unreadable file, model load, generation, export |
//! | 2 | the user's input was unusable: no text in the PDF, missing prompt |

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::{Config, Mode, Request, Summarizer};

/// Summarize a PDF, or answer a prompt about it, chunk by chunk.
#[derive(Parser, Debug)]
#[command(name = "precis", version, about)]
pub struct Cli {
    /// The PDF to read.
    pub pdf: PathBuf,

    /// Summary uses a fixed prompt and the smaller model; custom needs --prompt.
    #[arg(long, value_enum, default_value_t = Mode::SummaryOnly)]
    pub mode: Mode,

    /// Question or instruction to run against each chunk (custom mode only).
    #[arg(long)]
    pub prompt: Option<String>,

    /// Path to a precis.toml config file.
    #[arg(long, env = "PRECIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the number of words per chunk.
    #[arg(long)]
    pub chunk_words: Option<usize>,

    /// Directory to write the plain-text export into.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the response without writing the export file.
    #[arg(long)]
    pub no_export: bool,
}

/// Load the config named by `--config` (or the environment), then apply
/// `--chunk-words`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the result is invalid.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let cfg = Config::from_file(path).with_context(|| format!("loading {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            cfg
        }
        None => Config::from_env()?,
    };
    if let Some(words) = cli.chunk_words {
        config.chunking.words = words;
        config.validate()?;
    }
    Ok(config)
}

/// Run one request and return the exit code.
pub fn run(cli: &Cli, config: &Config, summarizer: &Summarizer, out: &mut dyn Write, err: &mut dyn Write) -> u8 {
    match try_run(cli, config, summarizer, out, err) {
        Ok(code) => code,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            1
        }
    }
}

fn try_run(
    cli: &Cli,
    config: &Config,
    summarizer: &Summarizer,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<u8> {
    let bytes = std::fs::read(&cli.pdf).with_context(|| format!("reading {}", cli.pdf.display()))?;
    let mut request = Request::new(&bytes, cli.mode);
    if let Some(prompt) = cli.prompt.as_deref() {
        if cli.mode.default_prompt().is_some() {
            writeln!(err, "note: --prompt is ignored in {} mode", cli.mode)?;
        }
        request = request.with_prompt(prompt);
    }

    writeln!(err, "Extracting text from PDF...")?;
    let prepared = match summarizer.prepare(&request) {
        Ok(prepared) => prepared,
        Err(e) if e.is_user_facing() => {
            writeln!(err, "error: {e}")?;
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };
    writeln!(err, "Extracted {} words from the document.", prepared.words)?;

    writeln!(err, "Generating response...")?;
    let report = summarizer.generate(&prepared)?;
    writeln!(out, "{}", report.response)?;

    if !cli.no_export {
        let path = report.export(&cli.output_dir, &config.output.file_name)?;
        writeln!(err, "Response saved to {}", path.display())?;
    }
    Ok(0)
}
