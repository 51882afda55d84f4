use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use symtriage::extract::RawExtraction;
use symtriage::{combine, config, dictionary, NlpContext, TriageSummary};

/// Rule-based symptom triage over free text: one sentence per input line,
/// one triage summary per output record.
#[derive(Parser, Debug)]
#[command(name = config::APP_NAME, version = config::APP_VERSION, about)]
struct Cli {
    /// Directory holding the dictionary CSV sources
    #[arg(long, env = "SYMTRIAGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Override the fallback two-column dataset path
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Input file with one sentence per line; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Emit one JSON object per line instead of a pretty-printed array
    #[arg(long)]
    ndjson: bool,

    /// Include the raw extraction alongside each summary
    #[arg(long)]
    raw: bool,
}

#[derive(Serialize)]
struct LineReport {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<RawExtraction>,
    summary: TriageSummary,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    let mut sources = dictionary::DictionarySources::from_data_dir(&data_dir);
    if let Some(path) = cli.dictionary {
        sources = sources.with_fallback(path);
    }

    let loaded = dictionary::load_terms(&sources)?;
    tracing::info!(
        source = %loaded.source_name,
        symptoms = loaded.terms.symptoms.len(),
        diseases = loaded.terms.diseases.len(),
        "starting {} v{}",
        config::APP_NAME,
        config::APP_VERSION
    );
    let ctx = NlpContext::new(loaded.terms);

    let reader: Box<dyn BufRead> = match cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut reports = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let sentence = line.trim();
        if sentence.is_empty() {
            continue;
        }
        let extraction = ctx.extract(sentence);
        let summary = combine(&extraction);
        reports.push(LineReport {
            input: sentence.to_string(),
            raw: cli.raw.then_some(extraction),
            summary,
        });
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.ndjson {
        for report in &reports {
            serde_json::to_writer(&mut out, report)?;
            writeln!(out)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    }

    Ok(())
}
