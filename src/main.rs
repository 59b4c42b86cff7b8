mod output;
mod page;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

/// Files extracted in parallel before their lines are written out.
const BATCH_CHUNK: usize = 256;

#[derive(Parser)]
#[command(name = "page_signals", about = "Extract SEO/AEO signals from HTML as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract signals from one HTML file (reads stdin when no file is given)
    Extract {
        /// HTML file to analyze
        file: Option<PathBuf>,
        /// Page URL for internal/external link classification (default: the file path)
        #[arg(long)]
        url: Option<String>,
        /// Minified JSON instead of indented
        #[arg(long)]
        compact: bool,
        /// Comma-separated top-level fields to keep (e.g. title,word_count,schema_types)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
    /// Extract many files in parallel, one compact JSON object per line
    Batch {
        /// HTML files; each file path doubles as its page URL
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Comma-separated top-level fields to keep
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            file,
            url,
            compact,
            fields,
        } => {
            let html = read_input(file.as_deref())?;
            let url = url
                .filter(|u| !u.is_empty())
                .or_else(|| file.as_ref().map(|f| f.display().to_string()))
                .unwrap_or_default();
            let fields = clean_fields(fields);

            let signals = page::extract_signals(&html, &url);
            println!("{}", output::render(&signals, fields.as_deref(), compact)?);
            Ok(())
        }
        Commands::Batch { files, fields } => {
            let fields = clean_fields(fields);
            let stats = run_batch(&files, fields.as_deref())?;
            info!(
                "Extracted {} pages ({} ok, {} errors) in {}",
                stats.total,
                stats.ok,
                stats.errors,
                format_duration(t0.elapsed())
            );
            Ok(())
        }
    };

    debug!("Done in {}", format_duration(t0.elapsed()));
    result
}

struct BatchStats {
    total: usize,
    ok: usize,
    errors: usize,
}

fn run_batch(files: &[PathBuf], fields: Option<&[String]>) -> Result<BatchStats> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut stats = BatchStats {
        total: files.len(),
        ok: 0,
        errors: 0,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for chunk in files.chunks(BATCH_CHUNK) {
        // Documents share nothing, so each one is extracted on its own thread.
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| extract_file(path, fields))
            .collect();

        for (path, result) in chunk.iter().zip(results) {
            match result {
                Ok(line) => {
                    writeln!(out, "{}", line)?;
                    stats.ok += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    stats.errors += 1;
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    out.flush()?;
    pb.finish_and_clear();
    Ok(stats)
}

fn extract_file(path: &Path, fields: Option<&[String]>) -> Result<String> {
    let html = read_input(Some(path))?;
    let signals = page::extract_signals(&html, &path.display().to_string());
    output::render(&signals, fields, true)
}

/// Read the document as UTF-8, replacing invalid sequences.
fn read_input(file: Option<&Path>) -> Result<String> {
    let bytes = match file {
        Some(path) => match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!("File not found: {}", path.display())
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        },
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read HTML from stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn clean_fields(fields: Option<Vec<String>>) -> Option<Vec<String>> {
    fields.map(|list| {
        list.into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    })
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
