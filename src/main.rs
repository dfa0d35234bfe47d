mod error;
mod parser;
mod record;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use record::SUMMARY_UNAVAILABLE;

#[derive(Parser)]
#[command(name = "fastfact_extract", about = "Fast Fact web-archive extraction engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a single archive file and print the record as JSON
    Extract {
        /// Path to a .mhtml archive
        file: PathBuf,
        /// Also print which strategy/tier produced each heuristic result
        #[arg(short, long)]
        trace: bool,
    },
    /// Extract every .mhtml file in a folder into a JSONL file
    Batch {
        /// Folder containing .mhtml archives
        input: PathBuf,
        /// Output path for one JSON record per line
        #[arg(short, long, default_value = "records.jsonl")]
        output: PathBuf,
        /// Max files to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { file, trace } => extract_one(&file, trace),
        Commands::Batch { input, output, limit } => run_batch(&input, &output, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

/// Source files occasionally carry stray non-UTF-8 bytes; read lossily
/// rather than failing the document.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn extract_one(file: &Path, trace: bool) -> Result<()> {
    let content = read_lossy(file)?;
    let extraction = parser::extract(&file.to_string_lossy(), &content)?;
    if extraction.record.fields.identifier.is_none() {
        warn!(
            "no identifier resolved for {}; downstream must synthesize one",
            file.display()
        );
    }
    println!("{}", serde_json::to_string_pretty(&extraction.record)?);
    if trace {
        println!("{}", serde_json::to_string_pretty(&extraction.trace)?);
    }
    Ok(())
}

struct BatchCounts {
    ok: usize,
    failed: usize,
    no_identifier: usize,
    no_summary: usize,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Extracted {} records ({} failed, {} without identifier, {} without summary).",
            self.ok, self.failed, self.no_identifier, self.no_summary,
        );
    }
}

fn run_batch(input: &Path, output: &Path, limit: Option<usize>) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut files: Vec<PathBuf> = fs::read_dir(input)
        .with_context(|| format!("listing {}", input.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("mhtml")))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .mhtml files found in {}", input.display());
        return Ok(());
    }
    println!("Extracting {} archives...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut writer = BufWriter::new(
        fs::File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    let mut counts = BatchCounts {
        ok: 0,
        failed: 0,
        no_identifier: 0,
        no_summary: 0,
    };
    let mut failures: Vec<(String, String)> = Vec::new();

    for chunk in files.chunks(500) {
        let mut docs: Vec<(String, String)> = Vec::with_capacity(chunk.len());
        for path in chunk {
            match read_lossy(path) {
                Ok(content) => docs.push((path.to_string_lossy().into_owned(), content)),
                Err(e) => {
                    counts.failed += 1;
                    failures.push((path.display().to_string(), e.to_string()));
                }
            }
        }

        // Pure per-document work: parallel with no coordination.
        let results: Vec<_> = docs
            .par_iter()
            .map(|(path, content)| (path.as_str(), parser::extract(path, content)))
            .collect();

        for (path, result) in results {
            match result {
                Ok(extraction) => {
                    if extraction.record.fields.identifier.is_none() {
                        counts.no_identifier += 1;
                        warn!("no identifier resolved for {}; downstream must synthesize one", path);
                    }
                    if extraction.record.summary == SUMMARY_UNAVAILABLE {
                        counts.no_summary += 1;
                    }
                    serde_json::to_writer(&mut writer, &extraction.record)?;
                    writer.write_all(b"\n")?;
                    counts.ok += 1;
                }
                Err(e) => {
                    counts.failed += 1;
                    failures.push((path.to_string(), e.to_string()));
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }
    writer.flush()?;
    pb.finish_and_clear();

    counts.print();
    if !failures.is_empty() {
        println!("\nFailed to process {} files:", failures.len());
        for (path, err) in &failures {
            println!("  - {}: {}", path, err);
        }
    }
    println!("Records written to {}", output.display());
    Ok(())
}
