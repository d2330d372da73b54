//! qrforge - QR payload generator with local history
//!
//! Records are supplied as JSON files matching the tagged shape used by
//! the history schema, e.g. `{"type":"url","url":"https://example.com"}`.

mod renderer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use qrforge_core::history::{FileBackend, HistoryStore, SortCriterion};
use qrforge_core::models::{ColorConfig, Record, RecordKind};
use qrforge_core::payload;
use qrforge_core::render::{ExportFormat, Renderer};
use renderer::SvgRenderer;

/// qrforge - generate QR payloads and manage generation history
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a record file and print its payload string
    Encode {
        /// Path to the record JSON file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Render a record as an SVG file
    Render {
        /// Path to the record JSON file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Output SVG path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Foreground color
        #[arg(long, default_value = "#000000")]
        fg: String,
        /// Background color
        #[arg(long, default_value = "#ffffff")]
        bg: String,
        /// Minimum output dimension in pixels
        #[arg(long, default_value_t = 1024)]
        size: u32,
    },
    /// Inspect and manage the local generation history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List stored items
    List {
        /// Only show items of this record kind
        #[arg(long, value_name = "KIND")]
        kind: Option<RecordKind>,
        /// Sort order: newest, oldest or type
        #[arg(long, default_value = "newest")]
        sort: SortCriterion,
    },
    /// Show one item as JSON
    Show { id: String },
    /// Save a record file into history
    Save {
        /// Path to the record JSON file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Delete one item
    Delete { id: String },
    /// Delete all items
    Clear,
    /// Write the history document as JSON
    Export {
        /// Output path; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Merge a previously exported document into history
    Import {
        /// Path to the exported JSON file
        input: PathBuf,
    },
}

fn read_record(path: &PathBuf) -> Result<Record> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file: {}", path.display()))?;
    let record: Record = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse record file: {}", path.display()))?;
    payload::validate(&record)?;
    Ok(record)
}

fn open_store() -> Result<HistoryStore<FileBackend>> {
    let backend = FileBackend::default_location().context("No usable data directory")?;
    Ok(HistoryStore::new(backend))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("qrforge=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Encode { input } => {
            let record = read_record(&input)?;
            println!("{}", payload::format(&record));
        }
        Command::Render {
            input,
            output,
            fg,
            bg,
            size,
        } => {
            let record = read_record(&input)?;
            let colors = ColorConfig {
                foreground: fg,
                background: bg,
                ..Default::default()
            };
            let bytes = SvgRenderer.export(
                &payload::format(&record),
                &colors,
                ExportFormat::Svg,
                Some(size),
            )?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        Command::History { command } => run_history(command)?,
    }

    Ok(())
}

fn run_history(command: HistoryCommand) -> Result<()> {
    let mut store = open_store()?;

    match command {
        HistoryCommand::List { kind, sort } => {
            let items = match kind {
                Some(kind) => store.filter_by_kind(kind),
                None => store.sorted(sort),
            };
            if items.is_empty() {
                println!("history is empty");
                return Ok(());
            }
            for item in items {
                println!(
                    "{}  {:10}  {}",
                    item.id,
                    item.kind.to_string(),
                    payload::format(&item.data)
                        .lines()
                        .next()
                        .unwrap_or_default()
                );
            }
            println!("({} bytes on disk)", store.size_bytes());
        }
        HistoryCommand::Show { id } => {
            let item = store
                .get_by_id(&id)
                .with_context(|| format!("No history item with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        HistoryCommand::Save { input } => {
            let record = read_record(&input)?;
            match store.save(&record, &ColorConfig::default(), &SvgRenderer) {
                Some(item) => println!("saved {}", item.id),
                None => anyhow::bail!("not saved: duplicate of an existing item or storage failure"),
            }
        }
        HistoryCommand::Delete { id } => {
            if store.delete_by_id(&id) {
                println!("deleted {id}");
            } else {
                anyhow::bail!("No history item with id {id}");
            }
        }
        HistoryCommand::Clear => {
            if !store.clear() {
                anyhow::bail!("Failed to clear history");
            }
            println!("history cleared");
        }
        HistoryCommand::Export { output } => {
            let json = store.export_json();
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Exported history to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        HistoryCommand::Import { input } => {
            let contents = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            if !store.import_json(&contents) {
                anyhow::bail!("Import rejected: not a valid history export");
            }
            println!("imported; history now holds {} items", store.list().len());
        }
    }

    Ok(())
}
