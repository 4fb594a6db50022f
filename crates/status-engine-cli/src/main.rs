use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use status_engine::{DayEnumeration, Evaluation, QueryDocument, RecordVerdict, WeekStartDay};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Evaluate status records against a datetime interval.
#[derive(Parser)]
#[command(name = "status-engine", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the statuses that apply during the document's interval
    Eval {
        /// Query document (JSON). Reads stdin when omitted or "-".
        file: Option<PathBuf>,

        /// Interval start, overriding the document (e.g. "2017-01-01 03:00")
        #[arg(long)]
        start: Option<String>,

        /// Interval end (exclusive), overriding the document
        #[arg(long)]
        end: Option<String>,

        /// Which weekday is bit 0 of day masks
        #[arg(long, value_enum)]
        week_start: Option<WeekStartArg>,

        /// Also check the day after the interval, as the padded enumeration does
        #[arg(long)]
        padded_days: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Report why each record does or does not apply
        #[arg(long)]
        explain: bool,
    },
    /// Parse a query document and report how many records it holds
    Check {
        /// Query document (JSON). Reads stdin when omitted or "-".
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStartArg {
    Monday,
    Sunday,
}

impl From<WeekStartArg> for WeekStartDay {
    fn from(arg: WeekStartArg) -> Self {
        match arg {
            WeekStartArg::Monday => WeekStartDay::Monday,
            WeekStartArg::Sunday => WeekStartDay::Sunday,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Eval {
            file,
            start,
            end,
            week_start,
            padded_days,
            format,
            explain,
        } => {
            let mut doc = load_document(file.as_ref())?;
            if start.is_some() {
                doc.start = start;
            }
            if end.is_some() {
                doc.end = end;
            }
            if let Some(ws) = week_start {
                doc.week_start = ws.into();
            }
            if padded_days {
                doc.days = DayEnumeration::Padded;
            }

            let evaluation = if explain {
                doc.explain()
            } else {
                doc.evaluate()
            };
            let evaluation = evaluation.context("Failed to evaluate document")?;

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&evaluation)
                    .context("Failed to serialize result")?,
                OutputFormat::Text => render_text(&evaluation),
            };
            println!("{output}");
        }
        Commands::Check { file } => {
            let doc = load_document(file.as_ref())?;
            let records = doc.records().context("Invalid records")?;
            if doc.start.is_some() || doc.end.is_some() {
                doc.interval().context("Invalid interval")?;
            }
            println!(
                "ok: {} record(s), {} named status(es)",
                records.len(),
                doc.statuses.len()
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_document(file: Option<&PathBuf>) -> Result<QueryDocument> {
    let json = read_input(file)?;
    let doc = QueryDocument::from_json(&json).context("Failed to parse query document")?;
    debug!(
        records = doc.records.len(),
        statuses = doc.statuses.len(),
        "document loaded"
    );
    Ok(doc)
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render_text(evaluation: &Evaluation) -> String {
    let mut lines = vec![format!(
        "mask: {} ({})",
        evaluation.mask,
        evaluation.mask.bits()
    )];
    if !evaluation.names.is_empty() {
        lines.push(format!("statuses: {}", evaluation.names.join(", ")));
    }
    if !evaluation.unnamed_bits.is_empty() {
        lines.push(format!("unnamed bits: {}", evaluation.unnamed_bits));
    }
    for (idx, verdict) in evaluation.verdicts.iter().enumerate() {
        let line = match verdict {
            RecordVerdict::Applies { day } => format!("record #{idx}: applies ({day})"),
            other => format!("record #{idx}: {}", other.reason()),
        };
        lines.push(line);
    }
    lines.join("\n")
}
