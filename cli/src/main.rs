//! relayout CLI - layout reconstruction for backend document exports

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use relayout::{
    BatchEvent, BatchProcessor, BatchReport, DocumentRecord, DocumentStats, FileOutcome,
    JsonFormat, LayoutOptions, OutputFormat,
};

#[derive(Parser)]
#[command(name = "relayout")]
#[command(version)]
#[command(about = "Reconstruct document layout from conversion-backend exports", long_about = None)]
struct Cli {
    /// Input export files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for one input, output directory for several
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Keep fragmented text runs as separate items
    #[arg(long)]
    no_merge: bool,

    /// Process pages and files one at a time
    #[arg(long)]
    sequential: bool,

    /// Print document statistics as JSON instead of the summary
    #[arg(long)]
    stats: bool,

    /// Minimum gap between left edges that opens a new column
    #[arg(long, env = "RELAYOUT_COLUMN_GAP", value_name = "UNITS")]
    column_gap: Option<f64>,

    /// Row band height used for reading order
    #[arg(long, env = "RELAYOUT_ROW_HEIGHT", value_name = "UNITS")]
    row_height: Option<f64>,

    /// Maximum horizontal gap for merging fragments
    #[arg(long, env = "RELAYOUT_MERGE_GAP", value_name = "UNITS")]
    merge_gap: Option<f64>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Document record as JSON
    Json,
    /// Item text in reading order
    Text,
}

impl Cli {
    fn layout_options(&self) -> LayoutOptions {
        let mut options = LayoutOptions::new()
            .with_merge(!self.no_merge)
            .with_parallel(!self.sequential);
        if let Some(gap) = self.column_gap {
            options = options.with_column_gap(gap);
        }
        if let Some(height) = self.row_height {
            options = options.with_row_height(height);
        }
        if let Some(gap) = self.merge_gap {
            options = options.with_merge_gap(gap);
        }
        options
    }

    fn output_format(&self) -> OutputFormat {
        match self.format {
            Format::Text => OutputFormat::Text,
            Format::Json if self.compact => OutputFormat::Json(JsonFormat::Compact),
            Format::Json => OutputFormat::Json(JsonFormat::Pretty),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = if cli.inputs.len() == 1 {
        cmd_single(&cli, &cli.inputs[0])
    } else {
        cmd_batch(&cli)
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_single(cli: &Cli, input: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let format = cli.output_format();
    let doc = relayout::reconstruct_file_with_options(input, cli.layout_options())?;

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => BatchProcessor::new()
            .with_format(format)
            .output_path_for(input),
    };
    relayout::write_record(&doc, &output, format)?;

    if cli.stats {
        let stats = DocumentStats::from_document(&doc);
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_summary(&doc, &output);
    }
    Ok(true)
}

fn cmd_batch(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut processor = BatchProcessor::new()
        .with_options(cli.layout_options())
        .with_format(cli.output_format());
    if let Some(dir) = &cli.output {
        processor = processor.with_output_dir(dir);
    }
    if cli.sequential {
        processor = processor.sequential();
    }
    log::debug!("Batch mode with {} inputs", cli.inputs.len());

    let pb = ProgressBar::new(cli.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let report = std::thread::scope(|scope| {
        let processor = &processor;
        let inputs = &cli.inputs;
        let worker = scope.spawn(move || processor.run_with_events(inputs, tx));

        for event in rx.iter() {
            match event {
                BatchEvent::Started { total } => pb.set_length(total as u64),
                BatchEvent::FileFinished(result) => {
                    pb.set_message(result.input.display().to_string());
                    pb.inc(1);
                }
                BatchEvent::Finished { .. } => pb.finish_and_clear(),
            }
        }

        worker.join()
    })
    .map_err(|_| "batch worker panicked")?;

    print_report(&report);
    Ok(report.all_succeeded())
}

fn print_summary(doc: &DocumentRecord, output: &Path) {
    let stats = DocumentStats::from_document(doc);

    println!("{} {}", "Saved to".green(), output.display());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Items".bold(), stats.item_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Form items".bold(), stats.form_items());
    println!("{}: {}", "Multi-column pages".bold(), stats.multi_column_pages);
    println!("{}: {}", "Merged items".bold(), stats.merged_items);
    if stats.warnings > 0 {
        println!("{}: {}", "Warnings".yellow().bold(), stats.warnings);
    }
    println!(
        "{}: {:.3}s",
        "Processing time".bold(),
        doc.metadata.processing_time
    );
}

fn print_report(report: &BatchReport) {
    for result in &report.results {
        match &result.outcome {
            FileOutcome::Success {
                output,
                items,
                tables,
                ..
            } => println!(
                "{} {} -> {} ({} items, {} tables)",
                "✓".green(),
                result.input.display(),
                output.display(),
                items,
                tables
            ),
            FileOutcome::Failure { error } => {
                println!("{} {}: {}", "✗".red(), result.input.display(), error)
            }
        }
    }

    println!();
    let summary = format!(
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    if report.all_succeeded() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}
