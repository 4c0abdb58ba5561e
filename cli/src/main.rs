//! pdfstruct CLI - PDF layout extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfstruct::batch::extract_batch_with_progress;
use pdfstruct::{extract_structure_with_options, JsonFormat, LayoutOptions};

#[derive(Parser)]
#[command(name = "pdfstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract ordered text blocks and tables from PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract document structure as JSON
    Extract {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compact JSON output
        #[arg(short, long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show page and element counts
    Summary {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

/// Layout thresholds. Flags override the config file, which overrides defaults.
#[derive(Args, Debug)]
struct LayoutArgs {
    /// JSON file with layout options
    #[arg(long, value_name = "FILE", env = "PDFSTRUCT_CONFIG")]
    config: Option<PathBuf>,

    /// Vertical tolerance for grouping lines into rows
    #[arg(long, value_name = "UNITS", env = "PDFSTRUCT_ROW_TOLERANCE")]
    row_tolerance: Option<f32>,

    /// Largest vertical gap between rows of one table
    #[arg(long, value_name = "UNITS", env = "PDFSTRUCT_ROW_GAP")]
    row_gap: Option<f32>,

    /// Rows needed before a candidate becomes a table
    #[arg(long, value_name = "N", env = "PDFSTRUCT_MIN_TABLE_ROWS")]
    min_table_rows: Option<usize>,

    /// Cells needed before a row counts as table evidence
    #[arg(long, value_name = "N", env = "PDFSTRUCT_MIN_ROW_CELLS")]
    min_row_cells: Option<usize>,

    /// Skip the native table finder
    #[arg(long, env = "PDFSTRUCT_NO_NATIVE")]
    no_native: bool,
}

impl LayoutArgs {
    fn to_options(&self) -> pdfstruct::Result<LayoutOptions> {
        let mut options = match &self.config {
            Some(path) => LayoutOptions::from_file(path)?,
            None => LayoutOptions::default(),
        };

        if let Some(tolerance) = self.row_tolerance {
            options = options.with_row_tolerance(tolerance);
        }
        if let Some(gap) = self.row_gap {
            options = options.with_max_row_gap(gap);
        }
        if let Some(rows) = self.min_table_rows {
            options = options.with_min_table_rows(rows);
        }
        if let Some(cells) = self.min_row_cells {
            options = options.with_min_row_cells(cells);
        }
        if self.no_native {
            options = options.heuristic_only();
        }

        options.validate()?;
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            inputs,
            output,
            compact,
            layout,
        } => cmd_extract(&inputs, output.as_deref(), compact, &layout),
        Commands::Summary { input, layout } => cmd_summary(&input, &layout),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.to_options()?;
    log::debug!("layout options: {:?}", options);
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = match inputs {
        [input] => {
            let structure = extract_structure_with_options(input, &options)?;
            pdfstruct::render::to_json(&structure, format)?
        }
        _ => {
            let pb = ProgressBar::new(inputs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );

            let report = extract_batch_with_progress(inputs, &options, |outcome| {
                pb.set_message(outcome.file.clone());
                pb.inc(1);
            });
            pb.finish_with_message("Done!");

            eprintln!(
                "{} {} succeeded, {} failed",
                "Batch:".cyan().bold(),
                report.succeeded.to_string().green(),
                report.failed.to_string().red()
            );
            for failure in report.failures() {
                eprintln!(
                    "  {} {}: {}",
                    "└─".dimmed(),
                    failure.file,
                    failure.error.as_deref().unwrap_or("unknown error")
                );
            }

            if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            }
        }
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_summary(input: &Path, layout: &LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.to_options()?;
    let structure = extract_structure_with_options(input, &options)?;
    let summary = structure.summary;

    println!("{}", "Document Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), summary.total_pages);
    println!("{}: {}", "Text blocks".bold(), summary.total_text_blocks);
    println!("{}: {}", "Tables".bold(), summary.total_tables);

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &structure.pages {
        let line = format!(
            "page {:>3}: {} text blocks, {} tables",
            page.page_number,
            page.text_block_count(),
            page.table_count()
        );
        if page.is_empty() {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout inference for PDF documents");
}
