//! sheetdiff CLI - compare spreadsheets and highlight the differences

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetdiff::prelude::*;
use sheetdiff::{parse_mapping, DEFAULT_COMMENT_AUTHOR, DEFAULT_HIGHLIGHT};
use sheetdiff_xlsx::XlsxReader;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(
    author,
    version,
    about = "Compare two spreadsheets cell by cell, writing a highlighted copy and a change log"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one sheet of each document
    Single {
        #[command(flatten)]
        files: FileArgs,

        /// Sheet of the source document
        #[arg(long, default_value = "Sheet1")]
        source_sheet: String,

        /// Sheet of the comparison document (default: same as source)
        #[arg(long)]
        comparison_sheet: Option<String>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Compare sheets matched by name
    Mapped {
        #[command(flatten)]
        files: FileArgs,

        /// Sheet mapping SOURCE=COMPARISON (repeatable)
        #[arg(short, long = "map", value_name = "SRC=CMP", required = true)]
        mappings: Vec<String>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Compare explicit sheet pairs, each into its own output sheet
    Pairs {
        #[command(flatten)]
        files: FileArgs,

        /// Sheet pair SOURCE:COMPARISON[:DISPLAY] (repeatable)
        #[arg(long = "pair", value_name = "SRC:CMP[:NAME]", required = true)]
        pairs: Vec<String>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Run a comparison described by a TOML job file
    Run {
        /// Job file
        job: PathBuf,
    },

    /// List the sheets of a document
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },
}

#[derive(Args)]
struct FileArgs {
    /// The old document
    source: PathBuf,

    /// The new document
    comparison: PathBuf,

    /// Highlighted output document
    #[arg(short, long)]
    output: PathBuf,

    /// Change log (default: output path with a .txt extension)
    #[arg(short, long)]
    log: Option<PathBuf>,
}

#[derive(Args)]
struct FormatArgs {
    /// Highlight fill color, RRGGBB or AARRGGBB
    #[arg(long, default_value = DEFAULT_HIGHLIGHT)]
    color: String,

    /// Keep the original formatting of the documents
    #[arg(short, long)]
    preserve: bool,

    /// Note the old value on each changed cell
    #[arg(short = 'c', long)]
    comments: bool,

    /// Author of old-value notes
    #[arg(long, default_value = DEFAULT_COMMENT_AUTHOR)]
    author: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Single {
            files,
            source_sheet,
            comparison_sheet,
            format,
        } => {
            let comparison_sheet = comparison_sheet.unwrap_or_else(|| source_sheet.clone());
            let selection = SheetSelection::Single {
                source_sheet,
                comparison_sheet,
            };
            execute(&build_options(files, format), &selection)
        }
        Commands::Mapped {
            files,
            mappings,
            format,
        } => {
            let mut mapping = BTreeMap::new();
            for spec in &mappings {
                let (source, comparison) = parse_mapping(spec)?;
                if mapping.insert(source.clone(), comparison).is_some() {
                    bail!("source sheet '{}' is mapped more than once", source);
                }
            }
            execute(
                &build_options(files, format),
                &SheetSelection::Mapped { mapping },
            )
        }
        Commands::Pairs {
            files,
            pairs,
            format,
        } => {
            let pairs = pairs
                .iter()
                .map(|spec| SheetPair::parse(spec))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            execute(
                &build_options(files, format),
                &SheetSelection::Paired { pairs },
            )
        }
        Commands::Run { job } => {
            let job = Job::load(&job)
                .with_context(|| format!("Failed to load job file '{}'", job.display()))?;
            execute(&job.options, &job.sheets)
        }
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn build_options(files: FileArgs, format: FormatArgs) -> CompareOptions {
    let log = files
        .log
        .unwrap_or_else(|| files.output.with_extension("txt"));
    CompareOptions::new(files.source, files.comparison, files.output, log)
        .with_highlight_color(format.color)
        .with_preserve_formatting(format.preserve)
        .with_show_old_in_comment(format.comments)
        .with_comment_author(format.author)
}

fn execute(options: &CompareOptions, selection: &SheetSelection) -> Result<()> {
    tracing::debug!(?selection, "starting comparison");
    let mut storage = FsStorage::new();
    let summary = compare(&mut storage, options, selection, &mut TracingProgress)
        .context("Comparison failed")?;

    for section in &summary.sections {
        match &section.skipped {
            Some(reason) => eprintln!("  {}: skipped ({})", section.label, reason),
            None => eprintln!("  {}: {} difference(s)", section.label, section.differences),
        }
    }
    eprintln!(
        "{} difference(s); wrote '{}' and '{}'",
        summary.total,
        options.output.display(),
        options.log.display()
    );

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let names = XlsxReader::sheet_names(BufReader::new(file))
        .with_context(|| format!("Failed to read sheets of '{}'", input.display()))?;

    for (i, name) in names.iter().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}
