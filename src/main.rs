//! xlsxprice CLI - product-listing spreadsheet converter

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use xlsxprice::preview::{format_size, render_records, render_rows};
use xlsxprice::{
    convert_directory, preview_rows, BatchOptions, Converter, ConverterBuilder, ItemStatus,
    MatchMode, OutputFormat, Session, BUNDLE_FILE_NAME, DEFAULT_PREVIEW_ROWS, DEFAULT_SHEET_NAME,
};

#[derive(Parser)]
#[command(name = "xlsxprice")]
#[command(
    author,
    version,
    about = "Convert \"name price unit\" product listings into country-labelled lines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more spreadsheets
    Convert {
        /// Input spreadsheet files (xlsx, xls, xlsb, ods)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Also bundle all results into one ZIP archive in the output directory
        #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = BUNDLE_FILE_NAME)]
        zip: Option<String>,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Convert every file in a directory
    Batch {
        /// Directory containing the input spreadsheets
        input_dir: PathBuf,

        /// Directory receiving the converted files
        output_dir: PathBuf,

        /// Also bundle all results into one ZIP archive in the output directory
        #[arg(long)]
        zip: bool,

        /// Write a JSON report of the run to this path
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Preview the first rows of a spreadsheet and count recognized rows
    Inspect {
        /// Input spreadsheet file
        file: PathBuf,

        /// Number of rows to preview
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,

        #[command(flatten)]
        options: ConvertOptions,
    },
}

#[derive(Args)]
struct ConvertOptions {
    /// Use the legacy lazy pattern (single-character unit)
    #[arg(long)]
    legacy: bool,

    /// Treat the first row as data instead of a header
    #[arg(long)]
    no_header: bool,

    /// Write CSV instead of XLSX
    #[arg(long)]
    csv: bool,

    /// Name of the output worksheet
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    sheet_name: String,
}

impl ConvertOptions {
    fn build(&self) -> Result<Converter> {
        let mode = if self.legacy {
            MatchMode::Legacy
        } else {
            MatchMode::Trimmed
        };
        let format = if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Xlsx
        };

        ConverterBuilder::new()
            .with_match_mode(mode)
            .with_skip_header(!self.no_header)
            .with_output_format(format)
            .with_sheet_name(self.sheet_name.clone())
            .build()
            .context("invalid converter configuration")
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            files,
            output_dir,
            zip,
            options,
        } => convert_files(&files, &output_dir, zip.as_deref(), &options),
        Commands::Batch {
            input_dir,
            output_dir,
            zip,
            report,
            options,
        } => run_batch(&input_dir, &output_dir, zip, report.as_deref(), &options),
        Commands::Inspect {
            file,
            rows,
            options,
        } => inspect(&file, rows, &options),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn convert_files(
    files: &[PathBuf],
    output_dir: &Path,
    zip: Option<&str>,
    options: &ConvertOptions,
) -> Result<()> {
    let mut session = Session::new(options.build()?);
    let mut failed = 0;

    for path in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let added = fs::read(path)
            .map_err(xlsxprice::XlsxPriceError::from)
            .and_then(|bytes| session.add_file(file_name, &bytes));
        if let Err(e) = added {
            error!(file = %path.display(), error = %e, "could not read file");
            failed += 1;
        }
    }

    session.convert_all();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    for item in session.items() {
        match (&item.status, &item.result) {
            (ItemStatus::Done, Some(result)) => {
                let output = output_dir.join(&result.file_name);
                fs::write(&output, &result.bytes)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                println!(
                    "{} -> {} ({}/{} rows)",
                    item.file_name,
                    output.display(),
                    result.summary.converted_rows,
                    result.summary.total_rows
                );
            }
            _ => {
                error!(file = %item.file_name, status = item.status.label(), "conversion failed");
                failed += 1;
            }
        }
    }

    if let Some(name) = zip {
        if let Some(bytes) = session.bundle()? {
            let path = output_dir.join(name);
            fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(bundle = %path.display(), "wrote bundle");
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) failed to convert", failed, files.len());
    }
    Ok(())
}

fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    zip: bool,
    report_path: Option<&Path>,
    options: &ConvertOptions,
) -> Result<()> {
    let converter = options.build()?;
    let batch_options = BatchOptions {
        bundle_name: zip.then(|| BUNDLE_FILE_NAME.to_string()),
    };

    let report = convert_directory(&converter, input_dir, output_dir, &batch_options)
        .with_context(|| format!("batch conversion of {} failed", input_dir.display()))?;

    if let Some(path) = report_path {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    println!(
        "{} converted, {} failed",
        report.succeeded(),
        report.failed()
    );

    if let Some(e) = &report.bundle_error {
        bail!("failed to write bundle: {}", e);
    }
    if !report.is_success() {
        bail!("{} file(s) failed to convert", report.failed());
    }
    Ok(())
}

fn inspect(path: &Path, rows: usize, options: &ConvertOptions) -> Result<()> {
    let converter = options.build()?;
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let all_rows = converter
        .read_rows(bytes.as_slice())
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "{} • {} • Sheet 1 • {}/{} rows recognized",
        path.display(),
        format_size(bytes.len() as u64),
        converter.count_recognized(&all_rows),
        all_rows.len()
    )?;

    writeln!(out, "\nInput")?;
    let shown = preview_rows(&all_rows, rows);
    render_rows(shown, &mut out)?;

    writeln!(out, "\nConverted")?;
    let records = converter.convert_rows(shown);
    render_records(&records, &mut out)?;

    out.flush()?;
    Ok(())
}
