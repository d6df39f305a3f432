//! CLI binary for sheet_report.
//!
//! A thin shim over the library crate: loads one workbook, applies the
//! filters given on the command line, renders one PDF per customer and
//! bundles them into an archive.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sheet_report::{bundle, Field, FilterSpec, ReportConfig, ReportRenderer, Session, Source};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # One report per customer in ./relatorios, plus relatorios.zip
  sheet-report frota.xlsx

  # Only two customers in Recife
  sheet-report frota.xlsx --cliente "Acme" --cliente "Beta" --cidade Recife

  # Values available for a filter
  sheet-report frota.xlsx --list Cidade

ENVIRONMENT VARIABLES:
  SHEET_REPORT_OUTPUT_DIR   Output directory for the documents
  SHEET_REPORT_ARCHIVE      Archive file name
  RUST_LOG                  Overrides the log filter
"#;

/// Generate per-customer PDF reports from an equipment spreadsheet.
#[derive(Parser, Debug)]
#[command(
    name = "sheet-report",
    version,
    about = "Generate per-customer PDF reports from an equipment spreadsheet",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Workbook to read (.xlsx or .xlsm).
    input: PathBuf,

    /// Directory receiving the documents.
    #[arg(short, long, env = "SHEET_REPORT_OUTPUT_DIR", default_value = "relatorios")]
    output_dir: PathBuf,

    /// File name of the archive written into the output directory.
    #[arg(short, long, env = "SHEET_REPORT_ARCHIVE", default_value = "relatorios.zip")]
    archive: String,

    /// Keep only these customers (repeatable).
    #[arg(long)]
    cliente: Vec<String>,

    /// Keep only these cities (repeatable).
    #[arg(long)]
    cidade: Vec<String>,

    /// Keep only these operating statuses (repeatable).
    #[arg(long)]
    status: Vec<String>,

    /// Keep only these maintenance values (repeatable).
    #[arg(long)]
    manutencao: Vec<String>,

    /// Print the distinct values of a column and exit.
    #[arg(long, value_name = "FIELD")]
    list: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn filter_spec(&self) -> Result<FilterSpec> {
        let spec = FilterSpec::new()
            .with(Field::Cliente, self.cliente.iter().cloned())?
            .with(Field::Cidade, self.cidade.iter().cloned())?
            .with(Field::StatusFuncionamento, self.status.iter().cloned())?
            .with(Field::Manutencao, self.manutencao.iter().cloned())?;
        Ok(spec)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new();
    let report = session.load(Source::Path(cli.input.clone()));
    if !report.ok {
        bail!("{}", report.message);
    }
    eprintln!("{}", report.message);

    if let Some(field) = &cli.list {
        for value in session.distinct_values(field) {
            println!("{}", value);
        }
        return Ok(());
    }

    let table = session.filter(&cli.filter_spec()?)?;
    let customers = table.customers().len();
    println!("Total records: {}", table.len());
    println!("Total customers: {}", customers);
    if table.is_empty() {
        eprintln!("No records match the filters; nothing to render.");
        return Ok(());
    }

    let config = ReportConfig::default()
        .with_output_dir(&cli.output_dir)
        .with_archive_name(&cli.archive);
    let renderer = ReportRenderer::new(config);
    let documents = renderer.render_all(&table).context("Failed to render reports")?;
    for document in &documents {
        println!("{}", document.display());
    }
    let archive = bundle(&documents, &renderer.config().archive_path()).context("Failed to write archive")?;
    println!("{} PDFs generated, bundled in {}", customers, archive.display());
    Ok(())
}
