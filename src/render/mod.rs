//! # Document Rendering
//!
//! Turns a [`Table`] into one landscape PDF report per customer. Documents are
//! written to `<output_dir>/<safe name>.pdf`; rows keep their table order and
//! the header row repeats on every page.

pub(crate) mod font;
pub(crate) mod layout;
pub(crate) mod pdf;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::render::layout::RowLayout;
use crate::table::Table;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use tracing::warn;

/// File name used when a customer name has no usable characters
const UNNAMED: &str = "unnamed";

/// Low-level failures while writing documents or archives.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    PdfError(#[from] lopdf::Error),

    #[error("{0}")]
    ArchiveError(#[from] zip::result::ZipError),
}

/// Keeps letters, digits, spaces, `-` and `_`, then trims.
/// Distinct customers may share a safe name; the later document wins.
pub fn safe_name(customer: &str) -> String {
    let name: String = customer
        .chars()
        .filter(|character| character.is_alphanumeric() || matches!(character, ' ' | '-' | '_'))
        .collect();
    match name.trim() {
        "" => UNNAMED.to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

/// Renders per-customer reports with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct ReportRenderer {
    config: ReportConfig,
}

impl ReportRenderer {
    pub fn new(config: ReportConfig) -> Self {
        ReportRenderer { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Writes one document per distinct customer, in first-encountered order,
    /// and returns their paths. The first failure aborts the batch; documents
    /// already written stay in place.
    pub fn render_all(&self, table: &Table) -> Result<Vec<PathBuf>, ReportError> {
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|error| ReportError::RenderError {
            customer: String::new(),
            source: error.into(),
        })?;

        let mut written: HashMap<String, &str> = HashMap::new();
        let mut paths = Vec::new();
        for customer in table.customers() {
            let name = safe_name(customer);
            if let Some(previous) = written.insert(name.to_owned(), customer) {
                warn!("Customers '{}' and '{}' share the file name '{}.pdf'; keeping the last one", previous, customer, name);
            }
            let path = output_dir.join(format!("{}.pdf", name));
            let rows: Vec<RowLayout> = table.customer_records(customer).map(RowLayout::body).collect();
            let title = format!("{}{}", self.config.title_prefix, customer);
            let pages = pdf::write_report(&path, &title, &rows).map_err(|source| ReportError::RenderError {
                customer: customer.to_owned(),
                source,
            })?;
            info!("Wrote report for '{}' ({} row(s), {} page(s)) to '{}'", customer, rows.len(), pages, path.display());
            paths.push(path);
        }
        Ok(paths)
    }
}
