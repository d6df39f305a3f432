use crate::error::ReportError;
use crate::spreadsheet::Source;
use crate::table::filter;
use crate::table::filter::FilterSpec;
use crate::table::ingest;
use crate::table::Table;
use tracing::error;
use tracing::info;

/// Outcome of a load, in the shape the interactive caller displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub ok: bool,
    pub message: String,
}

/// Per-caller state: at most one live table, replaced only by a load that
/// fully succeeds.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Loads a workbook and reports the classified outcome.
    /// The previous table stays in place when the load fails.
    pub fn load(&mut self, source: Source) -> LoadReport {
        match self.try_load(source) {
            Ok(table) => LoadReport {
                ok: true,
                message: format!("File processed successfully: {} record(s) loaded", table.len()),
            },
            Err(error) => {
                error!(?error, "Failed to load spreadsheet");
                LoadReport {
                    ok: false,
                    message: error.to_string(),
                }
            }
        }
    }

    /// Loads a workbook, swapping it in as the live table on success.
    pub fn try_load(&mut self, source: Source) -> Result<&Table, ReportError> {
        let name = source.name();
        let table = ingest::load(source)?;
        info!("Loaded {} record(s) from '{}'", table.len(), name);
        Ok(&*self.table.insert(table))
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Sorted distinct values of `field`; empty when nothing is loaded.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        filter::distinct_values(self.table.as_ref(), field)
    }

    /// Filters the live table without modifying it.
    pub fn filter(&self, spec: &FilterSpec) -> Result<Table, ReportError> {
        let table = self.table.as_ref().ok_or(ReportError::NoDataLoaded)?;
        Ok(filter::filter(table, spec))
    }
}
