//! # Spreadsheet Reading Module
//!
//! Decodes `.xlsx` / `.xlsm` workbooks into an in-memory [`Sheet`] of typed
//! cells. Only the first worksheet is read; everything above the cell level
//! (header detection, schema reconciliation) lives in [`crate::table`].

pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::ParseError;
use crate::helpers::reader::UnifiedReader;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxWorkbook;
use std::path::Path;
use thiserror::Error;

/// Errors raised while decoding a workbook package.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}': expected an .xlsx workbook")]
    FileFormatError(String),

    #[error("Missing part '{0}' in workbook")]
    FileError(String),

    #[error("Workbook '{0}' contains no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("Invalid cell value in '{0}', sheet '{1}', cell {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// Where a workbook comes from: a path on disk or the bytes of an upload.
#[derive(Clone, Debug)]
pub enum Source {
    /// Workbook file on the local file system
    Path(std::path::PathBuf),
    /// Workbook received as a binary upload, with its original file name
    Upload { name: String, bytes: Vec<u8> },
}

impl Source {
    /// File name used for format detection and messages
    pub fn name(&self) -> String {
        match self {
            Source::Path(path) => path.to_string_lossy().to_string(),
            Source::Upload { name, .. } => name.to_owned(),
        }
    }
}

/// Checks the extension of `name` against the supported workbook formats.
fn accepts(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| matches!(extension.to_ascii_lowercase().as_str(), "xlsx" | "xlsm"))
        .unwrap_or(false)
}

/// Opens a workbook and reads its first worksheet.
pub(crate) fn read_first_sheet(source: Source) -> Result<Sheet, ParseError> {
    let name = source.name();
    if !accepts(&name) {
        Err(SpreadsheetError::FileFormatError(name.to_owned()))?
    }
    let reader = match source {
        Source::Path(path) => UnifiedReader::open(&path)?,
        Source::Upload { bytes, .. } => UnifiedReader::from_bytes(bytes),
    };
    let mut workbook = XlsxWorkbook::open(&name, reader)?;
    workbook.read_first_sheet()
}
