use crate::table::field::Field;
use thiserror::Error;

/// Errors surfaced by the ingestion and rendering engines.
///
/// The `Display` text of each variant is the classified, user-facing message.
/// Underlying causes stay reachable through `source()` for operator logs.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Header row not found: no cell reads '{}'. Check the structure of the file.", Field::Item.name())]
    HeaderNotFound,

    #[error("Missing columns: {}\nColumns found: {}", .missing.join(", "), .found.join(", "))]
    SchemaIncomplete {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to process file: {0}")]
    ParseError(#[from] ParseError),

    #[error("Failed to render report for '{customer}': {source}")]
    RenderError {
        customer: String,
        #[source]
        source: crate::render::RenderError,
    },

    #[error("No spreadsheet loaded")]
    NoDataLoaded,

    #[error("Field '{0}' cannot be used as a filter")]
    UnsupportedFilterField(String),
}

/// Low-level decoding failures raised while reading a workbook.
/// Aggregates errors from the standard library, dependencies and the helper modules.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ParseError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ParseError::WithContextError(format!("{}: {}", message, e)))
    }
}
