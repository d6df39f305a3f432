//! # Equipment Sheet Reports
//!
//! Reads an equipment/maintenance spreadsheet (`.xlsx`), normalizes it to a
//! fixed eight-column schema, filters it, and renders one landscape PDF report
//! per customer, optionally bundled into a single ZIP archive.
//!
//! ## Pipeline
//!
//! - **Ingestion**: the header row is located by a cell reading `item` at any
//!   offset; columns are reconciled against the schema and blank rows dropped.
//! - **Filtering**: AND across fields, OR within a field; the `Quantidade`
//!   sequence is renumbered after every change to the row set.
//! - **Rendering**: one document per distinct `Cliente`, header repeated on
//!   every page, written to `<output_dir>/<safe name>.pdf`.
//!
//! ```no_run
//! use sheet_report::{Field, FilterSpec, ReportConfig, ReportRenderer, Session, Source};
//!
//! let mut session = Session::new();
//! let report = session.load(Source::Path("frota.xlsx".into()));
//! assert!(report.ok, "{}", report.message);
//!
//! let spec = FilterSpec::new().with(Field::Cidade, ["Recife"])?;
//! let table = session.filter(&spec)?;
//! let renderer = ReportRenderer::new(ReportConfig::default());
//! let documents = renderer.render_all(&table)?;
//! sheet_report::bundle(&documents, &renderer.config().archive_path())?;
//! # Ok::<(), sheet_report::ReportError>(())
//! ```

mod archive;
mod config;
mod error;
mod helpers;
mod render;
mod session;
mod spreadsheet;
mod table;

pub use archive::bundle;
pub use archive::ARCHIVE_MEDIA_TYPE;
pub use config::ReportConfig;
pub use error::ParseError;
pub use error::ReportError;
pub use render::safe_name;
pub use render::RenderError;
pub use render::ReportRenderer;
pub use session::LoadReport;
pub use session::Session;
pub use spreadsheet::Source;
pub use spreadsheet::SpreadsheetError;
pub use table::field::Field;
pub use table::filter::distinct_values;
pub use table::filter::filter;
pub use table::filter::FilterSpec;
pub use table::ingest::load;
pub use table::Record;
pub use table::Table;
pub use table::Value;
