use crate::error::ParseError;
use crate::error::ReportError;
use crate::spreadsheet;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Source;
use crate::spreadsheet::SpreadsheetError;
use crate::table::column::reindex;
use crate::table::column::Column;
use crate::table::field::Field;
use crate::table::Table;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Cell text (trimmed, case-insensitive) that marks the header row
const HEADER_MARKER: &str = "item";

type Row<'a> = (usize, Vec<&'a Cell>);

/// Reads the first worksheet of `source` and normalizes it into a [`Table`].
pub fn load(source: Source) -> Result<Table, ReportError> {
    let sheet = spreadsheet::read_first_sheet(source)?;
    normalize(&sheet)
}

/// Normalizes a decoded worksheet: locates the header row, reconciles its
/// columns against the schema, drops blank rows and renumbers.
pub(crate) fn normalize(sheet: &Sheet) -> Result<Table, ReportError> {
    let rows = sheet.rows();
    let position = locate_header(&rows).ok_or(ReportError::HeaderNotFound)?;
    let (header_row, header) = &rows[position];
    info!("Header row found at row {} of sheet '{}'", header_row + 1, sheet.name);

    let kept = reconcile_headers(header);
    let mut values: Vec<Vec<String>> = vec![Vec::new(); kept.len()];
    let mut dropped = 0usize;
    for (row, cells) in &rows[position + 1..] {
        let texts = kept
            .iter()
            .map(|(col, _)| cell_text(sheet, find_cell(cells, *col)))
            .collect::<Result<Vec<String>, ParseError>>()?;
        if texts.iter().all(String::is_empty) {
            debug!("Dropping blank row {}", row + 1);
            dropped += 1;
            continue;
        }
        for (column, text) in values.iter_mut().zip(texts) {
            column.push(text);
        }
    }

    let rows = values.first().map(Vec::len).unwrap_or(0);
    let columns: Vec<Column> = kept
        .iter()
        .zip(values)
        .map(|((_, field), values)| Column::new(field.name(), values))
        .collect();
    for field in Field::ALL.iter().filter(|field| field.is_text()) {
        if !columns.iter().any(|column| column.name == field.name()) {
            warn!("Column '{}' is missing from the sheet, filling it with empty values", field);
        }
    }
    debug!("Kept {} data row(s), dropped {} blank row(s)", rows, dropped);

    Table::try_from(reindex(columns, rows))
}

/// Position in `rows` of the first row with a cell reading `item`.
/// Raw stored text is compared, so no cell conversion can fail here.
fn locate_header(rows: &[Row]) -> Option<usize> {
    rows.iter().position(|(_, cells)| {
        cells
            .iter()
            .any(|cell| cell.value.trim().eq_ignore_ascii_case(HEADER_MARKER))
    })
}

/// Maps header cells to schema fields as `(column index, field)` pairs.
/// Blank headers and unknown names are dropped; on repeated names the
/// leftmost column wins.
fn reconcile_headers(header: &[&Cell]) -> Vec<(usize, Field)> {
    let mut kept: Vec<(usize, Field)> = Vec::new();
    for cell in header {
        let name = cell.value.trim();
        if name.is_empty() {
            continue;
        }
        match Field::parse(name) {
            Some(field) if kept.iter().any(|(_, kept)| *kept == field) => {
                debug!("Ignoring repeated column '{}' at {}", name, cell.reference());
            }
            Some(field) => kept.push((cell.col, field)),
            None => debug!("Ignoring column '{}' at {}", name, cell.reference()),
        }
    }
    kept
}

/// Cell at column `col` of a row whose cells are sorted by column.
fn find_cell<'a>(cells: &[&'a Cell], col: usize) -> Option<&'a Cell> {
    cells
        .binary_search_by_key(&col, |cell| cell.col)
        .ok()
        .map(|index| cells[index])
}

fn cell_text(sheet: &Sheet, cell: Option<&Cell>) -> Result<String, ParseError> {
    let Some(cell) = cell else {
        return Ok(String::new());
    };
    cell.text().map_err(|message| {
        SpreadsheetError::CellValueError(
            sheet.file_name.to_owned(),
            sheet.name.to_owned(),
            cell.reference(),
            message,
        )
        .into()
    })
}
