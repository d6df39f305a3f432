use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::reference::index_to_reference;

/// Represents one worksheet read from a workbook.
/// Cells are stored in row-major order, as they appear in the worksheet XML.
#[derive(Debug)]
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, updating the data range.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|lower| row < lower).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|upper| upper < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|lower| col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|upper| upper < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Used range as a reference such as "A4:H20"; `None` for an empty sheet.
    pub(crate) fn dimension(&self) -> Option<String> {
        Some(format!(
            "{}:{}",
            index_to_reference(self.row_lower_bound?, self.col_lower_bound?),
            index_to_reference(self.row_upper_bound?, self.col_upper_bound?),
        ))
    }

    /// Returns the rows that hold at least one cell as `(row index, cells)`,
    /// in row order with each row's cells sorted by column.
    /// Rows and columns without cells take no space, however wide the used range is.
    pub(crate) fn rows(&self) -> Vec<(usize, Vec<&Cell>)> {
        let mut ordered: Vec<&Cell> = self.cells.iter().collect();
        ordered.sort_by_key(|cell| (cell.row, cell.col));

        let mut rows: Vec<(usize, Vec<&Cell>)> = Vec::new();
        for cell in ordered {
            match rows.last_mut() {
                Some((row, cells)) if *row == cell.row => cells.push(cell),
                _ => rows.push((cell.row, vec![cell])),
            }
        }
        rows
    }
}
