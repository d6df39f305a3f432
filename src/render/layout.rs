//! Page geometry, table style and the pure layout steps: wrapping cell text,
//! measuring rows and splitting rows into pages.

use crate::render::font::Font;
use crate::table::field::Field;
use crate::table::Record;
use std::ops::Range;

const INCH: f32 = 72.0;

/// Landscape US letter
pub(crate) const PAGE_WIDTH: f32 = 11.0 * INCH;
pub(crate) const PAGE_HEIGHT: f32 = 8.5 * INCH;
pub(crate) const MARGIN_X: f32 = 15.0;
pub(crate) const MARGIN_Y: f32 = 20.0;

pub(crate) const TITLE_SIZE: f32 = 14.0;
pub(crate) const TITLE_LEADING: f32 = 17.0;
/// Gap between the title and the table
pub(crate) const TITLE_SPACE_AFTER: f32 = 30.0;

pub(crate) const PADDING_X: f32 = 6.0;
pub(crate) const GRID_WIDTH: f32 = 0.5;

pub(crate) const HEADER_FILL: Rgb = Rgb::hex(0x2d5d7b);
pub(crate) const HEADER_TEXT: Rgb = Rgb::hex(0xf5f5f5);
pub(crate) const ZEBRA_FILL: Rgb = Rgb::hex(0xf8f8f8);
pub(crate) const BODY_TEXT: Rgb = Rgb::hex(0x000000);
pub(crate) const GRID_COLOR: Rgb = Rgb::hex(0x000000);

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Rgb(pub(crate) f32, pub(crate) f32, pub(crate) f32);

impl Rgb {
    const fn hex(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        )
    }
}

/// Typography of one kind of table row.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CellStyle {
    pub(crate) font: Font,
    pub(crate) size: f32,
    pub(crate) leading: f32,
    pub(crate) padding_y: f32,
}

pub(crate) const HEADER_STYLE: CellStyle = CellStyle {
    font: Font::Bold,
    size: 8.0,
    leading: 9.6,
    padding_y: 6.0,
};

pub(crate) const BODY_STYLE: CellStyle = CellStyle {
    font: Font::Regular,
    size: 7.0,
    leading: 8.0,
    padding_y: 3.0,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct ColumnSpec {
    pub(crate) field: Field,
    pub(crate) width: f32,
    pub(crate) align: Align,
}

const fn column(field: Field, inches: f32, align: Align) -> ColumnSpec {
    ColumnSpec {
        field,
        width: inches * INCH,
        align,
    }
}

/// Fixed column widths, narrow for the short fields and wide for free text.
pub(crate) const COLUMNS: [ColumnSpec; 8] = [
    column(Field::Item, 0.7, Align::Center),
    column(Field::Chassi, 1.7, Align::Left),
    column(Field::Modelo, 1.7, Align::Left),
    column(Field::Cliente, 1.3, Align::Left),
    column(Field::Cidade, 1.1, Align::Left),
    column(Field::StatusFuncionamento, 1.3, Align::Center),
    column(Field::Manutencao, 1.7, Align::Left),
    column(Field::Quantidade, 0.6, Align::Center),
];

pub(crate) fn table_width() -> f32 {
    COLUMNS.iter().map(|column| column.width).sum()
}

/// Left edge of the horizontally centered table.
pub(crate) fn table_left() -> f32 {
    (PAGE_WIDTH - table_width()) / 2.0
}

/// Vertical space for table rows on the first page, below a title of
/// `title_lines` lines.
pub(crate) fn first_page_space(title_lines: usize) -> f32 {
    page_space() - title_lines.max(1) as f32 * TITLE_LEADING - TITLE_SPACE_AFTER
}

/// Title lines, wrapped to the printable page width.
pub(crate) fn title_lines(title: &str) -> Vec<String> {
    wrap_text(title, Font::Bold, TITLE_SIZE, PAGE_WIDTH - 2.0 * MARGIN_X)
}

/// Vertical space for table rows on every following page.
pub(crate) fn page_space() -> f32 {
    PAGE_HEIGHT - 2.0 * MARGIN_Y
}

/// Breaks `text` into lines no wider than `width`.
/// Lines break at whitespace; a word wider than a whole line is split
/// between characters.
pub(crate) fn wrap_text(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let fits = |candidate: &str| font.text_width(candidate, size) <= width;
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_owned()
        } else {
            format!("{} {}", line, word)
        };
        if fits(&candidate) {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for character in word.chars() {
            line.push(character);
            if !fits(&line) && line.chars().count() > 1 {
                line.pop();
                lines.push(std::mem::replace(&mut line, character.to_string()));
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrapped cell lines of one table row and the row height.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RowLayout {
    pub(crate) cells: Vec<Vec<String>>,
    pub(crate) height: f32,
}

impl RowLayout {
    fn new<S: AsRef<str>>(texts: &[S], style: &CellStyle) -> Self {
        let cells: Vec<Vec<String>> = COLUMNS
            .iter()
            .zip(texts)
            .map(|(column, text)| wrap_text(text.as_ref(), style.font, style.size, column.width - 2.0 * PADDING_X))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        RowLayout {
            cells,
            height: lines as f32 * style.leading + 2.0 * style.padding_y,
        }
    }

    /// The column header row.
    pub(crate) fn header() -> Self {
        RowLayout::new(&COLUMNS.map(|column| column.field.name()), &HEADER_STYLE)
    }

    /// One body row for `record`.
    pub(crate) fn body(record: &Record) -> Self {
        RowLayout::new(&COLUMNS.map(|column| record.get(column.field).to_string()), &BODY_STYLE)
    }

    /// Cuts a row taller than `max_height` into consecutive pieces that each
    /// fit, moving the cell lines down in order. Rows that fit are returned as is.
    pub(crate) fn split(self, max_height: f32, style: &CellStyle) -> Vec<RowLayout> {
        if self.height <= max_height {
            return vec![self];
        }
        let per_piece = (((max_height - 2.0 * style.padding_y) / style.leading).floor() as usize).max(1);
        let lines = self.cells.iter().map(Vec::len).max().unwrap_or(0);
        (0..lines)
            .step_by(per_piece)
            .map(|start| {
                let cells: Vec<Vec<String>> = self
                    .cells
                    .iter()
                    .map(|cell| cell.iter().skip(start).take(per_piece).cloned().collect())
                    .collect();
                let count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
                RowLayout {
                    cells,
                    height: count as f32 * style.leading + 2.0 * style.padding_y,
                }
            })
            .collect()
    }
}

/// Splits body rows into pages. Each page repeats the header, the first page
/// has `first_page_space` below its title and every other page `page_space`.
/// A page always takes at least one row, so oversized rows cannot stall;
/// callers split such rows with [`RowLayout::split`] first.
/// An empty table yields a single page with only the header.
pub(crate) fn paginate(row_heights: &[f32], header_height: f32, first_page_space: f32, page_space: f32) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0usize;
    let mut used = 0f32;
    let mut available = first_page_space - header_height;
    for (index, height) in row_heights.iter().enumerate() {
        if index > start && used + height > available {
            pages.push(start..index);
            start = index;
            used = 0.0;
            available = page_space - header_height;
        }
        used += height;
    }
    pages.push(start..row_heights.len());
    pages
}
