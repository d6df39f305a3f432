use crate::render::font::encode_win_ansi;
use crate::render::font::Font;
use crate::render::layout::*;
use crate::render::RenderError;
use lopdf::content::Content;
use lopdf::content::Operation;
use lopdf::dictionary;
use lopdf::Document;
use lopdf::Object;
use lopdf::Stream;
use std::path::Path;
use tracing::debug;

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Accumulates the drawing operations of one page.
#[derive(Default)]
struct Canvas {
    operations: Vec<Operation>,
}

impl Canvas {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push("rg", vec![real(color.0), real(color.1), real(color.2)]);
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
        self.push("f", vec![]);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push("w", vec![real(GRID_WIDTH)]);
        self.push("RG", vec![real(GRID_COLOR.0), real(GRID_COLOR.1), real(GRID_COLOR.2)]);
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
        self.push("S", vec![]);
    }

    fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, color: Rgb, text: &str) {
        self.push("BT", vec![]);
        self.push("Tf", vec![font.resource_name().into(), real(size)]);
        self.push("rg", vec![real(color.0), real(color.1), real(color.2)]);
        self.push("Td", vec![real(x), real(baseline)]);
        self.push("Tj", vec![Object::string_literal(encode_win_ansi(text))]);
        self.push("ET", vec![]);
    }

    /// Draws one table row whose top edge is at `top`; returns the bottom edge.
    fn row(&mut self, top: f32, row: &RowLayout, style: &CellStyle, fill: Option<Rgb>, text_color: Rgb, center_all: bool) -> f32 {
        let bottom = top - row.height;
        let mut x = table_left();
        if let Some(fill) = fill {
            self.fill_rect(x, bottom, table_width(), row.height, fill);
        }
        for (column, lines) in COLUMNS.iter().zip(&row.cells) {
            let block = lines.len() as f32 * style.leading;
            let block_top = top - (row.height - block) / 2.0;
            for (number, line) in lines.iter().enumerate() {
                let baseline = block_top - number as f32 * style.leading - style.size;
                let line_x = if center_all || column.align == Align::Center {
                    x + (column.width - style.font.text_width(line, style.size)) / 2.0
                } else {
                    x + PADDING_X
                };
                self.text(line_x, baseline, style.font, style.size, text_color, line);
            }
            self.stroke_rect(x, bottom, column.width, row.height);
            x += column.width;
        }
        bottom
    }
}

/// Splits rows too tall for a page, pairing each piece with the index of the
/// row it came from.
fn body_pieces(rows: &[RowLayout], max_height: f32) -> Vec<(usize, RowLayout)> {
    rows.iter()
        .enumerate()
        .flat_map(|(index, row)| {
            row.clone()
                .split(max_height, &BODY_STYLE)
                .into_iter()
                .map(move |piece| (index, piece))
        })
        .collect()
}

/// Writes a one-table report: `title` centered on the first page, the header
/// row on every page, and `rows` in order with alternating shading.
pub(crate) fn write_report(path: &Path, title: &str, rows: &[RowLayout]) -> Result<usize, RenderError> {
    let header = RowLayout::header();
    let title = title_lines(title);
    let first_space = first_page_space(title.len());
    let pieces = body_pieces(rows, first_space - header.height);
    let heights: Vec<f32> = pieces.iter().map(|(_, piece)| piece.height).collect();
    let pages = paginate(&heights, header.height, first_space, page_space());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary(Font::Regular));
    let bold_id = doc.add_object(font_dictionary(Font::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (number, range) in pages.iter().enumerate() {
        let mut canvas = Canvas::default();
        let mut top = PAGE_HEIGHT - MARGIN_Y;
        if number == 0 {
            for (line_number, line) in title.iter().enumerate() {
                let width = Font::Bold.text_width(line, TITLE_SIZE);
                let baseline = top - TITLE_SIZE - line_number as f32 * TITLE_LEADING;
                canvas.text((PAGE_WIDTH - width) / 2.0, baseline, Font::Bold, TITLE_SIZE, BODY_TEXT, line);
            }
            // title lines plus the gap before the table
            top -= page_space() - first_space;
        }
        top = canvas.row(top, &header, &HEADER_STYLE, Some(HEADER_FILL), HEADER_TEXT, true);
        for (index, piece) in &pieces[range.clone()] {
            let fill = (index % 2 == 1).then_some(ZEBRA_FILL);
            top = canvas.row(top, piece, &BODY_STYLE, fill, BODY_TEXT, false);
        }

        let content = Content {
            operations: canvas.operations,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count as i64),
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path)?;
    debug!("Wrote {} page(s) to '{}'", count, path.display());
    Ok(count)
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::record;

    #[test]
    fn writes_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acme.pdf");
        let rows = vec![
            RowLayout::body(&record("1", "Acme", "Recife", "Ativo", "Preventiva")),
            RowLayout::body(&record("2", "Acme", "São Luís", "Parado", "Corretiva")),
        ];
        let pages = write_report(&path, "Relatório - Acme", &rows).unwrap();
        assert_eq!(pages, 1);

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_tables_span_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Frota.pdf");
        let rows: Vec<RowLayout> = (0..120)
            .map(|item| RowLayout::body(&record(&item.to_string(), "Frota", "Recife", "Ativo", "Preventiva")))
            .collect();
        let pages = write_report(&path, "Relatório - Frota", &rows).unwrap();
        assert!(pages > 1);

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), pages);
        // the header is repeated on every page
        for page_id in doc.get_pages().values() {
            let content = doc.get_page_content(*page_id).unwrap();
            assert!(content.windows(4).any(|window| window == b"Item"));
        }
    }

    #[test]
    fn tall_rows_continue_on_the_next_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Oficina.pdf");
        let manutencao = "Revisao completa do sistema de freios e suspensao ".repeat(150);
        let rows = vec![
            RowLayout::body(&record("1", "Oficina", "Recife", "Ativo", &manutencao)),
            RowLayout::body(&record("2", "Oficina", "Recife", "Ativo", "Preventiva")),
        ];
        assert!(rows[0].height > page_space());

        let max_height = first_page_space(1) - RowLayout::header().height;
        let pieces = body_pieces(&rows, max_height);
        assert!(pieces.len() > 2);
        assert!(pieces.iter().all(|(_, piece)| piece.height <= max_height));
        // pieces keep the index of their row for shading
        assert!(pieces[..pieces.len() - 1].iter().all(|(index, _)| *index == 0));
        assert_eq!(pieces.last().map(|(index, _)| *index), Some(1));

        let pages = write_report(&path, "Relatório - Oficina", &rows).unwrap();
        assert!(pages >= pieces.len() - 1);
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), pages);
        let last = doc.get_pages().values().last().copied().unwrap();
        let content = doc.get_page_content(last).unwrap();
        assert!(content.windows(10).any(|window| window == b"Preventiva"));
    }

    #[test]
    fn long_titles_are_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Longo.pdf");
        let customer = "Cooperativa Agroindustrial de Transportes Rodoviarios ".repeat(6);
        let title = format!("Relatório - {}", customer);
        assert!(Font::Bold.text_width(&title, TITLE_SIZE) > PAGE_WIDTH);

        let rows = vec![RowLayout::body(&record("1", &customer, "Recife", "Ativo", "Preventiva"))];
        assert_eq!(write_report(&path, &title, &rows).unwrap(), 1);
        let doc = Document::load(&path).unwrap();
        let page = doc.get_pages().values().next().copied().unwrap();
        let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
        let title_runs = content
            .operations
            .iter()
            .filter(|operation| operation.operator == "Tf")
            .filter(|operation| operation.operands.last().and_then(|size| size.as_float().ok()) == Some(TITLE_SIZE))
            .count();
        assert_eq!(title_runs, title_lines(&title).len());
        assert!(title_runs > 1);
    }

    #[test]
    fn empty_table_still_has_a_header_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Vazio.pdf");
        assert_eq!(write_report(&path, "Relatório - Vazio", &[]).unwrap(), 1);
    }
}
