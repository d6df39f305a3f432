//! Builds small but genuine `.xlsx` packages for the integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One worksheet cell as it should be stored in the package.
#[derive(Clone, Debug)]
pub enum Value<'a> {
    /// Inline string
    Text(&'a str),
    /// Entry in the shared string table
    Shared(&'a str),
    /// Plain number
    Number(&'a str),
    /// Date serial styled with built-in format 14
    Date(&'a str),
    /// Inline string stored under an explicit cell reference
    At(&'a str, &'a str),
}

pub const HEADER: [&str; 8] = [
    "Item", "Chassi", "Modelo", "Cliente", "Cidade", "Status Funcionamento", "Manutenção", "Quantidade",
];

/// Text-only rows; empty strings leave the cell out.
pub fn text_rows<'a>(rows: &[&[&'a str]]) -> Vec<Vec<Value<'a>>> {
    rows.iter()
        .map(|row| row.iter().copied().map(Value::Text).collect())
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn column_letters(mut col: usize) -> String {
    let mut letters = String::new();
    col += 1;
    while col > 0 {
        col -= 1;
        letters.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }
    letters
}

/// Packs `rows` into the first worksheet of a workbook; `first_row` is the
/// 1-based row number of `rows[0]`.
pub fn xlsx(rows: &[Vec<Value>], first_row: usize) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_data = String::new();
    for (offset, row) in rows.iter().enumerate() {
        let number = first_row + offset;
        sheet_data.push_str(&format!(r#"<row r="{}">"#, number));
        for (col, value) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letters(col), number);
            let cell = match value {
                Value::Text("") => continue,
                Value::Text(text) => format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, reference, escape(text)),
                Value::Shared(text) => {
                    shared.push(escape(text));
                    format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, reference, shared.len() - 1)
                }
                Value::Number(number) => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, number),
                Value::Date(serial) => format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, serial),
                Value::At(reference, text) => format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, reference, escape(text)),
            };
            sheet_data.push_str(&cell);
        }
        sheet_data.push_str("</row>");
    }

    let shared_strings: String = shared.iter().map(|text| format!("<si><t>{}</t></si>", text)).collect();
    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#
                .to_owned(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr/><sheets><sheet name="Plan1" sheetId="1" r:id="rId1"/><sheet name="Resumo" sheetId="2" r:id="rId2"/></sheets></workbook>"#
                .to_owned(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#
                .to_owned(),
        ),
        (
            "xl/styles.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#
                .to_owned(),
        ),
        (
            "xl/sharedStrings.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
                shared_strings
            ),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                sheet_data
            ),
        ),
        (
            "xl/worksheets/sheet2.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Item</t></is></c></row></sheetData></worksheet>"#
                .to_owned(),
        ),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
