//! End-to-end tests: real workbooks in, PDF reports and archive out.

mod common;

use common::{text_rows, xlsx, Value, HEADER};
use sheet_report::{bundle, load, Field, FilterSpec, ReportConfig, ReportError, ReportRenderer, Session, Source};
use std::fs::File;
use std::path::Path;

fn upload(name: &str, bytes: Vec<u8>) -> Source {
    Source::Upload {
        name: name.to_owned(),
        bytes,
    }
}

fn fleet() -> Vec<u8> {
    let header = [
        "ITEM", "Chassi", "Modelo", "Cliente", "Cidade", "Status Funcionamento", "Manutenção", "Observação",
    ];
    let rows: [&[&str]; 7] = [
        &header,
        &["1", "9BWZZZ377VT004251", "Gol 1.0", "Acme", "Recife", "Ativo", "Preventiva", ""],
        &["2", "9BD17164G54123456", "Uno Mille", "Transportes A/B", "Natal", "Parado", "Corretiva", "pneu"],
        &["", "", "", "", "", "", "", ""],
        &["3", "93HGE6750AZ123456", "Fit", "Acme", "Olinda", "Ativo", "Troca de óleo", ""],
        &["4", "9BWAA05U6DP123456", "Saveiro", "Transportes A/B", "Natal", "Ativo", "Preventiva", ""],
        &["5", "9BGRD08X04G123456", "Celta", "Acme", "Recife", "Parado", "Corretiva", ""],
    ];
    // three blank rows above the header
    xlsx(&text_rows(&rows), 4)
}

/// Raw content streams of every page of a PDF.
fn page_contents(path: &Path) -> Vec<u8> {
    let pdf = lopdf::Document::load(path).unwrap();
    pdf.get_pages()
        .values()
        .flat_map(|page_id| pdf.get_page_content(*page_id).unwrap())
        .collect()
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle.as_bytes())
}

fn file_names(paths: &[impl AsRef<Path>]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.as_ref().file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect()
}

#[test]
fn load_render_and_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new();
    let report = session.load(upload("frota.xlsx", fleet()));
    assert!(report.ok, "{}", report.message);

    let table = session.table().unwrap();
    assert_eq!(table.len(), 5);
    let numbers: Vec<usize> = table.records().iter().map(|record| record.quantidade()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let renderer = ReportRenderer::new(ReportConfig::default().with_output_dir(dir.path().join("relatorios")));
    let documents = renderer.render_all(table).unwrap();
    assert_eq!(file_names(&documents), vec!["Acme.pdf", "Transportes AB.pdf"]);
    for document in &documents {
        let pdf = lopdf::Document::load(document).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);
    }

    // each document holds its own customer's vehicles and nobody else's
    let acme = ["9BWZZZ377VT004251", "93HGE6750AZ123456", "9BGRD08X04G123456"];
    let transportes = ["9BD17164G54123456", "9BWAA05U6DP123456"];
    let acme_content = page_contents(&documents[0]);
    let transportes_content = page_contents(&documents[1]);
    for chassi in acme {
        assert!(contains(&acme_content, chassi), "{} missing from Acme.pdf", chassi);
        assert!(!contains(&transportes_content, chassi), "{} leaked into Transportes AB.pdf", chassi);
    }
    for chassi in transportes {
        assert!(contains(&transportes_content, chassi), "{} missing from Transportes AB.pdf", chassi);
        assert!(!contains(&acme_content, chassi), "{} leaked into Acme.pdf", chassi);
    }

    let archive = bundle(&documents, &renderer.config().archive_path()).unwrap();
    assert_eq!(archive, dir.path().join("relatorios").join("relatorios.zip"));
    let zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut entries: Vec<&str> = zip.file_names().collect();
    entries.sort();
    assert_eq!(entries, vec!["Acme.pdf", "Transportes AB.pdf"]);
}

#[test]
fn filter_and_distinct_values() {
    let mut session = Session::new();
    assert!(session.load(upload("frota.xlsx", fleet())).ok);

    assert_eq!(session.distinct_values("Cidade"), vec!["Natal", "Olinda", "Recife"]);
    assert_eq!(session.distinct_values("Cliente"), vec!["Acme", "Transportes A/B"]);
    assert!(session.distinct_values("Observação").is_empty());

    let spec = FilterSpec::new()
        .with(Field::Cliente, ["Acme"])
        .unwrap()
        .with(Field::StatusFuncionamento, ["Ativo"])
        .unwrap();
    let filtered = session.filter(&spec).unwrap();
    let items: Vec<&str> = filtered.records().iter().filter_map(|record| record.text(Field::Item)).collect();
    // "ITEM" is not the canonical "Item" column name
    assert_eq!(items, vec!["", ""]);
    let cities: Vec<&str> = filtered.records().iter().filter_map(|record| record.text(Field::Cidade)).collect();
    assert_eq!(cities, vec!["Recife", "Olinda"]);
    let numbers: Vec<usize> = filtered.records().iter().map(|record| record.quantidade()).collect();
    assert_eq!(numbers, vec![1, 2]);

    let none = FilterSpec::new().with(Field::Cliente, ["Delta"]).unwrap();
    assert!(session.filter(&none).unwrap().is_empty());
    // the live table is untouched by filtering
    assert_eq!(session.table().unwrap().len(), 5);
}

#[test]
fn missing_city_column_loads_with_empty_values() {
    let rows: [&[&str]; 3] = [
        &["Item", "Chassi", "Modelo", "Cliente", "Status Funcionamento", "Manutenção"],
        &["1", "C1", "Gol", "Acme", "Ativo", "Preventiva"],
        &["2", "C2", "Uno", "Beta", "Parado", "Corretiva"],
    ];
    let mut session = Session::new();
    let report = session.load(upload("sem_cidade.xlsx", xlsx(&text_rows(&rows), 1)));
    assert!(report.ok, "{}", report.message);

    let table = session.table().unwrap();
    assert!(table.records().iter().all(|record| record.text(Field::Cidade) == Some("")));
    assert!(session.distinct_values("Cidade").is_empty());
}

#[test]
fn typed_cells_become_text() {
    let rows = vec![
        HEADER.iter().copied().map(Value::Text).collect(),
        vec![
            Value::Number("12"),
            Value::Shared("9BWZZZ377VT004251"),
            Value::Text("Gol"),
            Value::Shared("Acme & Filhos"),
            Value::Shared("São Paulo"),
            Value::Text("Ativo"),
            Value::Date("45292"),
            Value::Number("99"),
        ],
    ];
    let mut session = Session::new();
    let report = session.load(upload("tipos.xlsx", xlsx(&rows, 1)));
    assert!(report.ok, "{}", report.message);

    let record = &session.table().unwrap().records()[0];
    assert_eq!(record.text(Field::Item), Some("12"));
    assert_eq!(record.text(Field::Cliente), Some("Acme & Filhos"));
    assert_eq!(record.text(Field::Cidade), Some("São Paulo"));
    assert_eq!(record.text(Field::Manutencao), Some("2024-01-01"));
    assert_eq!(record.quantidade(), 1);
}

#[test]
fn failed_reload_keeps_previous_table() {
    let mut session = Session::new();
    assert!(session.load(upload("frota.xlsx", fleet())).ok);

    let rows: [&[&str]; 2] = [&["Código", "Cliente"], &["1", "Acme"]];
    let report = session.load(upload("sem_item.xlsx", xlsx(&text_rows(&rows), 1)));
    assert!(!report.ok);
    assert!(report.message.starts_with("Header row not found"));
    assert_eq!(session.table().unwrap().len(), 5);

    let report = session.load(upload("corrompido.xlsx", b"PK not really".to_vec()));
    assert!(!report.ok);
    assert_eq!(session.table().unwrap().len(), 5);
}

#[test]
fn loads_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Frota.XLSX");
    std::fs::write(&path, fleet()).unwrap();

    let mut session = Session::new();
    let report = session.load(Source::Path(path));
    assert!(report.ok, "{}", report.message);
    assert_eq!(session.table().unwrap().customers(), vec!["Acme", "Transportes A/B"]);
}

#[test]
fn out_of_range_cell_reference_is_a_parse_error() {
    let rows = vec![
        HEADER.iter().copied().map(Value::Text).collect(),
        vec![Value::Text("1"), Value::At("AAAAAAAAAAAAAAAAAAAAAAAA2", "Acme")],
    ];
    match load(upload("referencia.xlsx", xlsx(&rows, 1))) {
        Err(ReportError::ParseError(error)) => {
            let message = error.to_string();
            assert!(message.contains("AAAAAAAAAAAAAAAAAAAAAAAA2"), "{}", message);
            assert!(message.contains("invalid cell reference"), "{}", message);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }

    let rows = vec![
        HEADER.iter().copied().map(Value::Text).collect(),
        vec![Value::Text("1"), Value::At("B1048577", "Acme")],
    ];
    assert!(matches!(load(upload("linha.xlsx", xlsx(&rows, 1))), Err(ReportError::ParseError(_))));

    let mut session = Session::new();
    let report = session.load(upload("linha.xlsx", xlsx(&rows, 1)));
    assert!(!report.ok);
    assert!(session.table().is_none());
}

#[test]
fn cell_in_the_last_sheet_corner_loads() {
    let rows = vec![
        HEADER.iter().copied().map(Value::Text).collect(),
        ["1", "C1", "Gol", "Acme", "Recife", "Ativo", "Preventiva", ""]
            .into_iter()
            .map(Value::Text)
            .chain([Value::At("XFD1048576", "fim")])
            .collect(),
    ];
    let table = load(upload("canto.xlsx", xlsx(&rows, 1))).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].cliente(), "Acme");
}
