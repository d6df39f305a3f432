//! # Normalized record table
//!
//! [`Table`] is the schema-conformant result of ingestion: an ordered list of
//! [`Record`]s with exactly the eight canonical fields. `Quantidade` is not
//! domain data but the 1-based row position, so every operation that changes
//! the row set renumbers it.

pub(crate) mod column;
pub mod field;
pub mod filter;
pub(crate) mod ingest;

use crate::error::ReportError;
use crate::table::column::Column;
use crate::table::field::Field;
use std::fmt::Display;

/// A typed view of one field of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Value<'a> {
    Text(&'a str),
    Sequence(usize),
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Sequence(number) => write!(f, "{}", number),
        }
    }
}

/// One row of the normalized table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Trimmed text of the seven source fields, in canonical order
    texts: [String; 7],
    /// Derived 1-based position in the owning table
    quantidade: usize,
}

impl Record {
    /// Builds a record from the seven text fields in canonical order.
    /// The sequence number is assigned by the owning [`Table`].
    pub fn new(texts: [&str; 7]) -> Self {
        Record {
            texts: texts.map(|text| text.trim().to_owned()),
            quantidade: 0,
        }
    }

    /// Text of a source field; `None` for the derived `Quantidade`.
    pub fn text(&self, field: Field) -> Option<&str> {
        self.texts.get(field.index()).map(String::as_str)
    }

    pub fn quantidade(&self) -> usize {
        self.quantidade
    }

    pub fn get(&self, field: Field) -> Value<'_> {
        match self.text(field) {
            Some(text) => Value::Text(text),
            None => Value::Sequence(self.quantidade),
        }
    }

    pub fn cliente(&self) -> &str {
        &self.texts[Field::Cliente.index()]
    }
}

/// Ordered, schema-conformant records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Builds a table from records, numbering them `1..=N` in the given order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Table { records };
        table.renumber();
        table
    }

    /// Column names in canonical order.
    pub fn columns() -> [&'static str; 8] {
        Field::ALL.map(|field| field.name())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct `Cliente` values in first-encountered order.
    pub fn customers(&self) -> Vec<&str> {
        let mut customers: Vec<&str> = Vec::new();
        for record in &self.records {
            if !customers.contains(&record.cliente()) {
                customers.push(record.cliente());
            }
        }
        customers
    }

    /// Records of one customer, in table order.
    pub fn customer_records<'a>(&'a self, customer: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |record| record.cliente() == customer)
    }

    /// Reassigns `Quantidade` as the contiguous `1..=N` position index.
    pub(crate) fn renumber(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.quantidade = index + 1;
        }
    }
}

impl TryFrom<Vec<Column>> for Table {
    type Error = ReportError;

    /// Builds the table from canonically ordered columns, validating that
    /// exactly the eight schema fields materialized.
    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        let found: Vec<String> = columns.iter().map(|column| column.name.to_owned()).collect();
        let missing: Vec<String> = Field::ALL
            .iter()
            .map(|field| field.name().to_owned())
            .filter(|name| !found.contains(name))
            .collect();
        if !missing.is_empty() || found.len() != Field::ALL.len() {
            return Err(ReportError::SchemaIncomplete { missing, found });
        }

        let rows = columns.iter().map(|column| column.values.len()).max().unwrap_or(0);
        let records = (0..rows)
            .map(|row| {
                let mut texts: [&str; 7] = [""; 7];
                for field in Field::ALL.iter().filter(|field| field.is_text()) {
                    texts[field.index()] = columns
                        .iter()
                        .find(|column| column.name == field.name())
                        .and_then(|column| column.values.get(row))
                        .map(String::as_str)
                        .unwrap_or("");
                }
                Record::new(texts)
            })
            .collect();
        Ok(Table::from_records(records))
    }
}
