use crate::table::field::Field;

/// One named column of text values, the intermediate shape between a raw
/// worksheet and a schema-conformant [`crate::table::Table`].
#[derive(Clone, Debug)]
pub(crate) struct Column {
    /// Column name (trimmed header text)
    pub(crate) name: String,
    /// Trimmed text value per data row; missing cells are empty strings
    pub(crate) values: Vec<String>,
}

impl Column {
    pub(crate) fn new(name: &str, values: Vec<String>) -> Self {
        Column {
            name: name.to_owned(),
            values,
        }
    }

    /// An all-missing column standing in for a field the source does not have.
    pub(crate) fn missing(field: Field, rows: usize) -> Self {
        Column::new(field.name(), vec![String::new(); rows])
    }

    /// The derived 1..=N sequence column.
    pub(crate) fn sequence(rows: usize) -> Self {
        Column::new(
            Field::Quantidade.name(),
            (1..=rows).map(|number| number.to_string()).collect(),
        )
    }
}

/// Reorders `columns` into canonical field order. Fields without a column
/// become all-missing columns, `Quantidade` is replaced by the sequence, and
/// columns that are not schema fields are discarded.
pub(crate) fn reindex(mut columns: Vec<Column>, rows: usize) -> Vec<Column> {
    Field::ALL
        .iter()
        .map(|field| {
            if *field == Field::Quantidade {
                return Column::sequence(rows);
            }
            match columns.iter().position(|column| column.name == field.name()) {
                Some(position) => columns.swap_remove(position),
                None => Column::missing(*field, rows),
            }
        })
        .collect()
}
