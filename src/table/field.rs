use std::fmt::Display;

/// The eight fields of the canonical record schema, in canonical order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Item,
    Chassi,
    Modelo,
    Cliente,
    Cidade,
    StatusFuncionamento,
    Manutencao,
    Quantidade,
}

impl Field {
    /// Every field in canonical column order
    pub const ALL: [Field; 8] = [
        Field::Item,
        Field::Chassi,
        Field::Modelo,
        Field::Cliente,
        Field::Cidade,
        Field::StatusFuncionamento,
        Field::Manutencao,
        Field::Quantidade,
    ];

    /// Fields a filter specification may restrict
    pub const FILTERABLE: [Field; 4] = [
        Field::Cliente,
        Field::Cidade,
        Field::StatusFuncionamento,
        Field::Manutencao,
    ];

    /// Column header text as it appears in the source spreadsheet.
    pub const fn name(&self) -> &'static str {
        match self {
            Field::Item => "Item",
            Field::Chassi => "Chassi",
            Field::Modelo => "Modelo",
            Field::Cliente => "Cliente",
            Field::Cidade => "Cidade",
            Field::StatusFuncionamento => "Status Funcionamento",
            Field::Manutencao => "Manutenção",
            Field::Quantidade => "Quantidade",
        }
    }

    /// Position in the canonical order.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Resolves an exact (already trimmed) header name; matching is case-sensitive.
    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Whether the field holds source text, as opposed to the derived sequence.
    pub const fn is_text(&self) -> bool {
        !matches!(self, Field::Quantidade)
    }

    pub fn is_filterable(&self) -> bool {
        Field::FILTERABLE.contains(self)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
