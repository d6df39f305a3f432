use crate::error::ReportError;
use crate::table::field::Field;
use crate::table::Record;
use crate::table::Table;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::debug;

/// Accepted values per filterable field.
///
/// Fields combine with AND, values within one field with OR. A field that is
/// absent or maps to an empty set places no restriction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    accepted: BTreeMap<Field, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        FilterSpec::default()
    }

    /// Restricts `field` to `values`, replacing any earlier restriction on it.
    pub fn with<I, S>(mut self, field: Field, values: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !field.is_filterable() {
            return Err(ReportError::UnsupportedFilterField(field.name().to_owned()));
        }
        let values = values.into_iter().map(|value| value.into().trim().to_owned()).collect();
        self.accepted.insert(field, values);
        Ok(self)
    }

    /// Whether no field carries a non-empty restriction.
    pub fn is_unrestricted(&self) -> bool {
        self.accepted.values().all(BTreeSet::is_empty)
    }

    fn accepts(&self, record: &Record) -> bool {
        self.accepted
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(field, values)| record.text(*field).is_some_and(|text| values.contains(text)))
    }
}

impl TryFrom<HashMap<String, HashSet<String>>> for FilterSpec {
    type Error = ReportError;

    /// Builds a spec keyed by field names as they appear in the sheet header.
    fn try_from(map: HashMap<String, HashSet<String>>) -> Result<Self, Self::Error> {
        let mut spec = FilterSpec::new();
        for (name, values) in map {
            let field = Field::parse(name.trim())
                .filter(Field::is_filterable)
                .ok_or_else(|| ReportError::UnsupportedFilterField(name.to_owned()))?;
            spec = spec.with(field, values)?;
        }
        Ok(spec)
    }
}

/// Keeps the records accepted by `spec`, in order, renumbered from 1.
pub fn filter(table: &Table, spec: &FilterSpec) -> Table {
    let records = table
        .records()
        .iter()
        .filter(|record| spec.accepts(record))
        .cloned()
        .collect();
    let filtered = Table::from_records(records);
    debug!("Filter kept {} of {} record(s)", filtered.len(), table.len());
    filtered
}

/// Sorted, de-duplicated, non-blank values of the field named `field`.
/// Unknown fields and an absent table yield an empty list.
pub fn distinct_values(table: Option<&Table>, field: &str) -> Vec<String> {
    let (Some(table), Some(field)) = (table, Field::parse(field.trim())) else {
        return Vec::new();
    };
    let values: BTreeSet<String> = table
        .records()
        .iter()
        .map(|record| record.get(field).to_string())
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect();
    values.into_iter().collect()
}
