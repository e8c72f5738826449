//! Column-aligned group membership data.

use crate::error::FairnessError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A table of categorical protected-attribute columns, one row per sample.
///
/// Columns are stored sorted by name so that iteration (and therefore report
/// output) is deterministic. All columns must have the same length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupTable {
    columns: BTreeMap<String, Vec<String>>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (name, values) pairs in one call.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, FairnessError>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    /// Add a column. Fails if its length disagrees with existing columns.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<(), FairnessError> {
        let name = name.into();
        if let Some(expected) = self.columns.values().next().map(Vec::len) {
            if values.len() != expected {
                return Err(FairnessError::validation(format!(
                    "Column '{name}' has {} rows, expected {expected}",
                    values.len()
                )));
            }
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Number of rows (0 for an empty table).
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Distinct values of a column, sorted. Empty if the column is absent.
    pub fn distinct_values(&self, name: &str) -> Vec<&str> {
        self.columns
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(String::as_str)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Row indices whose value in `name` equals `group`.
    pub fn member_indices(&self, name: &str, group: &str) -> Vec<usize> {
        self.columns
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.as_str() == group)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }
}
