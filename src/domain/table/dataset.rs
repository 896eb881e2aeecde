// ============================================================
// TABULAR DATASET
// ============================================================
// Column-named, row-ordered in-memory table

use std::collections::HashSet;

use super::value::{Value, ValueIdentity};
use crate::domain::error::{AppError, Result};

/// Ordered columns plus ordered rows; each row holds one value per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset from a raw header row.
    ///
    /// Blank headers become `Unnamed: <index>` and repeated names get a
    /// numeric suffix, so column names are always unique.
    pub fn with_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: normalize_header(header),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AppError::ParseError(format!(
                "row {} has {} values, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Push a row after padding it with nulls or truncating it to the header
    /// width.
    pub fn push_row_fitted(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[column])
    }

    pub fn column_values_mut(&mut self, column: usize) -> impl Iterator<Item = &mut Value> + '_ {
        self.rows.iter_mut().map(move |row| &mut row[column])
    }

    /// Drop rows that exactly repeat an earlier row. Survivors keep their
    /// order. Returns the number of rows removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<ValueIdentity>> = HashSet::with_capacity(before);
        self.rows
            .retain(|row| seen.insert(row.iter().map(Value::identity).collect()));
        before - self.rows.len()
    }
}

fn normalize_header<I, S>(header: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut columns: Vec<String> = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for (index, raw) in header.into_iter().enumerate() {
        let base = match raw.as_ref().trim() {
            "" => format!("Unnamed: {}", index),
            name => name.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while taken.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        taken.insert(name.clone());
        columns.push(name);
    }

    columns
}
