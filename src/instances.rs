//! Instance property table
//!
//! CSV with one row per benchmarked instance: an identifier column plus
//! numeric property columns (size, density, ...) used as independent
//! variables. Properties are an explicit list validated as numeric when the
//! table is loaded, so bad columns fail here instead of deep in fitting.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading an instance table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceTableError {
    #[error("Instance property table is empty")]
    Empty,

    #[error("Column '{0}' not found in instance property table")]
    MissingColumn(String),

    #[error("Column '{column}' is not numeric: line {line} has '{value}'")]
    NonNumeric {
        column: String,
        line: usize,
        value: String,
    },

    #[error("Duplicate instance id '{0}'")]
    DuplicateId(String),

    #[error("Line {line} has {actual} fields, header has {expected}")]
    MalformedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid CSV at line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl From<csv::Error> for InstanceTableError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map_or(0, |p| p.line() as usize);
        InstanceTableError::Csv {
            line,
            message: e.to_string(),
        }
    }
}

/// Read-only mapping `instance id -> {property: value}`
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceTable {
    id_column: String,
    properties: Vec<String>,
    /// Values in `properties` order
    rows: BTreeMap<String, Vec<f64>>,
}

impl InstanceTable {
    /// Load a table from a CSV file
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        id_column: &str,
        properties: &[String],
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_csv_str(&content, id_column, properties)
            .with_context(|| format!("Invalid instance property table {}", path.display()))
    }

    /// Parse CSV text.
    ///
    /// With an empty `properties` list every column except `id_column` is
    /// taken as a property; all of them must be numeric.
    pub fn from_csv_str(
        content: &str,
        id_column: &str,
        properties: &[String],
    ) -> std::result::Result<Self, InstanceTableError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if header.is_empty() {
            return Err(InstanceTableError::Empty);
        }

        let id_index = column_index(&header, id_column)?;
        let selected: Vec<String> = if properties.is_empty() {
            header
                .iter()
                .filter(|name| name.as_str() != id_column)
                .cloned()
                .collect()
        } else {
            properties
                .iter()
                .filter(|name| name.as_str() != id_column)
                .cloned()
                .collect()
        };
        let indices = selected
            .iter()
            .map(|name| column_index(&header, name))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rows = BTreeMap::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            if record.len() != header.len() {
                return Err(InstanceTableError::MalformedRow {
                    line,
                    expected: header.len(),
                    actual: record.len(),
                });
            }

            let values = indices
                .iter()
                .zip(&selected)
                .map(|(&idx, column)| parse_numeric(&record[idx], column, line))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let id = record[id_index].to_string();
            if rows.insert(id.clone(), values).is_some() {
                return Err(InstanceTableError::DuplicateId(id));
            }
        }

        Ok(Self {
            id_column: id_column.to_string(),
            properties: selected,
            rows,
        })
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Validated numeric property names, identifier excluded
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.rows.contains_key(instance_id)
    }

    pub fn value(&self, instance_id: &str, property: &str) -> Option<f64> {
        let idx = self.properties.iter().position(|p| p == property)?;
        self.rows.get(instance_id).map(|values| values[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(header: &[String], name: &str) -> std::result::Result<usize, InstanceTableError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| InstanceTableError::MissingColumn(name.to_string()))
}

fn parse_numeric(
    field: &str,
    column: &str,
    line: usize,
) -> std::result::Result<f64, InstanceTableError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InstanceTableError::NonNumeric {
            column: column.to_string(),
            line,
            value: field.to_string(),
        })
}
