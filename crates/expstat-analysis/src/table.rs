//! Result tables
//!
//! Every analysis returns its numbers as a [`ResultTable`]: a list of rows, each
//! identified by a key tuple, holding one `f64` per column. `NaN` marks an
//! undefined cell (e.g. the standard deviation of a single observation).
//!
//! Tables print as fixed-width text and serialize to JSON, where `NaN` cells
//! become `null`.

use std::fmt;

use serde::Serialize;

use crate::dataset::{GroupKey, format_key};

/// Which analysis produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    SummaryStats,
    DiffTable,
    RegressionResults,
}

/// A single row of a [`ResultTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// Row identifier, one value per index name.
    pub key: Vec<GroupKey>,
    /// One value per column.
    pub values: Vec<f64>,
}

/// A derived, read-only table of analysis results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    kind: TableKind,
    index_names: Vec<String>,
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// # Panics
    ///
    /// Panics if a row does not have exactly one value per column.
    #[must_use]
    pub fn new(
        kind: TableKind,
        index_names: Vec<String>,
        columns: Vec<String>,
        rows: Vec<ResultRow>,
    ) -> Self {
        assert!(
            rows.iter().all(|row| row.values.len() == columns.len()),
            "every row must have one value per column"
        );
        Self {
            kind,
            index_names,
            columns,
            rows,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    #[must_use]
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, key: &[GroupKey]) -> Option<&ResultRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Looks up a single cell by row key and column name.
    #[must_use]
    pub fn value(&self, key: &[GroupKey], column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.row(key).map(|row| row.values[index])
    }
}

const LABEL_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 12;

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_label = self.index_names.join(", ");
        write!(f, "  {index_label:<LABEL_WIDTH$}")?;
        for column in &self.columns {
            write!(f, " {column:>VALUE_WIDTH$}")?;
        }
        writeln!(f)?;

        let total_width = LABEL_WIDTH + (VALUE_WIDTH + 1) * self.columns.len();
        writeln!(f, "  {}", "-".repeat(total_width))?;

        for row in &self.rows {
            let label = format_key(&row.key);
            write!(f, "  {label:<LABEL_WIDTH$}")?;
            for value in &row.values {
                if value.is_nan() {
                    write!(f, " {:>VALUE_WIDTH$}", "N/A")?;
                } else {
                    write!(f, " {value:>VALUE_WIDTH$.4}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
