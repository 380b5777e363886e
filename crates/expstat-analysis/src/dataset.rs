//! Typed in-memory dataset
//!
//! A [`Dataset`] is a set of named, equal-length columns. Each column is either
//! numeric or categorical and may contain missing cells:
//!
//! ```text
//! Dataset (4 rows)
//! ├─ "g": Categorical [A, A, B, B]
//! ├─ "x": Numeric     [1.0, 2.0, -, 4.0]
//! └─ "y": Numeric     [10.0, 10.0, 20.0, 20.0]
//! ```
//!
//! Column lookup by name fails with [`AnalysisError::InvalidColumn`] instead of
//! returning an empty value.
//!
//! # Serialization
//!
//! Datasets deserialize from a column-oriented JSON object. A column of
//! numbers (and nulls) is numeric; a column of strings (and nulls) is
//! categorical:
//!
//! ```json
//! {
//!   "g": ["A", "A", "B", "B"],
//!   "x": [1.0, 2.0, null, 4.0],
//!   "y": [10, 10, 20, 20]
//! }
//! ```

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("column '{column}' has {len} rows but the dataset has {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
    #[display("column '{column}' is defined more than once")]
    DuplicateColumn { column: String },
}

/// A single column of observations.
///
/// `None` marks a missing cell. A numeric `NaN` is treated as missing as well.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Builds a numeric column, mapping `NaN` to a missing cell.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_analysis::dataset::Column;
    /// let column = Column::numeric([1.0, f64::NAN]);
    /// assert_eq!(column, Column::Numeric(vec![Some(1.0), None]));
    /// ```
    #[must_use]
    pub fn numeric<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::Numeric(
            values
                .into_iter()
                .map(|v| (!v.is_nan()).then_some(v))
                .collect(),
        )
    }

    /// Builds a categorical column with no missing cells.
    #[must_use]
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical(values.into_iter().map(|v| Some(v.into())).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the grouping key of a row, or `None` if the cell is missing.
    #[must_use]
    pub fn key(&self, row: usize) -> Option<GroupKey> {
        match self {
            Column::Numeric(values) => values[row]
                .filter(|v| !v.is_nan())
                .map(GroupKey::from),
            Column::Categorical(values) => values[row].clone().map(GroupKey::Text),
        }
    }
}

/// A table of named, equal-length columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Column>")]
pub struct Dataset {
    columns: BTreeMap<String, Column>,
    n_rows: usize,
}

impl Dataset {
    /// Builds a dataset from `(name, column)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_analysis::dataset::{Column, Dataset};
    /// let data = Dataset::new([
    ///     ("g", Column::categorical(["A", "B"])),
    ///     ("y", Column::numeric([1.0, 2.0])),
    /// ])
    /// .unwrap();
    /// assert_eq!(data.n_rows(), 2);
    /// assert!(data.column("z").is_err());
    /// ```
    pub fn new<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, column) in columns {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(DatasetError::DuplicateColumn { column: name });
            }
            map.insert(name, column);
        }
        Self::try_from(map)
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<&Column, AnalysisError> {
        self.columns
            .get(name)
            .ok_or_else(|| AnalysisError::InvalidColumn {
                column: name.to_owned(),
            })
    }

    pub fn numeric_column(&self, name: &str) -> Result<&[Option<f64>], AnalysisError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Categorical(_) => Err(AnalysisError::NonNumericColumn {
                column: name.to_owned(),
            }),
        }
    }
}

impl TryFrom<BTreeMap<String, Column>> for Dataset {
    type Error = DatasetError;

    fn try_from(columns: BTreeMap<String, Column>) -> Result<Self, Self::Error> {
        let n_rows = columns.values().next().map_or(0, Column::len);
        if let Some((name, column)) = columns.iter().find(|(_, c)| c.len() != n_rows) {
            return Err(DatasetError::LengthMismatch {
                column: name.clone(),
                len: column.len(),
                expected: n_rows,
            });
        }
        Ok(Self { columns, n_rows })
    }
}

/// A single grouping value.
///
/// Keys are totally ordered: numbers (by [`f64::total_cmp`]) sort before text.
/// Build numeric keys with [`GroupKey::from`], which folds `-0.0` into `0.0` so
/// both zeros form one group.
#[derive(Debug, Clone, derive_more::Display, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    #[display("{_0}")]
    Number(f64),
    #[display("{_0}")]
    Text(String),
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Text(value.to_owned())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        GroupKey::Text(value)
    }
}

impl From<f64> for GroupKey {
    fn from(value: f64) -> Self {
        // -0.0 + 0.0 == +0.0
        GroupKey::Number(value + 0.0)
    }
}

/// Formats a key tuple as a single label, e.g. `A, 1`.
#[must_use]
pub fn format_key(key: &[GroupKey]) -> String {
    key.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
