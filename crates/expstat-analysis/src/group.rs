//! Grouping, aggregation and pivoting
//!
//! Group-wise statistics are computed in three explicit steps:
//!
//! 1. [`group_rows`]: map each key tuple to the indices of its rows
//! 2. [`aggregate`]: reduce each group's values of a numeric column to a scalar
//! 3. [`pivot`]: lay a `key tuple -> scalar` map out as a two-dimensional table,
//!    with the last key element as the column dimension
//!
//! ```text
//! (L1, A) -> 1.0              |    A    B
//! (L1, B) -> 2.0    pivot     | ---------
//! (L2, A) -> 3.0   ------>  L1 |  1.0  2.0
//!                           L2 |  3.0   -
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    AnalysisError,
    dataset::{Dataset, GroupKey},
};

/// A tuple of grouping values, one per key column.
pub type KeyTuple = Vec<GroupKey>;

/// Row indices per group, ordered by key tuple.
pub type Groups = BTreeMap<KeyTuple, Vec<usize>>;

/// Groups the dataset rows by the values of `key_columns`.
///
/// Rows with a missing cell in any key column are dropped. With no key
/// columns, every row falls into a single group keyed by the empty tuple;
/// that group exists even when the dataset has no rows.
///
/// # Examples
///
/// ```
/// # use expstat_analysis::{dataset::{Column, Dataset, GroupKey}, group::group_rows};
/// let data = Dataset::new([("g", Column::categorical(["B", "A", "B"]))]).unwrap();
/// let groups = group_rows(&data, &["g"]).unwrap();
/// assert_eq!(groups[&vec![GroupKey::from("A")]], [1]);
/// assert_eq!(groups[&vec![GroupKey::from("B")]], [0, 2]);
/// ```
pub fn group_rows(dataset: &Dataset, key_columns: &[&str]) -> Result<Groups, AnalysisError> {
    let columns = key_columns
        .iter()
        .map(|name| dataset.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Ok(Groups::from([(KeyTuple::new(), (0..dataset.n_rows()).collect())]));
    }

    let mut groups = Groups::new();
    for row in 0..dataset.n_rows() {
        let key = columns
            .iter()
            .map(|column| column.key(row))
            .collect::<Option<KeyTuple>>();
        if let Some(key) = key {
            groups.entry(key).or_default().push(row);
        }
    }

    tracing::debug!(?key_columns, groups = groups.len(), "grouped rows");
    Ok(groups)
}

/// Reduces each group's non-missing values of `column` with `reduce`.
///
/// # Examples
///
/// ```
/// # use expstat_analysis::{dataset::{Column, Dataset}, group::{aggregate, group_rows}};
/// let data = Dataset::new([
///     ("g", Column::categorical(["A", "A", "B"])),
///     ("y", Column::numeric([1.0, f64::NAN, 5.0])),
/// ])
/// .unwrap();
/// let groups = group_rows(&data, &["g"]).unwrap();
/// let counts = aggregate(&groups, data.numeric_column("y").unwrap(), <[f64]>::len);
/// assert_eq!(counts.into_values().collect::<Vec<_>>(), [1, 1]);
/// ```
pub fn aggregate<T, F>(
    groups: &Groups,
    column: &[Option<f64>],
    mut reduce: F,
) -> BTreeMap<KeyTuple, T>
where
    F: FnMut(&[f64]) -> T,
{
    let mut values = Vec::new();
    groups
        .iter()
        .map(|(key, rows)| {
            values.clear();
            values.extend(
                rows.iter()
                    .filter_map(|&row| column[row])
                    .filter(|v| !v.is_nan()),
            );
            (key.clone(), reduce(&values))
        })
        .collect()
}

/// A two-dimensional layout of group-wise scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot<T> {
    /// Row keys: all but the last element of each key tuple, ascending.
    pub row_keys: Vec<KeyTuple>,
    /// Column keys: the last element of each key tuple, ascending.
    pub column_keys: Vec<GroupKey>,
    /// `cells[row][column]`, `None` where the combination was absent.
    pub cells: Vec<Vec<Option<T>>>,
}

/// Pivots a `key tuple -> scalar` map, unstacking the last key element into columns.
///
/// # Panics
///
/// Panics if any key tuple is empty.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// # use expstat_analysis::{dataset::GroupKey, group::pivot};
/// let map = BTreeMap::from([
///     (vec![GroupKey::from("L1"), GroupKey::from("A")], 1.0),
///     (vec![GroupKey::from("L1"), GroupKey::from("B")], 2.0),
///     (vec![GroupKey::from("L2"), GroupKey::from("A")], 3.0),
/// ]);
/// let pivot = pivot(map);
/// assert_eq!(pivot.column_keys, [GroupKey::from("A"), GroupKey::from("B")]);
/// assert_eq!(pivot.cells, [[Some(1.0), Some(2.0)], [Some(3.0), None]]);
/// ```
#[must_use]
pub fn pivot<T>(map: BTreeMap<KeyTuple, T>) -> Pivot<T>
where
    T: Clone,
{
    let mut entries = Vec::with_capacity(map.len());
    let mut row_set = BTreeSet::new();
    let mut column_set = BTreeSet::new();
    for (mut key, value) in map {
        let Some(column) = key.pop() else {
            panic!("pivot keys must not be empty");
        };
        row_set.insert(key.clone());
        column_set.insert(column.clone());
        entries.push((key, column, value));
    }

    let row_keys = row_set.into_iter().collect::<Vec<_>>();
    let column_keys = column_set.into_iter().collect::<Vec<_>>();
    let mut cells = vec![vec![None; column_keys.len()]; row_keys.len()];
    for (row, column, value) in entries {
        if let (Ok(r), Ok(c)) = (
            row_keys.binary_search(&row),
            column_keys.binary_search(&column),
        ) {
            cells[r][c] = Some(value);
        }
    }

    Pivot {
        row_keys,
        column_keys,
        cells,
    }
}
