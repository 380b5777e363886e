//! Summary statistics, difference tables and regression results
//!
//! [`Analyzer`] owns a [`Dataset`] and answers three questions about it:
//!
//! - [`Analyzer::create_summary_stats`]: mean and standard deviation of each
//!   variable, overall or per level value
//! - [`Analyzer::create_diff_table`]: pairwise differences of group means of an
//!   outcome, optionally within each level value
//! - [`Analyzer::regression_results`]: OLS of an outcome on covariates, on raw
//!   rows or on level means
//!
//! Every call is a pure function of the stored dataset and its arguments.
//!
//! # Difference table layout
//!
//! Without a level, every combination of the group columns is both a row and a
//! column, and `diff[i][j] = mean_i - mean_j`:
//!
//! ```text
//!  g  |     A      B
//! ----+-------------
//!  A  |   0.0  -10.0
//!  B  |  10.0    0.0
//! ```
//!
//! With a level, the last group column is unstacked into columns and one block
//! is emitted per remaining key (level value plus leading group values):
//!
//! ```text
//!  level, g |     A      B
//! ----------+-------------
//!  1, A     |   0.0   -2.0
//!  1, B     |   2.0    0.0
//!  2, A     |   0.0    5.0
//!  2, B     |  -5.0    0.0
//! ```

use std::collections::BTreeMap;

use expstat_stats::{
    descriptive::DescriptiveStats,
    ols::{Coefficient, OlsFit, add_constant},
};
use nalgebra::{DMatrix, DVector};

use crate::{
    AnalysisError,
    dataset::{Dataset, GroupKey, format_key},
    group::{self, KeyTuple},
    table::{ResultRow, ResultTable, TableKind},
};

/// Name of the intercept term in regression results.
pub const INTERCEPT_TERM: &str = "const";

/// Columns of the regression coefficient table.
pub const REGRESSION_COLUMNS: [&str; 6] =
    ["coef", "std_err", "t", "p_value", "ci_lower", "ci_upper"];

/// Mean and standard deviation per variable.
#[derive(Debug, Clone)]
pub struct SummaryStats {
    pub table: ResultTable,
}

/// Pairwise differences of group means.
#[derive(Debug, Clone)]
pub struct DiffTable {
    pub table: ResultTable,
}

/// Coefficient table and fit metrics of an OLS regression.
#[derive(Debug, Clone)]
pub struct RegressionResults {
    /// Coefficient rows followed by the `r_squared` and `rmse` rows.
    pub table: ResultTable,
    /// Per-term estimates, intercept first.
    pub coefficients: Vec<(String, Coefficient)>,
    pub r_squared: f64,
    pub rmse: f64,
    /// Number of rows the model was fitted on.
    pub n_obs: usize,
}

impl RegressionResults {
    #[must_use]
    pub fn coefficient(&self, term: &str) -> Option<&Coefficient> {
        self.coefficients
            .iter()
            .find_map(|(name, coefficient)| (name == term).then_some(coefficient))
    }
}

/// Analyses over a single in-memory dataset.
#[derive(Debug, Clone)]
pub struct Analyzer {
    data: Dataset,
}

impl Analyzer {
    #[must_use]
    pub fn new(data: Dataset) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Computes mean and standard deviation of each variable.
    ///
    /// `groups` only has to name existing columns; it does not change the
    /// result. With a `level`, one row is produced per level value; otherwise a
    /// single row covers the whole dataset. Columns are `{variable}_mean` and
    /// `{variable}_std` in request order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_analysis::{analyzer::Analyzer, dataset::{Column, Dataset}};
    /// let data = Dataset::new([("x", Column::numeric([1.0, 2.0, 3.0, 4.0]))]).unwrap();
    /// let summary = Analyzer::new(data).create_summary_stats(&["x"], &[], None).unwrap();
    /// assert_eq!(summary.table.value(&[], "x_mean"), Some(2.5));
    /// ```
    pub fn create_summary_stats(
        &self,
        variables: &[&str],
        groups: &[&str],
        level: Option<&str>,
    ) -> Result<SummaryStats, AnalysisError> {
        if variables.is_empty() {
            return Err(AnalysisError::EmptyColumnList {
                argument: "variables",
            });
        }
        for name in groups {
            self.data.column(name)?;
        }
        let columns = variables
            .iter()
            .map(|name| self.data.numeric_column(name))
            .collect::<Result<Vec<_>, _>>()?;

        let key_columns = level.as_slice();
        let grouped = group::group_rows(&self.data, key_columns)?;
        let stats = columns
            .iter()
            .map(|column| group::aggregate(&grouped, column, mean_and_std))
            .collect::<Vec<_>>();

        let rows = grouped
            .keys()
            .map(|key| ResultRow {
                key: key.clone(),
                values: stats
                    .iter()
                    .flat_map(|per_group| {
                        let (mean, std) = per_group[key];
                        [mean, std]
                    })
                    .collect(),
            })
            .collect();
        let column_names = variables
            .iter()
            .flat_map(|name| [format!("{name}_mean"), format!("{name}_std")])
            .collect();

        Ok(SummaryStats {
            table: ResultTable::new(
                TableKind::SummaryStats,
                owned(key_columns),
                column_names,
                rows,
            ),
        })
    }

    /// Computes pairwise differences of the mean of `outcome` across groups.
    ///
    /// See the [module documentation](self) for the table layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_analysis::{analyzer::Analyzer, dataset::{Column, Dataset, GroupKey}};
    /// let data = Dataset::new([
    ///     ("g", Column::categorical(["A", "A", "B", "B"])),
    ///     ("y", Column::numeric([10.0, 10.0, 20.0, 20.0])),
    /// ])
    /// .unwrap();
    /// let diff = Analyzer::new(data).create_diff_table("y", &["g"], None).unwrap();
    /// assert_eq!(diff.table.value(&[GroupKey::from("A")], "B"), Some(-10.0));
    /// assert_eq!(diff.table.value(&[GroupKey::from("B")], "A"), Some(10.0));
    /// ```
    pub fn create_diff_table(
        &self,
        outcome: &str,
        groups: &[&str],
        level: Option<&str>,
    ) -> Result<DiffTable, AnalysisError> {
        if groups.is_empty() {
            return Err(AnalysisError::EmptyColumnList { argument: "groups" });
        }
        let values = self.data.numeric_column(outcome)?;

        let key_columns = level
            .into_iter()
            .chain(groups.iter().copied())
            .collect::<Vec<_>>();
        let grouped = group::group_rows(&self.data, &key_columns)?;
        if grouped.is_empty() {
            return Err(AnalysisError::EmptyGroup {
                group: "<all rows>".to_owned(),
                outcome: outcome.to_owned(),
            });
        }

        let means = group::aggregate(&grouped, values, |v| {
            DescriptiveStats::from_present(v).map(|stats| stats.mean)
        })
        .into_iter()
        .map(|(key, mean)| match mean {
            Some(mean) => Ok((key, mean)),
            None => Err(empty_group(&key, outcome)),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

        let (columns, rows) = match level {
            Some(_) => unstacked_diff(means, outcome)?,
            None => square_diff(&means),
        };
        tracing::debug!(outcome, rows = rows.len(), "built difference table");

        Ok(DiffTable {
            table: ResultTable::new(TableKind::DiffTable, owned(&key_columns), columns, rows),
        })
    }

    /// Fits an OLS regression of `outcome` on `covariates` plus an intercept.
    ///
    /// With a `level`, the dataset is first collapsed to one row per level
    /// value by averaging the outcome and every covariate. The outcome and the
    /// covariates must not contain missing or infinite values once collapsed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_analysis::{analyzer::Analyzer, dataset::{Column, Dataset}};
    /// let data = Dataset::new([
    ///     ("x", Column::numeric([1.0, 2.0, 3.0, 4.0, 5.0])),
    ///     ("y", Column::numeric([2.0, 4.0, 5.0, 4.0, 5.0])),
    /// ])
    /// .unwrap();
    /// let results = Analyzer::new(data).regression_results("y", &["x"], None).unwrap();
    /// assert!((results.coefficient("x").unwrap().estimate - 0.6).abs() < 1e-9);
    /// assert!((results.r_squared - 0.6).abs() < 1e-9);
    /// ```
    pub fn regression_results(
        &self,
        outcome: &str,
        covariates: &[&str],
        level: Option<&str>,
    ) -> Result<RegressionResults, AnalysisError> {
        if covariates.is_empty() {
            return Err(AnalysisError::EmptyColumnList {
                argument: "covariates",
            });
        }
        let y_column = self.data.numeric_column(outcome)?;
        let x_columns = covariates
            .iter()
            .map(|name| self.data.numeric_column(name))
            .collect::<Result<Vec<_>, _>>()?;

        let (y, x) = match level {
            Some(level) => {
                let grouped = group::group_rows(&self.data, &[level])?;
                (
                    level_means(&grouped, y_column),
                    x_columns
                        .iter()
                        .map(|column| level_means(&grouped, column))
                        .collect::<Vec<_>>(),
                )
            }
            None => (
                raw_values(y_column),
                x_columns.iter().map(|column| raw_values(column)).collect(),
            ),
        };

        for (name, values) in covariates.iter().zip(&x).chain([(&outcome, &y)]) {
            let missing = values.iter().filter(|v| !v.is_finite()).count();
            if missing > 0 {
                return Err(AnalysisError::DataValidation {
                    column: (*name).to_owned(),
                    missing,
                });
            }
        }

        let design = add_constant(&DMatrix::from_fn(y.len(), x.len(), |r, c| x[c][r]));
        let fit = OlsFit::fit(&design, &DVector::from_vec(y))?;
        tracing::debug!(
            outcome,
            n_obs = fit.n_obs,
            r_squared = fit.r_squared,
            "fitted regression"
        );

        let coefficients = [INTERCEPT_TERM]
            .into_iter()
            .chain(covariates.iter().copied())
            .map(str::to_owned)
            .zip(fit.coefficients.iter().copied())
            .collect::<Vec<_>>();

        let mut rows = coefficients
            .iter()
            .map(|(term, c)| ResultRow {
                key: vec![GroupKey::from(term.as_str())],
                values: vec![c.estimate, c.std_err, c.t, c.p_value, c.ci_lower, c.ci_upper],
            })
            .collect::<Vec<_>>();
        for (name, value) in [("r_squared", fit.r_squared), ("rmse", fit.rmse)] {
            let mut values = vec![f64::NAN; REGRESSION_COLUMNS.len()];
            values[0] = value;
            rows.push(ResultRow {
                key: vec![GroupKey::from(name)],
                values,
            });
        }

        Ok(RegressionResults {
            table: ResultTable::new(
                TableKind::RegressionResults,
                vec!["term".to_owned()],
                owned(&REGRESSION_COLUMNS),
                rows,
            ),
            coefficients,
            r_squared: fit.r_squared,
            rmse: fit.rmse,
            n_obs: fit.n_obs,
        })
    }
}

/// One row and one column per group combination.
fn square_diff(means: &BTreeMap<KeyTuple, f64>) -> (Vec<String>, Vec<ResultRow>) {
    let columns = means.keys().map(|key| format_key(key)).collect();
    let rows = means
        .iter()
        .map(|(key, mean_i)| ResultRow {
            key: key.clone(),
            values: means.values().map(|mean_j| mean_i - mean_j).collect(),
        })
        .collect();
    (columns, rows)
}

/// One block per leading key, with the last group dimension as columns.
fn unstacked_diff(
    means: BTreeMap<KeyTuple, f64>,
    outcome: &str,
) -> Result<(Vec<String>, Vec<ResultRow>), AnalysisError> {
    let pivot = group::pivot(means);
    let columns = pivot.column_keys.iter().map(ToString::to_string).collect();

    let mut rows = Vec::with_capacity(pivot.row_keys.len() * pivot.column_keys.len());
    for (row_key, cells) in pivot.row_keys.iter().zip(&pivot.cells) {
        let block = cells
            .iter()
            .zip(&pivot.column_keys)
            .map(|(cell, column_key)| {
                cell.ok_or_else(|| {
                    let mut key = row_key.clone();
                    key.push(column_key.clone());
                    empty_group(&key, outcome)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (mean_i, column_key) in block.iter().zip(&pivot.column_keys) {
            let mut key = row_key.clone();
            key.push(column_key.clone());
            rows.push(ResultRow {
                key,
                values: block.iter().map(|mean_j| mean_i - mean_j).collect(),
            });
        }
    }
    Ok((columns, rows))
}

fn raw_values(column: &[Option<f64>]) -> Vec<f64> {
    column.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

fn level_means(grouped: &group::Groups, column: &[Option<f64>]) -> Vec<f64> {
    group::aggregate(grouped, column, |v| {
        DescriptiveStats::from_present(v).map_or(f64::NAN, |stats| stats.mean)
    })
    .into_values()
    .collect()
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    DescriptiveStats::from_present(values)
        .map_or((f64::NAN, f64::NAN), |stats| (stats.mean, stats.std_dev))
}

fn empty_group(key: &[GroupKey], outcome: &str) -> AnalysisError {
    AnalysisError::EmptyGroup {
        group: format_key(key),
        outcome: outcome.to_owned(),
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use expstat_stats::ols::OlsError;
    use proptest::prelude::*;

    use crate::dataset::Column;

    use super::*;

    fn key(values: &[&str]) -> Vec<GroupKey> {
        values.iter().map(|v| GroupKey::from(*v)).collect()
    }

    fn treatment_data() -> Analyzer {
        Analyzer::new(
            Dataset::new([
                ("level", Column::numeric([1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0])),
                ("g", Column::categorical(["A", "A", "B", "B", "A", "A", "B", "B"])),
                ("y", Column::numeric([1.0, 3.0, 4.0, 4.0, 10.0, 10.0, 5.0, 5.0])),
                ("x", Column::numeric([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_summary_without_level() {
        let analyzer =
            Analyzer::new(Dataset::new([("x", Column::numeric([1.0, 2.0, 3.0, 4.0]))]).unwrap());
        let summary = analyzer.create_summary_stats(&["x"], &[], None).unwrap();
        let table = &summary.table;

        assert_eq!(table.kind(), TableKind::SummaryStats);
        assert_eq!(table.columns(), ["x_mean", "x_std"]);
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.value(&[], "x_mean"), Some(2.5));
        let std = table.value(&[], "x_std").unwrap();
        assert!((std - 1.290_994).abs() < 1e-6);
    }

    #[test]
    fn test_summary_with_level() {
        let summary = treatment_data()
            .create_summary_stats(&["y", "x"], &["g"], Some("g"))
            .unwrap();
        let table = &summary.table;

        assert_eq!(table.index_names(), ["g"]);
        assert_eq!(table.columns(), ["y_mean", "y_std", "x_mean", "x_std"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.value(&key(&["A"]), "y_mean"), Some(6.0));
        assert_eq!(table.value(&key(&["B"]), "y_mean"), Some(4.5));
        assert_eq!(table.value(&key(&["B"]), "x_mean"), Some(5.5));
    }

    #[test]
    fn test_summary_single_observation_has_undefined_std() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("g", Column::categorical(["A", "B", "B"])),
                ("y", Column::numeric([1.0, 2.0, 4.0])),
            ])
            .unwrap(),
        );
        let summary = analyzer.create_summary_stats(&["y"], &[], Some("g")).unwrap();
        assert_eq!(summary.table.value(&key(&["A"]), "y_mean"), Some(1.0));
        assert!(summary.table.value(&key(&["A"]), "y_std").unwrap().is_nan());
        assert_eq!(summary.table.value(&key(&["B"]), "y_mean"), Some(3.0));
    }

    #[test]
    fn test_summary_of_empty_dataset_has_one_row() {
        let analyzer = Analyzer::new(Dataset::new([("x", Column::Numeric(vec![]))]).unwrap());
        let summary = analyzer.create_summary_stats(&["x"], &[], None).unwrap();
        let table = &summary.table;

        assert_eq!(table.rows().len(), 1);
        assert!(table.value(&[], "x_mean").unwrap().is_nan());
        assert!(table.value(&[], "x_std").unwrap().is_nan());
    }

    #[test]
    fn test_summary_errors() {
        let analyzer = treatment_data();
        assert!(matches!(
            analyzer.create_summary_stats(&["nope"], &[], None),
            Err(AnalysisError::InvalidColumn { column }) if column == "nope"
        ));
        assert!(matches!(
            analyzer.create_summary_stats(&["y"], &["nope"], None),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_summary_stats(&["y"], &[], Some("nope")),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_summary_stats(&["g"], &[], None),
            Err(AnalysisError::NonNumericColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_summary_stats(&[], &[], None),
            Err(AnalysisError::EmptyColumnList { argument: "variables" })
        ));
    }

    #[test]
    fn test_diff_table_without_level() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("g", Column::categorical(["A", "A", "B", "B"])),
                ("y", Column::numeric([10.0, 10.0, 20.0, 20.0])),
            ])
            .unwrap(),
        );
        let diff = analyzer.create_diff_table("y", &["g"], None).unwrap();
        let table = &diff.table;

        assert_eq!(table.kind(), TableKind::DiffTable);
        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.value(&key(&["A"]), "B"), Some(-10.0));
        assert_eq!(table.value(&key(&["B"]), "A"), Some(10.0));
        assert_eq!(table.value(&key(&["A"]), "A"), Some(0.0));
        assert_eq!(table.value(&key(&["B"]), "B"), Some(0.0));
    }

    #[test]
    fn test_diff_table_with_level() {
        let diff = treatment_data()
            .create_diff_table("y", &["g"], Some("level"))
            .unwrap();
        let table = &diff.table;
        let row = |level: f64, g: &str| vec![GroupKey::from(level), GroupKey::from(g)];

        assert_eq!(table.index_names(), ["level", "g"]);
        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.value(&row(1.0, "A"), "B"), Some(-2.0));
        assert_eq!(table.value(&row(1.0, "B"), "A"), Some(2.0));
        assert_eq!(table.value(&row(2.0, "A"), "B"), Some(5.0));
        assert_eq!(table.value(&row(2.0, "B"), "A"), Some(-5.0));
        assert_eq!(table.value(&row(2.0, "B"), "B"), Some(0.0));
    }

    #[test]
    fn test_diff_table_multiple_groups_without_level() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("g", Column::categorical(["A", "A", "B"])),
                ("h", Column::categorical(["x", "y", "x"])),
                ("y", Column::numeric([1.0, 2.0, 4.0])),
            ])
            .unwrap(),
        );
        let diff = analyzer.create_diff_table("y", &["g", "h"], None).unwrap();
        let table = &diff.table;

        assert_eq!(table.columns(), ["A, x", "A, y", "B, x"]);
        assert_eq!(table.value(&key(&["B", "x"]), "A, y"), Some(2.0));
        assert_eq!(table.value(&key(&["A", "x"]), "B, x"), Some(-3.0));
    }

    #[test]
    fn test_diff_table_empty_groups() {
        let all_missing = Analyzer::new(
            Dataset::new([
                ("g", Column::categorical(["A", "B"])),
                ("y", Column::Numeric(vec![Some(1.0), None])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            all_missing.create_diff_table("y", &["g"], None),
            Err(AnalysisError::EmptyGroup { group, .. }) if group == "B"
        ));

        let unbalanced = Analyzer::new(
            Dataset::new([
                ("level", Column::categorical(["L1", "L1", "L2"])),
                ("g", Column::categorical(["A", "B", "A"])),
                ("y", Column::numeric([1.0, 2.0, 3.0])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            unbalanced.create_diff_table("y", &["g"], Some("level")),
            Err(AnalysisError::EmptyGroup { group, .. }) if group == "L2, B"
        ));

        let empty = Analyzer::new(
            Dataset::new([
                ("g", Column::Categorical(vec![])),
                ("y", Column::Numeric(vec![])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            empty.create_diff_table("y", &["g"], None),
            Err(AnalysisError::EmptyGroup { .. })
        ));
    }

    #[test]
    fn test_diff_table_errors() {
        let analyzer = treatment_data();
        assert!(matches!(
            analyzer.create_diff_table("nope", &["g"], None),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_diff_table("y", &["nope"], None),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_diff_table("y", &["g"], Some("nope")),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_diff_table("g", &["level"], None),
            Err(AnalysisError::NonNumericColumn { .. })
        ));
        assert!(matches!(
            analyzer.create_diff_table("y", &[], None),
            Err(AnalysisError::EmptyColumnList { argument: "groups" })
        ));
    }

    #[test]
    fn test_regression_on_raw_rows() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("x", Column::numeric([1.0, 2.0, 3.0, 4.0, 5.0])),
                ("y", Column::numeric([2.0, 4.0, 5.0, 4.0, 5.0])),
            ])
            .unwrap(),
        );
        let results = analyzer.regression_results("y", &["x"], None).unwrap();

        assert_eq!(results.n_obs, 5);
        let intercept = results.coefficient(INTERCEPT_TERM).unwrap();
        let slope = results.coefficient("x").unwrap();
        assert!((intercept.estimate - 2.2).abs() < 1e-9);
        assert!((slope.estimate - 0.6).abs() < 1e-9);
        assert!((results.r_squared - 0.6).abs() < 1e-9);
        assert!((results.rmse - 0.48_f64.sqrt()).abs() < 1e-9);

        let table = &results.table;
        assert_eq!(table.kind(), TableKind::RegressionResults);
        assert_eq!(table.columns(), REGRESSION_COLUMNS);
        let terms = table
            .rows()
            .iter()
            .map(|row| row.key[0].to_string())
            .collect::<Vec<_>>();
        assert_eq!(terms, ["const", "x", "r_squared", "rmse"]);
        assert_eq!(table.value(&key(&["r_squared"]), "coef"), Some(results.r_squared));
        assert!(table.value(&key(&["rmse"]), "std_err").unwrap().is_nan());
    }

    #[test]
    fn test_regression_on_level_means() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("level", Column::categorical(["a", "a", "b", "b", "c", "c"])),
                ("x", Column::numeric([1.0, 3.0, 3.0, 5.0, 5.0, 7.0])),
                ("y", Column::numeric([2.0, 4.0, 5.0, 7.0, 6.0, 8.0])),
            ])
            .unwrap(),
        );
        let results = analyzer.regression_results("y", &["x"], Some("level")).unwrap();

        // Fitted on (2, 3), (4, 6), (6, 7)
        assert_eq!(results.n_obs, 3);
        assert!((results.coefficient("x").unwrap().estimate - 1.0).abs() < 1e-9);
        assert!((results.coefficient(INTERCEPT_TERM).unwrap().estimate - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_rejects_missing_values() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("x", Column::numeric([1.0, 2.0, f64::NAN, 4.0, 5.0])),
                ("z", Column::numeric([1.0, 0.0, 1.0, 0.0, 1.0])),
                ("y", Column::Numeric(vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            analyzer.regression_results("y", &["z", "x"], None),
            Err(AnalysisError::DataValidation { column, missing: 1 }) if column == "x"
        ));
        assert!(matches!(
            analyzer.regression_results("y", &["z"], None),
            Err(AnalysisError::DataValidation { column, missing: 1 }) if column == "y"
        ));
    }

    #[test]
    fn test_regression_rejects_infinite_values() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("x", Column::numeric([1.0, 2.0, f64::INFINITY, 4.0, 5.0])),
                ("y", Column::numeric([1.0, 2.0, 3.0, 5.0, 4.0])),
                ("z", Column::numeric([1.0, 0.0, 1.0, 0.0, f64::NEG_INFINITY])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            analyzer.regression_results("y", &["x"], None),
            Err(AnalysisError::DataValidation { column, missing: 1 }) if column == "x"
        ));
        assert!(matches!(
            analyzer.regression_results("z", &["y"], None),
            Err(AnalysisError::DataValidation { column, missing: 1 }) if column == "z"
        ));
    }

    #[test]
    fn test_regression_on_level_means_rejects_undefined_mean() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("level", Column::categorical(["a", "a", "b", "c", "c"])),
                ("x", Column::numeric([1.0, 3.0, f64::NAN, 5.0, 7.0])),
                ("y", Column::numeric([2.0, 4.0, 5.0, 6.0, 8.0])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            analyzer.regression_results("y", &["x"], Some("level")),
            Err(AnalysisError::DataValidation { column, missing: 1 }) if column == "x"
        ));
    }

    #[test]
    fn test_regression_rank_deficiency_is_propagated() {
        let analyzer = Analyzer::new(
            Dataset::new([
                ("x1", Column::numeric([1.0, 2.0, 3.0, 4.0])),
                ("x2", Column::numeric([2.0, 4.0, 6.0, 8.0])),
                ("y", Column::numeric([1.0, 3.0, 2.0, 5.0])),
            ])
            .unwrap(),
        );
        assert!(matches!(
            analyzer.regression_results("y", &["x1", "x2"], None),
            Err(AnalysisError::Fit(OlsError::RankDeficiency { columns: 3, .. }))
        ));
    }

    #[test]
    fn test_regression_errors() {
        let analyzer = treatment_data();
        assert!(matches!(
            analyzer.regression_results("nope", &["x"], None),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.regression_results("y", &["nope"], None),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.regression_results("y", &["x"], Some("nope")),
            Err(AnalysisError::InvalidColumn { .. })
        ));
        assert!(matches!(
            analyzer.regression_results("y", &["g"], None),
            Err(AnalysisError::NonNumericColumn { .. })
        ));
        assert!(matches!(
            analyzer.regression_results("y", &[], None),
            Err(AnalysisError::EmptyColumnList { argument: "covariates" })
        ));
    }

    #[test]
    fn test_operations_are_repeatable() {
        let analyzer = treatment_data();
        let before = analyzer.data().clone();

        let first = analyzer.create_diff_table("y", &["g"], Some("level")).unwrap();
        let second = analyzer.create_diff_table("y", &["g"], Some("level")).unwrap();
        assert_eq!(first.table, second.table);

        analyzer.regression_results("y", &["x"], None).unwrap();
        assert_eq!(analyzer.data(), &before);
    }

    fn grouped_observations() -> impl Strategy<Value = Vec<(usize, f64)>> {
        prop::collection::vec((0..4_usize, -1e3..1e3f64), 1..40)
    }

    fn analyzer_from(observations: &[(usize, f64)]) -> Analyzer {
        const NAMES: [&str; 4] = ["A", "B", "C", "D"];
        Analyzer::new(
            Dataset::new([
                (
                    "g",
                    Column::categorical(observations.iter().map(|(g, _)| NAMES[*g])),
                ),
                ("y", Column::numeric(observations.iter().map(|(_, y)| *y))),
            ])
            .unwrap(),
        )
    }

    proptest! {
        #[test]
        fn diff_table_is_antisymmetric_with_zero_diagonal(observations in grouped_observations()) {
            let diff = analyzer_from(&observations).create_diff_table("y", &["g"], None).unwrap();
            let table = &diff.table;
            for row in table.rows() {
                let label = format_key(&row.key);
                prop_assert_eq!(table.value(&row.key, &label), Some(0.0));
                for (column, value) in table.columns().iter().zip(&row.values) {
                    let mirrored = table.value(&key(&[column.as_str()]), &label).unwrap();
                    prop_assert_eq!(*value, -mirrored);
                }
            }
        }

        #[test]
        fn summary_has_one_mean_and_std_per_variable(observations in grouped_observations()) {
            prop_assume!(observations.len() >= 2);
            let summary = analyzer_from(&observations)
                .create_summary_stats(&["y"], &[], None)
                .unwrap();
            let table = &summary.table;
            prop_assert_eq!(table.rows().len(), 1);
            prop_assert_eq!(table.columns(), ["y_mean", "y_std"]);
            prop_assert!(table.value(&[], "y_std").unwrap() >= 0.0);
        }
    }
}
