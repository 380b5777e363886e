//! Group comparisons and regression summaries over tabular data
//!
//! This crate turns an in-memory table of observations into the three result
//! tables analysts reach for when comparing treatment and control groups.
//!
//! # Overview
//!
//! 1. **Build a Dataset** ([`dataset::Dataset`]): named numeric/categorical columns,
//!    constructed in code or deserialized from column-oriented JSON
//! 2. **Wrap it in an Analyzer** ([`analyzer::Analyzer`])
//! 3. **Run an analysis**:
//!    - [`analyzer::Analyzer::create_summary_stats`]: `{variable}_mean` / `{variable}_std`,
//!      overall or per level value
//!    - [`analyzer::Analyzer::create_diff_table`]: pairwise differences of group means
//!    - [`analyzer::Analyzer::regression_results`]: OLS coefficients with inference,
//!      plus `r_squared` and `rmse`
//! 4. **Consume the [`table::ResultTable`]**: print it, serialize it, or look up cells
//!
//! Grouping is done by the three steps in [`group`] (group rows, aggregate,
//! pivot), which are usable on their own.
//!
//! # Examples
//!
//! ```
//! use expstat_analysis::{
//!     analyzer::Analyzer,
//!     dataset::{Column, Dataset, GroupKey},
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let data = Dataset::new([
//!     ("arm", Column::categorical(["control", "control", "treated", "treated"])),
//!     ("dose", Column::numeric([0.0, 0.0, 1.0, 2.0])),
//!     ("response", Column::numeric([10.0, 12.0, 15.0, 19.0])),
//! ])?;
//! let analyzer = Analyzer::new(data);
//!
//! let summary = analyzer.create_summary_stats(&["response"], &[], Some("arm"))?;
//! println!("{}", summary.table);
//!
//! let diff = analyzer.create_diff_table("response", &["arm"], None)?;
//! let effect = diff.table.value(&[GroupKey::from("treated")], "control");
//! assert_eq!(effect, Some(6.0));
//!
//! let regression = analyzer.regression_results("response", &["dose"], None)?;
//! assert!(regression.r_squared > 0.9);
//! # Ok(())
//! # }
//! ```

use expstat_stats::ols::OlsError;

pub mod analyzer;
pub mod dataset;
pub mod group;
pub mod table;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("column '{column}' not found in dataset")]
    InvalidColumn { column: String },
    #[display("column '{column}' is not numeric")]
    NonNumericColumn { column: String },
    #[display("at least one column must be given for {argument}")]
    EmptyColumnList { argument: &'static str },
    #[display("column '{column}' has {missing} missing or infinite value(s)")]
    DataValidation { column: String, missing: usize },
    #[display("no observations of '{outcome}' in group ({group})")]
    EmptyGroup { group: String, outcome: String },
    #[display("regression fit failed: {_0}")]
    Fit(#[error(source)] OlsError),
}

impl From<OlsError> for AnalysisError {
    fn from(err: OlsError) -> Self {
        AnalysisError::Fit(err)
    }
}
