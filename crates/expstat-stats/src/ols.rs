//! Ordinary least squares fitting
//!
//! [`OlsFit::fit`] solves the normal equations for a design matrix that already
//! carries its intercept column (see [`add_constant`]) and reports the usual
//! inference table for every term:
//!
//! ```text
//! term      estimate  std_err   t      p_value  ci_lower  ci_upper
//! const     2.2       0.938     2.345  0.101    -0.785    5.185
//! x         0.6       0.283     2.121  0.124    -0.300    1.500
//! ```
//!
//! Inference uses the Student-t distribution with `n - p` residual degrees of
//! freedom. When the fit leaves no residual degrees of freedom the inference
//! columns are `NaN`.
//!
//! A design whose SVD rank is below its column count (collinear columns, or
//! fewer rows than columns) is rejected with [`OlsError::RankDeficiency`].
//! Infinite or `NaN` inputs are rejected with [`OlsError::NonFiniteInput`].

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF as _, StudentsT};

/// Confidence level of the reported coefficient intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum OlsError {
    #[display("design matrix is rank deficient (rank {rank} < {columns} columns)")]
    RankDeficiency { rank: usize, columns: usize },
    #[display("design matrix has {rows} rows but the response has {len} values")]
    DimensionMismatch { rows: usize, len: usize },
    #[display("{input} contains {count} non-finite value(s)")]
    NonFiniteInput { input: &'static str, count: usize },
}

/// Estimate and inference for a single term of the fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficient {
    /// Point estimate.
    pub estimate: f64,
    /// Standard error of the estimate.
    pub std_err: f64,
    /// t statistic (`estimate / std_err`).
    pub t: f64,
    /// Two-sided p-value of the t statistic.
    pub p_value: f64,
    /// Lower bound of the confidence interval.
    pub ci_lower: f64,
    /// Upper bound of the confidence interval.
    pub ci_upper: f64,
}

/// Result of an ordinary least squares fit.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// One entry per design matrix column, in column order.
    pub coefficients: Vec<Coefficient>,
    /// Coefficient of determination (`1 - SSR / TSS`); `NaN` for a constant response.
    pub r_squared: f64,
    /// Root-mean-squared in-sample prediction error.
    pub rmse: f64,
    /// Number of observations.
    pub n_obs: usize,
    /// Residual degrees of freedom (`n - p`).
    pub df_resid: usize,
    params: DVector<f64>,
}

/// Prepends an intercept column of ones to the design matrix.
///
/// # Examples
///
/// ```
/// # use expstat_stats::ols::add_constant;
/// # use nalgebra::DMatrix;
/// let x = DMatrix::from_column_slice(2, 1, &[3.0, 4.0]);
/// let design = add_constant(&x);
/// assert_eq!(design.column(0).as_slice(), &[1.0, 1.0]);
/// assert_eq!(design.column(1).as_slice(), &[3.0, 4.0]);
/// ```
#[must_use]
pub fn add_constant(x: &DMatrix<f64>) -> DMatrix<f64> {
    x.clone().insert_column(0, 1.0)
}

impl OlsFit {
    /// Fits `y = X β + ε` by ordinary least squares.
    ///
    /// `x` is the full design matrix; it must already include an intercept
    /// column if one is wanted.
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Self, OlsError> {
        let (n_obs, columns) = x.shape();
        if n_obs != y.len() {
            return Err(OlsError::DimensionMismatch {
                rows: n_obs,
                len: y.len(),
            });
        }
        check_finite("design matrix", x.iter())?;
        check_finite("response", y.iter())?;
        check_rank(x)?;
        tracing::debug!(n_obs, columns, "fitting OLS");

        let xtx_inv = x
            .tr_mul(x)
            .try_inverse()
            .ok_or(OlsError::RankDeficiency {
                rank: columns.saturating_sub(1),
                columns,
            })?;
        let params = &xtx_inv * x.tr_mul(y);

        let fitted = x * &params;
        let residuals = y - &fitted;
        let ssr = residuals.norm_squared();
        let y_mean = y.mean();
        let tss = y.iter().map(|v| (v - y_mean).powi(2)).sum::<f64>();
        let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
        let rmse = (ssr / n_obs as f64).sqrt();

        let df_resid = n_obs - columns;
        let t_dist = (df_resid > 0)
            .then(|| StudentsT::new(0.0, 1.0, df_resid as f64).ok())
            .flatten();
        let sigma2 = ssr / df_resid as f64;

        let coefficients = params
            .iter()
            .enumerate()
            .map(|(i, &estimate)| match &t_dist {
                Some(dist) => {
                    let std_err = (sigma2 * xtx_inv[(i, i)]).sqrt();
                    let t = estimate / std_err;
                    let margin = dist.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0) * std_err;
                    Coefficient {
                        estimate,
                        std_err,
                        t,
                        p_value: 2.0 * dist.sf(t.abs()),
                        ci_lower: estimate - margin,
                        ci_upper: estimate + margin,
                    }
                }
                None => Coefficient {
                    estimate,
                    std_err: f64::NAN,
                    t: f64::NAN,
                    p_value: f64::NAN,
                    ci_lower: f64::NAN,
                    ci_upper: f64::NAN,
                },
            })
            .collect();

        Ok(Self {
            coefficients,
            r_squared,
            rmse,
            n_obs,
            df_resid,
            params,
        })
    }

    /// Predicts the response for a design matrix laid out like the fitted one.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, OlsError> {
        if x.ncols() != self.params.len() {
            return Err(OlsError::DimensionMismatch {
                rows: x.ncols(),
                len: self.params.len(),
            });
        }
        Ok(x * &self.params)
    }
}

fn check_finite<'a, I>(input: &'static str, values: I) -> Result<(), OlsError>
where
    I: IntoIterator<Item = &'a f64>,
{
    let count = values.into_iter().filter(|v| !v.is_finite()).count();
    if count > 0 {
        return Err(OlsError::NonFiniteInput { input, count });
    }
    Ok(())
}

#[expect(clippy::cast_precision_loss)]
fn check_rank(x: &DMatrix<f64>) -> Result<(), OlsError> {
    let (rows, columns) = x.shape();
    if rows == 0 || columns == 0 {
        return Err(OlsError::RankDeficiency { rank: 0, columns });
    }

    let svd = x.clone().svd(false, false);
    let max_sv = svd.singular_values.max();
    let tolerance = max_sv * rows.max(columns) as f64 * f64::EPSILON;
    let rank = svd.rank(tolerance);
    if rank < columns {
        return Err(OlsError::RankDeficiency { rank, columns });
    }
    Ok(())
}
