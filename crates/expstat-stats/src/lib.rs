//! Numeric building blocks for the expstat analyses.
//!
//! This crate wraps the ecosystem statistics stack into the two primitives the
//! analyses need:
//!
//! - **Descriptive statistics**: sample mean and standard deviation of a set of values
//! - **Ordinary least squares**: coefficient estimates with standard errors,
//!   t statistics, p-values, confidence intervals, R² and RMSE
//!
//! # Modules
//!
//! - [`descriptive`]: Mean and standard deviation of a dataset, skipping missing values
//! - [`ols`]: Ordinary least squares fitting and inference
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use expstat_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(stats.mean, 2.5);
//! assert!((stats.std_dev - 1.290_994).abs() < 1e-6);
//! ```
//!
//! ## Fitting a regression
//!
//! ```
//! use expstat_stats::ols::{OlsFit, add_constant};
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_column_slice(5, 1, &[1.0, 2.0, 3.0, 4.0, 5.0]);
//! let y = DVector::from_vec(vec![3.0, 5.0, 7.0, 9.0, 11.0]);
//! let fit = OlsFit::fit(&add_constant(&x), &y).unwrap();
//! assert!((fit.coefficients[1].estimate - 2.0).abs() < 1e-9);
//! assert!((fit.r_squared - 1.0).abs() < 1e-9);
//! ```

pub mod descriptive;
pub mod ols;
