use statrs::statistics::Statistics as _;

/// Descriptive statistics summarizing a dataset.
///
/// The standard deviation is the sample standard deviation (`n - 1`
/// denominator), so it is `NaN` for a dataset with a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// The number of non-missing values in the dataset.
    pub count: usize,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The sample standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics, skipping `NaN` values.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values. `NaN` entries are treated as missing.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one non-missing value
    /// * `None` - if the dataset is empty or entirely missing
    ///
    /// # Examples
    ///
    /// ```
    /// # use expstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([2.0, f64::NAN, 4.0]).unwrap();
    /// assert_eq!(stats.count, 2);
    /// assert_eq!(stats.mean, 3.0);
    ///
    /// assert!(DescriptiveStats::new([f64::NAN]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        Self::from_present(&values)
    }

    /// Computes descriptive statistics from values known to contain no `NaN`.
    ///
    /// # Panics
    ///
    /// Panics if `values` contains `NaN`.
    #[must_use]
    pub fn from_present(values: &[f64]) -> Option<Self> {
        assert!(
            values.iter().all(|v| !v.is_nan()),
            "values must not contain NaN"
        );
        if values.is_empty() {
            return None;
        }

        Some(Self {
            count: values.len(),
            mean: values.iter().mean(),
            std_dev: values.iter().std_dev(),
        })
    }
}

/// Arithmetic mean of the non-missing values, `None` when there are none.
///
/// # Examples
///
/// ```
/// # use expstat_stats::descriptive::mean;
/// assert_eq!(mean([10.0, 20.0, f64::NAN]), Some(15.0));
/// assert_eq!(mean([]), None);
/// ```
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    DescriptiveStats::new(values).map(|stats| stats.mean)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_sample_std_dev() {
        let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        // sqrt(5 / 3)
        assert!((stats.std_dev - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_undefined_std_dev() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert!(stats.std_dev.is_nan());
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let stats = DescriptiveStats::new([f64::NAN, 1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    #[should_panic(expected = "values must not contain NaN")]
    fn test_from_present_rejects_nan() {
        let _ = DescriptiveStats::from_present(&[1.0, f64::NAN]);
    }

    proptest! {
        #[test]
        fn std_dev_is_non_negative(values in prop::collection::vec(-1e6..1e6f64, 2..50)) {
            let stats = DescriptiveStats::new(values).unwrap();
            prop_assert!(stats.std_dev >= 0.0);
        }

        #[test]
        fn mean_lies_within_range(values in prop::collection::vec(-1e6..1e6f64, 1..50)) {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = mean(values).unwrap();
            prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);
        }
    }
}
