//! Jarque-Bera test for normality
//!
//! Checks whether sample skewness and kurtosis are consistent with a
//! normal distribution. Used as the pre-check before the z-test family.

use crate::errors::{StatsError, StatsResult};

/// Result of the Jarque-Bera test
#[derive(Debug, Clone)]
pub struct JarqueBeraResult {
    /// JB test statistic
    pub statistic: f64,
    /// p-value for the test
    pub p_value: f64,
    /// Sample skewness
    pub skewness: f64,
    /// Sample kurtosis (excess)
    pub kurtosis: f64,
    /// Number of observations
    pub n: usize,
}

/// Compute the Jarque-Bera normality statistic for a sample.
///
/// # Arguments
/// * `data` - Sample values; NaN entries are skipped
///
/// # Returns
/// JarqueBeraResult with test statistic, p-value, skewness, and kurtosis
pub fn jarque_bera(data: &[f64]) -> StatsResult<JarqueBeraResult> {
    let clean: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    let n = clean.len();

    if n < 3 {
        return Err(StatsError::InsufficientData(
            "Jarque-Bera test requires at least 3 observations".into(),
        ));
    }

    let mean: f64 = clean.iter().sum::<f64>() / n as f64;

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &x in &clean {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n as f64;
    m3 /= n as f64;
    m4 /= n as f64;

    if m2 <= 0.0 {
        return Err(StatsError::InvalidArgument(
            "data has zero variance".into(),
        ));
    }

    let std_dev = m2.sqrt();
    let skewness = m3 / (std_dev * std_dev * std_dev);
    let kurtosis = m4 / (m2 * m2) - 3.0;

    // JB = n/6 * (S^2 + K^2/4)
    let statistic = (n as f64 / 6.0) * (skewness * skewness + kurtosis * kurtosis / 4.0);

    // Upper tail of chi-squared(2): P(X > x) = exp(-x/2).
    let p_value = (-statistic / 2.0).exp();

    Ok(JarqueBeraResult {
        statistic,
        p_value,
        skewness,
        kurtosis,
        n,
    })
}
