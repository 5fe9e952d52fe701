//! Statistical hypothesis testing
//!
//! Closed-form test statistics and p-value computations (z, t, F,
//! chi-square, proportion tests) operating on numeric summaries, plus
//! `*_for_frame` adapters that derive those summaries from a grouped
//! [`Frame`](crate::frame::Frame).


use std::str::FromStr;

use statrs::distribution::{ChiSquared, FisherSnedecor, Normal, StudentsT};

use crate::errors::{StatsError, StatsResult};

/// Tail direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    Right,
    Left,
    Two,
}

impl FromStr for Tail {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Tail> {
        match s {
            "right" => Ok(Tail::Right),
            "left" => Ok(Tail::Left),
            "two" => Ok(Tail::Two),
            _ => Err(StatsError::InvalidArgument(format!(
                "tail must be 'right', 'left', or 'two', got '{s}'"
            ))),
        }
    }
}

/// Parse a tail for the z-test family, which only admits one-sided tests.
pub(crate) fn one_sided_tail(s: &str) -> StatsResult<Tail> {
    match Tail::from_str(s)? {
        Tail::Two => Err(StatsError::InvalidArgument(
            "tail must be 'right' or 'left'".to_string(),
        )),
        tail => Ok(tail),
    }
}

pub(crate) fn std_normal() -> StatsResult<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))
}

pub(crate) fn students_t(df: f64) -> StatsResult<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|_| {
        StatsError::Distribution(format!("t distribution undefined for df = {df}"))
    })
}

pub(crate) fn fisher(df1: f64, df2: f64) -> StatsResult<FisherSnedecor> {
    FisherSnedecor::new(df1, df2).map_err(|_| {
        StatsError::Distribution(format!("F distribution undefined for df = ({df1}, {df2})"))
    })
}

pub(crate) fn chi_squared(df: f64) -> StatsResult<ChiSquared> {
    ChiSquared::new(df).map_err(|_| {
        StatsError::Distribution(format!("chi-square distribution undefined for df = {df}"))
    })
}

/// Sample mean. NaN on an empty slice, so degenerate groups propagate as
/// NaN statistics rather than panics.
pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n − 1 divisor). NaN when n < 2.
pub(crate) fn sample_std(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_parse() {
        assert_eq!("right".parse::<Tail>().unwrap(), Tail::Right);
        assert_eq!("left".parse::<Tail>().unwrap(), Tail::Left);
        assert_eq!("two".parse::<Tail>().unwrap(), Tail::Two);
    }

    #[test]
    fn test_tail_parse_rejects_unknown() {
        let err = "up".parse::<Tail>().unwrap_err();
        assert!(err.to_string().contains("'right', 'left', or 'two'"));
    }

    #[test]
    fn test_one_sided_rejects_two() {
        assert!(one_sided_tail("two").is_err());
        assert!(one_sided_tail("left").is_ok());
    }

    #[test]
    fn test_sample_std() {
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_mean_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(sample_std(&[1.0]).is_nan());
    }
}
