//! Subscription metrics
//!
//! Churn rate, average revenue per user (ARPU), and customer lifetime
//! value (LTV) over a cleaned subscription frame. All three operate on
//! the same column vocabulary: a user identifier, a payment date, a
//! plan duration such as `"1 months"`, and a revenue amount.

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};

use crate::errors::{StatsError, StatsResult};
use crate::frame::{Frame, Value};

/// An analysis window, parsed from `"whole"`, `"N days"`, `"N months"`,
/// or `"N years"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    Whole,
    Days(u32),
    Months(u32),
    Years(u32),
}

fn invalid_timespan(s: &str) -> StatsError {
    StatsError::InvalidArgument(format!(
        "invalid timespan '{s}': expected 'whole', 'N days', 'N months', or 'N years'"
    ))
}

impl FromStr for Timespan {
    type Err = StatsError;

    fn from_str(s: &str) -> StatsResult<Timespan> {
        if s.trim() == "whole" {
            return Ok(Timespan::Whole);
        }
        let mut parts = s.split_whitespace();
        let (Some(count), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid_timespan(s));
        };
        let count: u32 = count.parse().map_err(|_| invalid_timespan(s))?;
        match unit {
            "days" => Ok(Timespan::Days(count)),
            "months" => Ok(Timespan::Months(count)),
            "years" => Ok(Timespan::Years(count)),
            _ => Err(invalid_timespan(s)),
        }
    }
}

impl Timespan {
    fn add_to(self, date: NaiveDate) -> StatsResult<NaiveDate> {
        match self {
            Timespan::Whole => Some(date),
            Timespan::Days(n) => date.checked_add_days(Days::new(u64::from(n))),
            Timespan::Months(n) => date.checked_add_months(Months::new(n)),
            Timespan::Years(n) => date.checked_add_months(Months::new(12 * n)),
        }
        .ok_or_else(|| StatsError::DateRange(format!("{date} plus {self:?} overflows")))
    }

    fn subtract_from(self, date: NaiveDate) -> StatsResult<NaiveDate> {
        match self {
            Timespan::Whole => Some(date),
            Timespan::Days(n) => date.checked_sub_days(Days::new(u64::from(n))),
            Timespan::Months(n) => date.checked_sub_months(Months::new(n)),
            Timespan::Years(n) => date.checked_sub_months(Months::new(12 * n)),
        }
        .ok_or_else(|| StatsError::DateRange(format!("{date} minus {self:?} overflows")))
    }
}

/// One subscription row: who paid, when, and when coverage ends.
struct Subscription<'a> {
    user: &'a Value,
    start: NaiveDate,
    last_day: NaiveDate,
}

/// Months covered by a plan-duration cell: the leading integer of a
/// string such as `"3 months"`.
fn duration_months(value: &Value) -> StatsResult<u32> {
    let failure = || StatsError::ValueParse {
        value: format!("{value:?}"),
        target: "plan duration",
    };
    let text = value.as_str().ok_or_else(failure)?;
    text.split_whitespace()
        .next()
        .ok_or_else(failure)?
        .parse()
        .map_err(|_| failure())
}

fn subscriptions<'a>(
    frame: &'a Frame,
    user_id: &str,
    date_column: &str,
    plan_duration: &str,
) -> StatsResult<Vec<Subscription<'a>>> {
    let user_col = frame.column_index(user_id)?;
    let date_col = frame.column_index(date_column)?;
    let duration_col = frame.column_index(plan_duration)?;

    let mut subs = Vec::with_capacity(frame.len());
    for row in frame.rows() {
        let (user, date, duration) = (&row[user_col], &row[date_col], &row[duration_col]);
        if user.is_null() || date.is_null() || duration.is_null() {
            continue;
        }
        let start = date.as_date().ok_or_else(|| StatsError::ColumnType {
            column: date_column.to_string(),
            expected: "date",
        })?;
        let months = duration_months(duration)?;
        let last_day = start
            .checked_add_months(Months::new(months))
            .ok_or_else(|| StatsError::DateRange(format!("{start} plus {months} months overflows")))?;
        subs.push(Subscription {
            user,
            start,
            last_day,
        });
    }
    Ok(subs)
}

fn distinct_users<'a, I>(users: I) -> Vec<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut seen: Vec<&Value> = Vec::new();
    for user in users {
        if !seen.contains(&user) {
            seen.push(user);
        }
    }
    seen
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn churn_rate_one_period(subs: &[Subscription<'_>]) -> StatsResult<f64> {
    let total = distinct_users(subs.iter().map(|s| s.user)).len();
    let latest = subs
        .iter()
        .map(|s| s.start)
        .max()
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| StatsError::DateRange("latest subscription date underflows".into()))?;

    let active = distinct_users(
        subs.iter()
            .filter(|s| s.last_day > latest)
            .map(|s| s.user),
    )
    .len();
    let churned = total - active;
    Ok(round2(churned as f64 / total as f64 * 100.0))
}

fn churn_rate_two_periods(
    subs: &[Subscription<'_>],
    date_split: NaiveDate,
    timespan: Timespan,
) -> StatsResult<f64> {
    let end_date = timespan.add_to(date_split)?;

    let start_users = distinct_users(
        subs.iter()
            .filter(|s| s.start < date_split && s.last_day >= date_split)
            .map(|s| s.user),
    );
    if start_users.is_empty() {
        return Ok(0.0);
    }
    let retained = distinct_users(
        subs.iter()
            .filter(|s| {
                start_users.contains(&s.user) && s.start < end_date && s.last_day >= end_date
            })
            .map(|s| s.user),
    );

    let churned = start_users.len() - retained.len();
    Ok(round2(churned as f64 / start_users.len() as f64 * 100.0))
}

/// Percentage of subscribers who let their plan lapse.
///
/// Each row's coverage ends `plan_duration` months after its payment
/// date. With [`Timespan::Whole`], a user counts as churned unless some
/// subscription outlives the day before the latest payment date in the
/// frame. With a bounded timespan, the cohort is the users active at
/// `date_split` and churn is measured at `date_split + timespan`; an
/// empty cohort yields 0.0.
///
/// # Arguments
/// * `user_id` - Column of user identifiers
/// * `date_column` - Column of payment dates
/// * `plan_duration` - Column of plan durations such as `"1 months"`
/// * `date_split` - Cohort date; required unless the timespan is `Whole`
///
/// # Returns
/// Churn rate as a percentage, rounded to two decimals.
pub fn churn_rate(
    frame: &Frame,
    user_id: &str,
    date_column: &str,
    plan_duration: &str,
    timespan: Timespan,
    date_split: Option<NaiveDate>,
) -> StatsResult<f64> {
    let subs = subscriptions(frame, user_id, date_column, plan_duration)?;
    if subs.is_empty() {
        return Err(StatsError::InsufficientData(
            "no subscription rows to compute a churn rate from".into(),
        ));
    }
    match timespan {
        Timespan::Whole => churn_rate_one_period(&subs),
        bounded => {
            let split = date_split.ok_or_else(|| {
                StatsError::InvalidArgument(
                    "date_split is required for a windowed churn rate".into(),
                )
            })?;
            churn_rate_two_periods(&subs, split, bounded)
        }
    }
}

/// Average revenue per user: total revenue divided by the number of
/// distinct users.
///
/// With a `date_column` and a bounded timespan, only rows whose date
/// falls within `[date_split - timespan, date_split]` contribute.
/// Without a date column, or with [`Timespan::Whole`], the whole frame
/// is used.
pub fn arpu(
    frame: &Frame,
    revenue: &str,
    user_id: &str,
    date_column: Option<&str>,
    timespan: Timespan,
    date_split: Option<NaiveDate>,
) -> StatsResult<f64> {
    let filtered = match (date_column, timespan) {
        (Some(dc), bounded) if bounded != Timespan::Whole => {
            let split = date_split.ok_or_else(|| {
                StatsError::InvalidArgument(
                    "date_split is required for a windowed ARPU".into(),
                )
            })?;
            let window_start = bounded.subtract_from(split)?;
            let col = frame.column_index(dc)?;
            let mask: Vec<bool> = frame
                .rows()
                .iter()
                .map(|row| {
                    row[col]
                        .as_date()
                        .is_some_and(|d| d >= window_start && d <= split)
                })
                .collect();
            frame.retain_rows(&mask)?
        }
        _ => frame.clone(),
    };

    let total: f64 = filtered.numeric(revenue)?.iter().sum();
    let users = filtered.unique(user_id)?.len();
    if users == 0 {
        return Err(StatsError::InsufficientData(
            "no users in the selected window".into(),
        ));
    }
    Ok(total / users as f64)
}

/// Customer lifetime value: ARPU divided by the churn rate (as a
/// fraction). A zero churn rate yields infinity.
pub fn ltv(
    frame: &Frame,
    revenue: &str,
    plan_duration: &str,
    user_id: &str,
    date_column: &str,
    timespan: Timespan,
    date_split: Option<NaiveDate>,
) -> StatsResult<f64> {
    let churn = churn_rate(frame, user_id, date_column, plan_duration, timespan, date_split)? * 0.01;
    let average_revenue = arpu(
        frame,
        revenue,
        user_id,
        Some(date_column),
        timespan,
        date_split,
    )?;
    Ok(average_revenue / churn)
}
