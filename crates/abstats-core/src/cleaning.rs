//! Dataset cleaning
//!
//! Prepares a raw frame for analysis. Every decision is an explicit field
//! of [`CleaningOptions`] — nothing is prompted for. [`clean`] applies the
//! steps in a fixed order: type coercion, outlier policy, duplicate
//! removal, row drops for missing values, then fills.

use chrono::NaiveDate;

use crate::errors::{StatsError, StatsResult};
use crate::frame::{ColumnType, Frame, Value};

/// How to replace missing values in one column.
#[derive(Debug, Clone)]
pub enum FillStrategy {
    /// Column mean (numeric columns only).
    Mean,
    /// Column median (numeric columns only).
    Median,
    /// Most frequent non-null value; first encountered wins ties.
    Mode,
    /// Carry the last non-null value forward.
    Forward,
    /// Carry the next non-null value backward.
    Backward,
    /// A fixed replacement value.
    Constant(Value),
}

/// A fill instruction for one column.
#[derive(Debug, Clone)]
pub struct FillRule {
    pub column: String,
    pub strategy: FillStrategy,
    /// Cap on the number of cells filled. Counted from the top of the
    /// frame (from the bottom for [`FillStrategy::Backward`]).
    pub limit: Option<usize>,
}

/// What to do with numeric outliers.
#[derive(Debug, Clone, Default)]
pub enum OutlierPolicy {
    #[default]
    Keep,
    /// Drop rows falling outside `[Q1 - m*IQR, Q3 + m*IQR]` in any of the
    /// listed numeric columns. The customary fence multiplier is 1.5.
    RemoveIqr { multiplier: f64, columns: Vec<String> },
}

/// All cleaning decisions, supplied programmatically.
#[derive(Debug, Clone, Default)]
pub struct CleaningOptions {
    /// Column type conversions, applied first.
    pub coerce: Vec<(String, ColumnType)>,
    pub outliers: OutlierPolicy,
    /// Columns identifying a duplicate row; the first occurrence is kept.
    /// An empty subset compares whole rows. `None` disables the step.
    pub deduplicate: Option<Vec<String>>,
    /// Rows with a missing value in any of these columns are dropped.
    pub drop_missing: Vec<String>,
    pub fill: Vec<FillRule>,
}

/// Run the full cleaning pipeline over a frame.
pub fn clean(frame: &Frame, options: &CleaningOptions) -> StatsResult<Frame> {
    let mut out = frame.clone();

    for (column, target) in &options.coerce {
        out = coerce_column(&out, column, *target)?;
    }

    if let OutlierPolicy::RemoveIqr {
        multiplier,
        columns,
    } = &options.outliers
    {
        for column in columns {
            out = remove_outliers_iqr(&out, column, *multiplier)?;
        }
    }

    if let Some(subset) = &options.deduplicate {
        out = remove_duplicates(&out, subset)?;
    }

    if !options.drop_missing.is_empty() {
        out = drop_missing(&out, &options.drop_missing)?;
    }

    for rule in &options.fill {
        out = fill_missing(&out, rule)?;
    }

    Ok(out)
}

fn convert(value: &Value, target: ColumnType) -> StatsResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let parse_failure = |target: &'static str| StatsError::ValueParse {
        value: format!("{value:?}"),
        target,
    };
    Ok(match target {
        ColumnType::Float => match value {
            Value::Float(x) => Value::Float(*x),
            Value::Bool(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => Value::Float(
                s.trim().parse::<f64>().map_err(|_| parse_failure("float"))?,
            ),
            _ => return Err(parse_failure("float")),
        },
        ColumnType::Str => match value {
            Value::Str(s) => Value::Str(s.clone()),
            Value::Float(x) => Value::Str(x.to_string()),
            Value::Bool(b) => Value::Str(b.to_string()),
            Value::Date(d) => Value::Str(d.to_string()),
            Value::Null => unreachable!("null handled above"),
        },
        ColumnType::Bool => match value {
            Value::Bool(b) => Value::Bool(*b),
            Value::Float(x) if *x == 1.0 => Value::Bool(true),
            Value::Float(x) if *x == 0.0 => Value::Bool(false),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => return Err(parse_failure("bool")),
            },
            _ => return Err(parse_failure("bool")),
        },
        ColumnType::Date => match value {
            Value::Date(d) => Value::Date(*d),
            Value::Str(s) => Value::Date(
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_err(|_| parse_failure("date"))?,
            ),
            _ => return Err(parse_failure("date")),
        },
    })
}

/// Convert one column to a target type. Null cells pass through; an
/// unconvertible non-null cell is an error.
pub fn coerce_column(frame: &Frame, column: &str, target: ColumnType) -> StatsResult<Frame> {
    let col = frame.column_index(column)?;
    let mut rows = frame.rows().to_vec();
    for row in &mut rows {
        row[col] = convert(&row[col], target)?;
    }
    Ok(frame.with_rows(rows))
}

/// Linear-interpolation quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Drop rows whose value in `column` falls outside the IQR fences.
/// Rows with a missing value in the column are kept.
pub fn remove_outliers_iqr(frame: &Frame, column: &str, multiplier: f64) -> StatsResult<Frame> {
    let mut values = frame.numeric(column)?;
    if values.is_empty() {
        return Ok(frame.clone());
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let threshold = (q3 - q1) * multiplier;
    let lower = q1 - threshold;
    let upper = q3 + threshold;

    let col = frame.column_index(column)?;
    let mask: Vec<bool> = frame
        .rows()
        .iter()
        .map(|row| match row[col] {
            Value::Float(x) => x >= lower && x <= upper,
            _ => true,
        })
        .collect();
    frame.retain_rows(&mask)
}

/// Drop duplicate rows, keeping the first occurrence. `subset` names the
/// columns compared; an empty subset compares whole rows.
pub fn remove_duplicates(frame: &Frame, subset: &[String]) -> StatsResult<Frame> {
    let cols: Vec<usize> = if subset.is_empty() {
        (0..frame.names().len()).collect()
    } else {
        subset
            .iter()
            .map(|name| frame.column_index(name))
            .collect::<StatsResult<_>>()?
    };

    let mut seen: Vec<Vec<&Value>> = Vec::new();
    let mask: Vec<bool> = frame
        .rows()
        .iter()
        .map(|row| {
            let key: Vec<&Value> = cols.iter().map(|c| &row[*c]).collect();
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        })
        .collect();
    frame.retain_rows(&mask)
}

/// Drop rows with a missing value in any of the listed columns.
pub fn drop_missing(frame: &Frame, columns: &[String]) -> StatsResult<Frame> {
    let cols: Vec<usize> = columns
        .iter()
        .map(|name| frame.column_index(name))
        .collect::<StatsResult<_>>()?;
    let mask: Vec<bool> = frame
        .rows()
        .iter()
        .map(|row| cols.iter().all(|c| !row[*c].is_null()))
        .collect();
    frame.retain_rows(&mask)
}

fn mode_value(frame: &Frame, column: &str) -> StatsResult<Option<Value>> {
    let mut counts: Vec<(Value, usize)> = Vec::new();
    for value in frame.column(column)? {
        if value.is_null() {
            continue;
        }
        match counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, c)) => *c += 1,
            None => counts.push((value.clone(), 1)),
        }
    }
    Ok(counts
        .into_iter()
        .max_by_key(|(_, c)| *c)
        .map(|(v, _)| v))
}

fn median(sorted: &[f64]) -> f64 {
    quantile(sorted, 0.5)
}

/// Replace missing values in one column according to a fill rule.
pub fn fill_missing(frame: &Frame, rule: &FillRule) -> StatsResult<Frame> {
    let col = frame.column_index(&rule.column)?;
    let limit = rule.limit.unwrap_or(usize::MAX);
    let mut rows = frame.rows().to_vec();

    match &rule.strategy {
        FillStrategy::Mean | FillStrategy::Median => {
            let mut values = frame.numeric(&rule.column)?;
            if values.is_empty() {
                return Ok(frame.clone());
            }
            values.sort_by(|a, b| a.total_cmp(b));
            let fill = match rule.strategy {
                FillStrategy::Mean => values.iter().sum::<f64>() / values.len() as f64,
                _ => median(&values),
            };
            fill_constant(&mut rows, col, &Value::Float(fill), limit);
        }
        FillStrategy::Mode => {
            if let Some(fill) = mode_value(frame, &rule.column)? {
                fill_constant(&mut rows, col, &fill, limit);
            }
        }
        FillStrategy::Constant(value) => fill_constant(&mut rows, col, value, limit),
        FillStrategy::Forward => {
            let mut carry: Option<Value> = None;
            let mut filled = 0;
            for row in &mut rows {
                if row[col].is_null() {
                    if let Some(v) = &carry {
                        if filled < limit {
                            row[col] = v.clone();
                            filled += 1;
                        }
                    }
                } else {
                    carry = Some(row[col].clone());
                }
            }
        }
        FillStrategy::Backward => {
            let mut carry: Option<Value> = None;
            let mut filled = 0;
            for row in rows.iter_mut().rev() {
                if row[col].is_null() {
                    if let Some(v) = &carry {
                        if filled < limit {
                            row[col] = v.clone();
                            filled += 1;
                        }
                    }
                } else {
                    carry = Some(row[col].clone());
                }
            }
        }
    }

    Ok(frame.with_rows(rows))
}

fn fill_constant(rows: &mut [Vec<Value>], col: usize, fill: &Value, limit: usize) {
    let mut filled = 0;
    for row in rows {
        if row[col].is_null() && filled < limit {
            row[col] = fill.clone();
            filled += 1;
        }
    }
}
