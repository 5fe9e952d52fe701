//! Tabular dataset
//!
//! A `Frame` is a small row-oriented table with named, dynamically typed
//! columns. It provides exactly the operations the statistical adapters
//! need: equality/membership filtering, distinct values, and numeric
//! extraction that skips missing cells.

use chrono::NaiveDate;

use crate::errors::{StatsError, StatsResult};

/// A single cell value.
///
/// `Str` covers both categorical and free-text columns; `Null` marks a
/// missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Str(String),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Target type for column coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float,
    Str,
    Bool,
    Date,
}

/// A row-oriented table with named columns.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Create an empty frame with the given column names.
    pub fn new<S: Into<String>>(names: Vec<S>) -> Frame {
        Frame {
            names: names.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Append a row; its arity must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> StatsResult<()> {
        if row.len() != self.names.len() {
            return Err(StatsError::DimensionMismatch(format!(
                "row has {} values, frame has {} columns",
                row.len(),
                self.names.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    fn index(&self, name: &str) -> StatsResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    /// Cell at (row, column).
    pub fn value(&self, row: usize, column: &str) -> StatsResult<&Value> {
        let col = self.index(column)?;
        self.rows
            .get(row)
            .map(|r| &r[col])
            .ok_or_else(|| StatsError::InvalidArgument(format!("row {row} out of bounds")))
    }

    /// All cells of a column, in row order.
    pub fn column(&self, name: &str) -> StatsResult<Vec<&Value>> {
        let col = self.index(name)?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// A column as `f64` values. Null cells and NaN are skipped; a non-null,
    /// non-numeric cell is an error.
    pub fn numeric(&self, name: &str) -> StatsResult<Vec<f64>> {
        let col = self.index(name)?;
        let mut out = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match &row[col] {
                Value::Float(x) => {
                    if !x.is_nan() {
                        out.push(*x);
                    }
                }
                Value::Null => {}
                _ => {
                    return Err(StatsError::ColumnType {
                        column: name.to_string(),
                        expected: "numeric",
                    })
                }
            }
        }
        Ok(out)
    }

    /// Rows where `column == value`.
    pub fn filter_eq(&self, column: &str, value: &Value) -> StatsResult<Frame> {
        let col = self.index(column)?;
        Ok(self.retain(|row| &row[col] == value))
    }

    /// Rows where the cell in `column` is one of `values`.
    pub fn filter_isin(&self, column: &str, values: &[Value]) -> StatsResult<Frame> {
        let col = self.index(column)?;
        Ok(self.retain(|row| values.contains(&row[col])))
    }

    /// Rows satisfying every `(column, value)` equality at once.
    pub fn filter_all(&self, conditions: &[(&str, &Value)]) -> StatsResult<Frame> {
        let mut cols = Vec::with_capacity(conditions.len());
        for (name, value) in conditions {
            cols.push((self.index(name)?, *value));
        }
        Ok(self.retain(|row| cols.iter().all(|(c, v)| &row[*c] == *v)))
    }

    /// Rows selected by a boolean mask (one entry per row).
    pub fn retain_rows(&self, mask: &[bool]) -> StatsResult<Frame> {
        if mask.len() != self.rows.len() {
            return Err(StatsError::DimensionMismatch(format!(
                "mask has {} entries, frame has {} rows",
                mask.len(),
                self.rows.len()
            )));
        }
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Ok(Frame {
            names: self.names.clone(),
            rows,
        })
    }

    fn retain<F: Fn(&[Value]) -> bool>(&self, pred: F) -> Frame {
        Frame {
            names: self.names.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| pred(row))
                .cloned()
                .collect(),
        }
    }

    /// Distinct non-null values of a column, in order of first appearance.
    pub fn unique(&self, column: &str) -> StatsResult<Vec<Value>> {
        let col = self.index(column)?;
        let mut seen: Vec<Value> = Vec::new();
        for row in &self.rows {
            let v = &row[col];
            if !v.is_null() && !seen.contains(v) {
                seen.push(v.clone());
            }
        }
        Ok(seen)
    }

    /// Number of rows where `column == value`.
    pub fn count_eq(&self, column: &str, value: &Value) -> StatsResult<usize> {
        let col = self.index(column)?;
        Ok(self.rows.iter().filter(|row| &row[col] == value).count())
    }

    pub(crate) fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub(crate) fn column_index(&self, name: &str) -> StatsResult<usize> {
        self.index(name)
    }

    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Frame {
        Frame {
            names: self.names.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let mut f = Frame::new(vec!["plan", "revenue"]);
        f.push_row(vec!["Basic".into(), 10.0.into()]).unwrap();
        f.push_row(vec!["Premium".into(), 25.0.into()]).unwrap();
        f.push_row(vec!["Basic".into(), 12.0.into()]).unwrap();
        f.push_row(vec!["Standard".into(), Value::Null]).unwrap();
        f
    }

    #[test]
    fn test_filter_eq() {
        let f = sample();
        let basic = f.filter_eq("plan", &"Basic".into()).unwrap();
        assert_eq!(basic.len(), 2);
        assert_eq!(basic.numeric("revenue").unwrap(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_numeric_skips_null() {
        let f = sample();
        assert_eq!(f.numeric("revenue").unwrap().len(), 3);
    }

    #[test]
    fn test_numeric_rejects_strings() {
        let f = sample();
        assert!(matches!(
            f.numeric("plan"),
            Err(StatsError::ColumnType { .. })
        ));
    }

    #[test]
    fn test_unique_order() {
        let f = sample();
        let plans = f.unique("plan").unwrap();
        assert_eq!(
            plans,
            vec!["Basic".into(), "Premium".into(), "Standard".into()]
        );
    }

    #[test]
    fn test_unknown_column() {
        let f = sample();
        assert!(matches!(
            f.column("nope"),
            Err(StatsError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_push_row_arity() {
        let mut f = Frame::new(vec!["a", "b"]);
        assert!(f.push_row(vec![1.0.into()]).is_err());
    }

    #[test]
    fn test_filter_all() {
        let mut f = Frame::new(vec!["a", "b", "y"]);
        f.push_row(vec!["x".into(), "u".into(), 1.0.into()]).unwrap();
        f.push_row(vec!["x".into(), "v".into(), 2.0.into()]).unwrap();
        f.push_row(vec!["y".into(), "u".into(), 3.0.into()]).unwrap();
        let hit = f
            .filter_all(&[("a", &"x".into()), ("b", &"u".into())])
            .unwrap();
        assert_eq!(hit.numeric("y").unwrap(), vec![1.0]);
    }
}
