//! Column encoding for effective dates.
//!
//! Dates are stored as their day number in the common era (`0001-01-01` is
//! day 1), so integer order in SQL is calendar order for every `NaiveDate`,
//! including years outside `0000..=9999`.

use chrono::{Datelike, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

/// A `NaiveDate` bound to or read from an `INTEGER` day-number column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayNumber(pub NaiveDate);

impl ToSql for DayNumber {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0.num_days_from_ce())))
    }
}

impl FromSql for DayNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let days = value.as_i64()?;
        i32::try_from(days)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(DayNumber)
            .ok_or(FromSqlError::OutOfRange(days))
    }
}
