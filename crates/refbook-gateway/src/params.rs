//! Query-parameter validation.
//!
//! Raw query strings are deserialized into `*Query` structs of optional
//! strings and validated into typed `*Params`. Every problem is reported
//! under the name of the offending parameter; validation never stops at the
//! first error.

use axum::extract::{rejection::QueryRejection, Query};
use chrono::NaiveDate;
use refbook_core::limits;
use serde::Deserialize;

use crate::error::{AppError, FieldErrors};

/// Accepted date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// Key for problems not tied to one parameter.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub fn max_length_message(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

/// Unwrap an extracted query, reporting malformed query strings as a
/// validation error.
pub fn extract<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            let mut errors = FieldErrors::new();
            errors.add(NON_FIELD_ERRORS, rejection.body_text());
            Err(AppError::Validation(errors))
        }
    }
}

/// Raw parameters of `GET /refbooks`.
#[derive(Debug, Default, Deserialize)]
pub struct RefbookListQuery {
    pub date: Option<String>,
}

/// Validated parameters of `GET /refbooks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefbookListParams {
    pub date: Option<NaiveDate>,
}

impl RefbookListQuery {
    pub fn validate(self) -> Result<RefbookListParams, AppError> {
        let mut errors = FieldErrors::new();
        let date = optional_date(&mut errors, "date", self.date);
        errors.into_result(RefbookListParams { date })
    }
}

/// Raw parameters of `GET /refbooks/{id}/elements`.
#[derive(Debug, Default, Deserialize)]
pub struct ElementListQuery {
    pub version: Option<String>,
}

/// Validated parameters of `GET /refbooks/{id}/elements`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementListParams {
    pub version: Option<String>,
}

impl ElementListQuery {
    pub fn validate(self) -> Result<ElementListParams, AppError> {
        let mut errors = FieldErrors::new();
        let version = optional_text(&mut errors, "version", self.version, limits::VERSION_LABEL);
        errors.into_result(ElementListParams { version })
    }
}

/// Raw parameters of `GET /refbooks/{id}/check_element`.
#[derive(Debug, Default, Deserialize)]
pub struct CheckElementQuery {
    pub code: Option<String>,
    pub value: Option<String>,
    pub version: Option<String>,
}

/// Validated parameters of `GET /refbooks/{id}/check_element`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckElementParams {
    pub code: String,
    pub value: String,
    pub version: Option<String>,
}

impl CheckElementQuery {
    pub fn validate(self) -> Result<CheckElementParams, AppError> {
        let mut errors = FieldErrors::new();
        let code = required_text(&mut errors, "code", self.code, limits::ENTRY_CODE);
        let value = required_text(&mut errors, "value", self.value, limits::ENTRY_VALUE);
        let version = optional_text(&mut errors, "version", self.version, limits::VERSION_LABEL);

        match (code, value) {
            (Some(code), Some(value)) if errors.is_empty() => Ok(CheckElementParams {
                code,
                value,
                version,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Parse a date in `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn optional_date(errors: &mut FieldErrors, field: &str, raw: Option<String>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        errors.add(field, DATE_FORMAT_MESSAGE);
    }
    parsed
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<String>,
    max: usize,
) -> Option<String> {
    match raw {
        None => {
            errors.add(field, REQUIRED_MESSAGE);
            None
        }
        Some(raw) => optional_text(errors, field, Some(raw), max),
    }
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<String>,
    max: usize,
) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        errors.add(field, BLANK_MESSAGE);
        return None;
    }
    if raw.chars().count() > max {
        errors.add(field, max_length_message(max));
        return None;
    }
    Some(raw)
}
