//! Parameter validation for the endpoint builder.
//!
//! Each check returns `ApiError::InvalidArgument` naming the wire field.
//! Blankness follows Unicode whitespace; lengths count `char`s.

use std::ops::RangeInclusive;

use crate::config::Limits;
use crate::error::{ApiError, Violation};

pub const MONTHS: RangeInclusive<i32> = 1..=12;
pub const DAYS: RangeInclusive<i32> = 1..=31;
pub const HOURS: RangeInclusive<i32> = 0..=24;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn not_blank(field: &'static str, value: &str) -> Result<(), ApiError> {
    if is_blank(value) {
        return Err(ApiError::invalid(field, Violation::Blank));
    }
    Ok(())
}

pub fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::invalid(field, Violation::TooLong { max }));
    }
    Ok(())
}

pub fn in_range(field: &'static str, value: i32, range: RangeInclusive<i32>) -> Result<(), ApiError> {
    if !range.contains(&value) {
        return Err(ApiError::invalid(
            field,
            Violation::OutOfRange {
                min: i64::from(*range.start()),
                max: i64::from(*range.end()),
            },
        ));
    }
    Ok(())
}

pub fn access_token(token: &str) -> Result<(), ApiError> {
    not_blank("access_token", token)
}

pub fn short_name(value: &str, limits: &Limits) -> Result<(), ApiError> {
    not_blank("short_name", value)?;
    max_chars("short_name", value, limits.short_name_max)
}

/// Author name and URL may be blank; only their length is bounded.
pub fn author(name: &str, url: &str, limits: &Limits) -> Result<(), ApiError> {
    max_chars("author_name", name, limits.author_name_max)?;
    max_chars("author_url", url, limits.author_url_max)
}

pub fn title(value: &str, limits: &Limits) -> Result<(), ApiError> {
    not_blank("title", value)?;
    max_chars("title", value, limits.title_max)
}

pub fn content(value: &str, limits: &Limits) -> Result<(), ApiError> {
    not_blank("content", value)?;
    if value.len() > limits.content_max_bytes {
        return Err(ApiError::invalid(
            "content",
            Violation::TooLarge {
                max_bytes: limits.content_max_bytes,
            },
        ));
    }
    Ok(())
}

pub fn path(value: &str) -> Result<(), ApiError> {
    not_blank("path", value)
}

pub fn year(value: i32, limits: &Limits) -> Result<(), ApiError> {
    in_range("year", value, limits.min_year..=limits.max_year)
}

pub fn month(value: i32) -> Result<(), ApiError> {
    in_range("month", value, MONTHS)
}

pub fn day(value: i32) -> Result<(), ApiError> {
    in_range("day", value, DAYS)
}

pub fn hour(value: i32) -> Result<(), ApiError> {
    in_range("hour", value, HOURS)
}
