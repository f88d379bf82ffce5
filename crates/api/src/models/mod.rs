//! Domain models for the catalog.
//!
//! Each submodule holds the JSON-facing domain types for one collection, the
//! input payload accepted by create/update handlers, and the validated field
//! set that the repositories write.

pub mod article;
pub mod article_info;
pub mod color;
pub mod material;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

pub use article::{
    Article, ArticleDetail, ArticleFields, ArticleFilter, ArticleInput, ArticleQuery,
};
pub use article_info::{
    ArticleInfo, ArticleInfoDetail, ArticleInfoFields, ArticleInfoFilter, ArticleInfoInput,
    ArticleInfoQuery, MinimalArticle,
};
pub use color::{Color, ColorInput, NewColor};
pub use material::{Material, MaterialFields, MaterialFilter, MaterialInput, MaterialQuery};
pub use user::{TokenKey, User, hash_token_key};

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Create an error set with a single failure.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Whether no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the failing fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Return `value` if no failures were recorded, otherwise the failures.
    ///
    /// # Errors
    ///
    /// Returns `self` when it is not empty.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Field Checks
// =============================================================================

/// Trim a required text field and check its length.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> String {
    let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else {
        check_max_len(errors, field, &value, max_len);
    }
    value
}

/// Trim an optional text field and check its length. Missing means empty.
pub(crate) fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> String {
    let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    check_max_len(errors, field, &value, max_len);
    value
}

fn check_max_len(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) {
    if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {max_len} characters."),
        );
    }
}

/// Parse an optional choice field. Missing or blank input means "no choice".
pub(crate) fn optional_choice<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<T>() {
        Ok(choice) => Some(choice),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

/// Check that a decimal fits a `NUMERIC(max_digits, decimal_places)` column.
pub(crate) fn check_decimal(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Decimal>,
    max_digits: u32,
    decimal_places: u32,
) -> Option<Decimal> {
    let value = value?;
    if value.normalize().scale() > decimal_places {
        errors.add(
            field,
            format!("Ensure that there are no more than {decimal_places} decimal places."),
        );
    }
    let limit = Decimal::from(10_i64.pow(max_digits - decimal_places));
    if value.abs() >= limit {
        errors.add(
            field,
            format!("Ensure that there are no more than {max_digits} digits in total."),
        );
    }
    Some(value)
}
