//! Query-string filter parsing.
//!
//! Raw query parameter values are turned into plain data here; the API's
//! repositories turn that data into SQL predicates. Nothing in this module
//! knows how a failure is reported to the client.

use thiserror::Error;

/// Accepted spellings of `true` (after trimming and lower-casing).
pub const TRUE_VALUES: &[&str] = &["true", "t", "1", "one"];

/// Accepted spellings of `false` (after trimming and lower-casing).
pub const FALSE_VALUES: &[&str] = &["false", "f", "0", "none", "zero"];

/// Length of a color code; a color filter made only of tokens this long is
/// matched against codes.
pub const COLOR_CODE_LEN: usize = 2;

/// Errors produced while parsing filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A boolean parameter had a value outside the accepted vocabulary.
    #[error("invalid value {value:?} for query parameter '{param}': expected one of true/t/1/one or false/f/0/none/zero")]
    InvalidBoolean {
        /// Query parameter name.
        param: String,
        /// The rejected raw value.
        value: String,
    },
}

/// Split a comma-separated parameter into trimmed, lower-cased tokens.
///
/// Empty tokens are dropped, so `"pride,, debongo "` gives
/// `["pride", "debongo"]`.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parse an optional list parameter.
///
/// Returns `None` when the parameter is absent or holds no tokens, meaning
/// the filter imposes no constraint.
#[must_use]
pub fn list_param(raw: Option<&str>) -> Option<Vec<String>> {
    let tokens = parse_list(raw?);
    (!tokens.is_empty()).then_some(tokens)
}

/// Parse a boolean parameter value.
///
/// # Errors
///
/// Returns `FilterError::InvalidBoolean` if the value is not one of
/// [`TRUE_VALUES`] or [`FALSE_VALUES`].
pub fn parse_bool(param: &str, raw: &str) -> Result<bool, FilterError> {
    let value = raw.trim().to_lowercase();

    if TRUE_VALUES.contains(&value.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&value.as_str()) {
        Ok(false)
    } else {
        Err(FilterError::InvalidBoolean {
            param: param.to_owned(),
            value: raw.to_owned(),
        })
    }
}

/// Parse an optional boolean parameter.
///
/// An absent or blank parameter imposes no constraint.
///
/// # Errors
///
/// Returns `FilterError::InvalidBoolean` for values outside the vocabulary.
pub fn bool_param(param: &str, raw: Option<&str>) -> Result<Option<bool>, FilterError> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse_bool(param, value).map(Some),
        _ => Ok(None),
    }
}

/// A color filter, matched either by code or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorFilter {
    /// Every token was two characters long: match color codes.
    Codes(Vec<String>),
    /// At least one token was not two characters long: match color names.
    Names(Vec<String>),
}

impl ColorFilter {
    /// Parse a `color` query parameter.
    ///
    /// The whole list is treated as codes only if every token has exactly
    /// [`COLOR_CODE_LEN`] characters; a single longer token switches the
    /// entire filter to names.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let tokens = list_param(raw)?;
        if tokens
            .iter()
            .all(|token| token.chars().count() == COLOR_CODE_LEN)
        {
            Some(Self::Codes(tokens))
        } else {
            Some(Self::Names(tokens))
        }
    }

    /// Tokens that should be matched against color codes.
    #[must_use]
    pub fn codes(&self) -> Option<&[String]> {
        match self {
            Self::Codes(codes) => Some(codes),
            Self::Names(_) => None,
        }
    }

    /// Tokens that should be matched against color names.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::Names(names) => Some(names),
            Self::Codes(_) => None,
        }
    }
}

/// Turn tokens into `ILIKE` patterns for substring matching.
///
/// `%`, `_` and `\` inside a token are escaped so they match literally.
#[must_use]
pub fn contains_patterns(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            let mut pattern = String::with_capacity(token.len() + 2);
            pattern.push('%');
            for c in token.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
        .collect()
}
