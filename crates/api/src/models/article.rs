//! Article domain types.
//!
//! An article is a base article number (`artno`) with an optional brand and
//! style. Its variants live in [`super::article_info`].

use serde::{Deserialize, Serialize};

use catalog_core::{ArticleId, Brand, ColorFilter, FilterError, Style, filter};

use super::article_info::ArticleInfoDetail;
use super::{ValidationErrors, optional_choice, required_text};

/// Maximum length of an article number.
pub const ARTNO_MAX_LEN: usize = 6;

/// An article as listed, created or updated.
///
/// `items` holds the `artid` of every variant and is read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub artno: String,
    pub brand: Option<Brand>,
    pub style: Option<Style>,
    pub items: Vec<String>,
}

/// An article with its variants expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    pub id: ArticleId,
    pub artno: String,
    pub brand: Option<Brand>,
    pub style: Option<Style>,
    pub items: Vec<ArticleInfoDetail>,
}

/// Article payload as sent by clients. Any `items` value is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleInput {
    pub artno: Option<String>,
    pub brand: Option<String>,
    pub style: Option<String>,
}

/// A validated article write.
///
/// `brand`/`style` of `None` mean "not sent"; `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFields {
    pub artno: String,
    pub brand: Option<Option<Brand>>,
    pub style: Option<Option<Style>>,
}

impl ArticleInput {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` for a missing or over-long `artno` and for
    /// brand or style values outside their choice lists.
    pub fn validate(self) -> Result<ArticleFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let artno = required_text(&mut errors, "artno", self.artno, ARTNO_MAX_LEN);
        let brand = self
            .brand
            .map(|raw| optional_choice(&mut errors, "brand", Some(raw)));
        let style = self
            .style
            .map(|raw| optional_choice(&mut errors, "style", Some(raw)));
        errors.finish(ArticleFields {
            artno,
            brand,
            style,
        })
    }
}

/// Filters accepted by the article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub brands: Option<Vec<String>>,
    pub styles: Option<Vec<String>>,
    /// Matched against the colors of the article's variants.
    pub color: Option<ColorFilter>,
    /// Matched against the variants' `mcategory` or category code.
    pub categories: Option<Vec<String>>,
}

/// Raw query parameters for the article listing.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub brand: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

impl TryFrom<ArticleQuery> for ArticleFilter {
    type Error = FilterError;

    fn try_from(query: ArticleQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            brands: filter::list_param(query.brand.as_deref()),
            styles: filter::list_param(query.style.as_deref()),
            color: ColorFilter::parse(query.color.as_deref()),
            categories: filter::list_param(query.category.as_deref()),
        })
    }
}
