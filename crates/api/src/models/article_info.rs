//! Article variant (`ArticleInfo`) domain types.
//!
//! A variant is one article in one color for one size category. Its `artid`
//! and `mcategory` are derived on every write and any client-supplied value
//! is ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{
    ArticleId, ArticleInfoId, Category, ColorFilter, ColorId, FilterError, filter,
};

use super::{ValidationErrors, check_decimal};

/// `NUMERIC(5, 2)` for `price`.
pub const PRICE_DIGITS: (u32, u32) = (5, 2);

/// `NUMERIC(6, 2)` for `basic`.
pub const BASIC_DIGITS: (u32, u32) = (6, 2);

/// A variant with `article` and `color` as ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleInfo {
    pub id: ArticleInfoId,
    pub artid: String,
    pub article: ArticleId,
    pub color: ColorId,
    pub category: Category,
    pub mcategory: String,
    pub price: Decimal,
    pub active: bool,
    pub basic: Decimal,
    pub export: bool,
}

/// A variant with `article` as the artno and `color` as the color name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleInfoDetail {
    pub id: ArticleInfoId,
    pub artid: String,
    pub article: String,
    pub color: String,
    pub category: Category,
    pub mcategory: String,
    pub price: Decimal,
    pub active: bool,
    pub basic: Decimal,
    pub export: bool,
}

/// Public, unauthenticated view of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinimalArticle {
    pub article: String,
    pub color: String,
    pub mcategory: String,
    pub price: Decimal,
    pub active: bool,
}

/// Variant payload as sent by clients.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleInfoInput {
    pub article: Option<i32>,
    pub color: Option<i32>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub basic: Option<Decimal>,
    pub active: Option<bool>,
    pub export: Option<bool>,
}

/// A validated variant write.
///
/// Unset optional fields take their column default on create and keep their
/// stored value on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfoFields {
    pub article: ArticleId,
    pub color: ColorId,
    pub category: Category,
    pub price: Option<Decimal>,
    pub basic: Option<Decimal>,
    pub active: Option<bool>,
    pub export: Option<bool>,
}

impl ArticleInfoInput {
    /// Validate the payload.
    ///
    /// Whether `article` and `color` exist is checked by the repository.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` for missing references, a missing or
    /// unknown category, and decimals that do not fit their columns.
    pub fn validate(self) -> Result<ArticleInfoFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.article.is_none() {
            errors.add("article", "This field is required.");
        }
        if self.color.is_none() {
            errors.add("color", "This field is required.");
        }

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                errors.add("category", "This field is required.");
                None
            }
            Some(raw) => raw
                .parse::<Category>()
                .map_err(|e| errors.add("category", e.to_string()))
                .ok(),
        };

        let (digits, places) = PRICE_DIGITS;
        let price = check_decimal(&mut errors, "price", self.price, digits, places);
        let (digits, places) = BASIC_DIGITS;
        let basic = check_decimal(&mut errors, "basic", self.basic, digits, places);

        match (self.article, self.color, category) {
            (Some(article), Some(color), Some(category)) if errors.is_empty() => {
                Ok(ArticleInfoFields {
                    article: ArticleId::new(article),
                    color: ColorId::new(color),
                    category,
                    price,
                    basic,
                    active: self.active,
                    export: self.export,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Filters accepted by the variant listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleInfoFilter {
    pub artnos: Option<Vec<String>>,
    pub brands: Option<Vec<String>>,
    pub styles: Option<Vec<String>>,
    pub color: Option<ColorFilter>,
    /// Matched against the variant's `mcategory` or its category code.
    pub categories: Option<Vec<String>>,
    pub active: Option<bool>,
    pub export: Option<bool>,
}

/// Raw query parameters for the variant listing.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleInfoQuery {
    pub artno: Option<String>,
    pub brand: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub active: Option<String>,
    pub export: Option<String>,
}

impl TryFrom<ArticleInfoQuery> for ArticleInfoFilter {
    type Error = FilterError;

    fn try_from(query: ArticleInfoQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            artnos: filter::list_param(query.artno.as_deref()),
            brands: filter::list_param(query.brand.as_deref()),
            styles: filter::list_param(query.style.as_deref()),
            color: ColorFilter::parse(query.color.as_deref()),
            categories: filter::list_param(query.category.as_deref()),
            active: filter::bool_param("active", query.active.as_deref())?,
            export: filter::bool_param("export", query.export.as_deref())?,
        })
    }
}
