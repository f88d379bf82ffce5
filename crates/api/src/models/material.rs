//! Bill-of-materials domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{FilterError, MaterialCategory, MaterialId, Uom, filter};

use super::{ValidationErrors, check_decimal, optional_choice, optional_text, required_text};

/// Maximum length of a material code.
pub const CODE_MAX_LEN: usize = 18;

/// Maximum length of a material name.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a material subcategory.
pub const SUBCATEGORY_MAX_LEN: usize = 25;

/// `NUMERIC(12, 4)` for `cf`.
pub const CF_DIGITS: (u32, u32) = (12, 4);

/// `NUMERIC(5, 2)` for `price`.
pub const PRICE_DIGITS: (u32, u32) = (5, 2);

/// A material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Material {
    pub id: MaterialId,
    pub code: String,
    pub name: String,
    pub category: Option<MaterialCategory>,
    pub subcategory: String,
    pub uom: Option<Uom>,
    pub purchaseuom: Option<Uom>,
    /// Conversion factor from purchase units to consumption units.
    pub cf: Decimal,
    pub price: Decimal,
    pub active: bool,
}

/// Material payload as sent by clients.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialInput {
    pub code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub uom: Option<String>,
    pub purchaseuom: Option<String>,
    pub cf: Option<Decimal>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

/// A validated material write.
///
/// Unset optional fields take their column default on create and keep their
/// stored value on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialFields {
    pub code: String,
    pub name: String,
    pub category: Option<Option<MaterialCategory>>,
    pub subcategory: Option<String>,
    pub uom: Option<Option<Uom>>,
    pub purchaseuom: Option<Option<Uom>>,
    pub cf: Option<Decimal>,
    pub price: Option<Decimal>,
    pub active: Option<bool>,
}

impl MaterialInput {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` for missing or over-long text, unknown
    /// choices and decimals that do not fit their columns.
    pub fn validate(self) -> Result<MaterialFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let code = required_text(&mut errors, "code", self.code, CODE_MAX_LEN);
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let subcategory = self.subcategory.map(|raw| {
            optional_text(&mut errors, "subcategory", Some(raw), SUBCATEGORY_MAX_LEN)
        });
        let category = self
            .category
            .map(|raw| optional_choice(&mut errors, "category", Some(raw)));
        let uom = self
            .uom
            .map(|raw| optional_choice(&mut errors, "uom", Some(raw)));
        let purchaseuom = self
            .purchaseuom
            .map(|raw| optional_choice(&mut errors, "purchaseuom", Some(raw)));

        let (digits, places) = CF_DIGITS;
        let cf = check_decimal(&mut errors, "cf", self.cf, digits, places);
        let (digits, places) = PRICE_DIGITS;
        let price = check_decimal(&mut errors, "price", self.price, digits, places);

        errors.finish(MaterialFields {
            code,
            name,
            category,
            subcategory,
            uom,
            purchaseuom,
            cf,
            price,
            active: self.active,
        })
    }
}

/// Filters accepted by the material listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialFilter {
    /// Substring matches against `code`; any token may match.
    pub codes: Option<Vec<String>>,
    /// Substring matches against `name`; any token may match.
    pub names: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub subcategories: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Raw query parameters for the material listing.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialQuery {
    pub code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub scategory: Option<String>,
    pub active: Option<String>,
}

impl TryFrom<MaterialQuery> for MaterialFilter {
    type Error = FilterError;

    fn try_from(query: MaterialQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            codes: filter::list_param(query.code.as_deref()),
            names: filter::list_param(query.name.as_deref()),
            categories: filter::list_param(query.category.as_deref()),
            subcategories: filter::list_param(query.scategory.as_deref()),
            active: filter::bool_param("active", query.active.as_deref())?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_minimal_material() {
        let fields = MaterialInput {
            code: Some("5-co07".into()),
            name: Some("Non pasted tape".into()),
            ..MaterialInput::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.code, "5-co07");
        assert_eq!(fields.category, None);
        assert_eq!(fields.cf, None);
    }

    #[test]
    fn test_validate_choices() {
        let fields = MaterialInput {
            code: Some("r-01".into()),
            name: Some("Rexin black".into()),
            category: Some("rexin".into()),
            uom: Some("meter".into()),
            purchaseuom: Some(String::new()),
            ..MaterialInput::default()
        }
        .validate()
        .unwrap();
        assert_eq!(fields.category, Some(Some(MaterialCategory::Rexin)));
        assert_eq!(fields.uom, Some(Some(Uom::Meter)));
        assert_eq!(fields.purchaseuom, Some(None));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let errors = MaterialInput {
            code: Some("x".repeat(19)),
            name: None,
            uom: Some("litre".into()),
            cf: Some(Decimal::new(1, 5)),
            ..MaterialInput::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["cf", "code", "name", "uom"]
        );
    }

    #[test]
    fn test_query_into_filter() {
        let filter = MaterialFilter::try_from(MaterialQuery {
            code: Some("5-co07, 5-co08".into()),
            name: Some("non pasted, tape".into()),
            scategory: Some("Tape".into()),
            active: Some("false ".into()),
            ..MaterialQuery::default()
        })
        .unwrap();
        assert_eq!(filter.codes.unwrap(), vec!["5-co07", "5-co08"]);
        assert_eq!(filter.names.unwrap(), vec!["non pasted", "tape"]);
        assert_eq!(filter.subcategories.unwrap(), vec!["tape"]);
        assert_eq!(filter.active, Some(false));
    }
}
