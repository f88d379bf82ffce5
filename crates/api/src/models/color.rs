//! Color domain types.

use serde::{Deserialize, Serialize};

use catalog_core::ColorId;

use super::{ValidationErrors, required_text};

/// Maximum length of a color name.
pub const NAME_MAX_LEN: usize = 25;

/// Exact length of a color code.
pub const CODE_LEN: usize = 2;

/// A named color with its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    pub code: String,
}

/// Color payload as sent by clients.
#[derive(Debug, Default, Deserialize)]
pub struct ColorInput {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// A validated color ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColor {
    pub name: String,
    pub code: String,
}

impl ColorInput {
    /// Validate the payload. Names and codes are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` for missing or blank fields, an over-long
    /// name, or a code that is not exactly two characters.
    pub fn validate(self) -> Result<NewColor, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", self.name, NAME_MAX_LEN);
        let code = required_text(&mut errors, "code", self.code, CODE_LEN);
        if errors.get("code").is_none() && code.chars().count() != CODE_LEN {
            errors.add(
                "code",
                format!("Ensure this field has exactly {CODE_LEN} characters."),
            );
        }
        errors.finish(NewColor { name, code })
    }
}
