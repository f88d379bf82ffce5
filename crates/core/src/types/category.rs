//! Article category codes.

use crate::define_choice;

define_choice! {
    /// Fine-grained article category, stored as a single letter.
    Category, "category", "catalog.category" {
        Gents => ("g", "Gents"),
        Ladies => ("l", "Ladies"),
        Giants => ("x", "Giants"),
        Kids => ("k", "Kids"),
        Boys => ("b", "Boys"),
        Girls => ("r", "Girls"),
        Children => ("c", "Children"),
    }
}

impl Category {
    /// The coarse grouping (`mcategory`) this category belongs to.
    #[must_use]
    pub fn main_category(self) -> &'static str {
        crate::derive_mcategory(self.as_str())
    }
}
