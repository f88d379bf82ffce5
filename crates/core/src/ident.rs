//! Derived article identifiers.
//!
//! `artid` and `mcategory` are projections of other fields. They are computed
//! here on every write path and never accepted from clients.

/// Separator between the segments of an `artid`.
pub const ARTID_SEPARATOR: &str = "-";

/// Build the composite article id: `artno-colorcode-category`.
///
/// ```
/// use catalog_core::derive_artid;
///
/// assert_eq!(derive_artid("3290", "bk", "g"), "3290-bk-g");
/// ```
#[must_use]
pub fn derive_artid(artno: &str, color_code: &str, category: &str) -> String {
    [artno, color_code, category].join(ARTID_SEPARATOR)
}

/// Map a category code to its coarse grouping.
///
/// Unknown codes map to `"unknown"` instead of failing.
#[must_use]
pub fn derive_mcategory(category: &str) -> &'static str {
    match category {
        "g" => "gents",
        "l" => "ladies",
        "x" => "giants",
        "c" | "b" | "r" | "k" => "kids",
        _ => "unknown",
    }
}
