//! Fixed choice lists for catalog fields.
//!
//! Every choice serializes to its lower-case key (the value stored in the
//! database and matched by query filters), not to its display label.

use thiserror::Error;

/// Error returned when a string is not one of a choice list's keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{value}\" is not a valid {kind}")]
pub struct ChoiceError {
    /// Name of the choice list (e.g. "brand").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Macro to define a closed set of string-keyed choices.
///
/// Generates the enum with:
/// - serde (de)serialization to the key
/// - a `sqlx::Type` mapping to the named Postgres enum (with `postgres` feature)
/// - `ALL`, `as_str()`, `label()`, `Display` and `FromStr`
#[macro_export]
macro_rules! define_choice {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, $type_name:literal {
            $($(#[$vmeta:meta])* $variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(type_name = $type_name))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key)]
                #[cfg_attr(feature = "postgres", sqlx(rename = $key))]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored key.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            /// Human-readable label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::ChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    _ => Err($crate::ChoiceError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

define_choice! {
    /// Article brand.
    Brand, "brand", "catalog.brand" {
        Pride => ("pride", "Pride"),
        Debongo => ("debongo", "Debongo"),
        Smartak => ("smartak", "Smartak"),
        Stile => ("stile", "Stile"),
        LPride => ("lpride", "L. Pride"),
        Disney => ("disney", "Disney"),
        Batman => ("batman", "Batman"),
        Kapers => ("kapers", "Kapers"),
    }
}

define_choice! {
    /// Article style.
    Style, "style", "catalog.style" {
        VStrap => ("v-strap", "V-STRAP"),
        Sandal => ("sandal", "SANDAL"),
        TStrap => ("t-strap", "T-STRAP"),
        Covering => ("covering", "COVERING"),
        Shoes => ("shoes", "SHOES"),
    }
}

define_choice! {
    /// Bill-of-materials category.
    MaterialCategory, "material category", "catalog.material_category" {
        Rexin => ("rexin", "Rexin"),
        Component => ("component", "Component"),
        Chemical => ("chemical", "Chemical"),
        Packing => ("packing", "Packing"),
    }
}

define_choice! {
    /// Unit of measure.
    Uom, "unit of measure", "catalog.uom" {
        Pairs => ("pairs", "Pair"),
        Kilogram => ("kilogram", "Kilogram"),
        Meter => ("meter", "Meter"),
        Cone => ("cone", "Cone"),
        Roll => ("roll", "Roll"),
        Nos => ("nos", "Nos"),
        Gram => ("gram", "Gram"),
    }
}
