//! Macro for implementing Display and FromStr for label enums
//!
//! Enums such as [`UpsertChange`](crate::UpsertChange) are logged and
//! persisted as short lowercase labels. The macro generates both directions
//! of that mapping from a single table; parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use calsync_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Outcome {
//!     Written,
//!     Skipped,
//! }
//!
//! impl_label_conversions!(Outcome {
//!     Written => "written",
//!     Skipped => "skipped",
//! });
//!
//! assert_eq!(Outcome::Written.to_string(), "written");
//! assert_eq!("SKIPPED".parse::<Outcome>().unwrap(), Outcome::Skipped);
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum from a
/// `Variant => "label"` table.
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
