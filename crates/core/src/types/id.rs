//! Newtype IDs for type-safe references to payment provider objects.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different object types. The payment
//! provider issues opaque string identifiers (`price_...`, `prod_...`), so
//! the wrappers hold a `String` and only reject blank values.

use thiserror::Error;

/// Error returned when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The identifier was empty or contained only whitespace.
    #[error("identifier must not be empty")]
    Empty,
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` as a plain string, validated on the way in
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - `parse()` (trims surrounding whitespace, rejects blank input) and `as_str()`
/// - `FromStr`, `TryFrom<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use tidepool_core::define_id;
/// define_id!(PlanId);
/// define_id!(CouponId);
///
/// let plan = PlanId::parse("plan_123").unwrap();
/// let coupon = CouponId::parse("plan_123").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: PlanId = coupon;
/// # let _ = (plan, coupon);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if nothing remains after trimming.
            pub fn parse(value: impl AsRef<str>) -> ::core::result::Result<Self, $crate::IdError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PriceId);
define_id!(ProductId);
define_id!(CheckoutSessionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = PriceId::parse("  price_123 \n").unwrap();
        assert_eq!(id.as_str(), "price_123");
        assert_eq!(id.to_string(), "price_123");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(PriceId::parse(""), Err(IdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id: ProductId = serde_json::from_str("\"prod_abc\"").unwrap();
        assert_eq!(id.as_str(), "prod_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"prod_abc\"");
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        let result: Result<PriceId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
