//! Customer rating on a 0–5 scale.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// The value is outside `0.0..=5.0` or not a number.
    #[error("rating must be between 0 and 5 (got {0})")]
    OutOfRange(f32),
}

/// An average customer rating between 0 and 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "f32", into = "f32")]
pub struct Rating(f32);

impl Rating {
    /// Highest possible rating.
    pub const MAX: f32 = 5.0;

    /// Create a rating, validating the range.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` for values outside `0.0..=5.0` and NaN.
    pub fn new(value: f32) -> Result<Self, RatingError> {
        if (0.0..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Total ordering suitable for sorting (ratings are never NaN).
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f32> for Rating {
    type Error = RatingError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f32 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inclusive() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(5.1).is_err());
        assert!(Rating::new(-0.5).is_err());
        assert!(Rating::new(f32::NAN).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Rating>("4.5").is_ok());
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }

    #[test]
    fn test_display_one_decimal() {
        assert_eq!(Rating::new(4.0).unwrap().to_string(), "4.0");
    }
}
