//! Ordered enumerations and inclusive range expansion.
//!
//! Search filters often describe a contiguous band of an ordinal scale
//! ("at least `INTERMEDIATE`, at most `ADVANCED`") while the backend can only
//! match exact values. [`expand`] turns such a band into the explicit list of
//! members so it can be sent as an `IN` filter.
//!
//! ```rust
//! use hirequery::filtering::ordinal::{LanguageLevel, LevelRange};
//!
//! let range = LevelRange::new(
//!     Some(LanguageLevel::PreIntermediate),
//!     Some(LanguageLevel::UpperIntermediate),
//! );
//! assert_eq!(
//!     range.expand(),
//!     vec![
//!         LanguageLevel::PreIntermediate,
//!         LanguageLevel::Intermediate,
//!         LanguageLevel::UpperIntermediate,
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expand an inclusive `[min, max]` sub-range of `order` into its members.
///
/// An absent `min` means the first member and an absent `max` the last one.
/// An inverted range, or a bound that is not part of `order`, yields an empty
/// result.
#[must_use]
pub fn expand<T>(order: &[T], min: Option<&T>, max: Option<&T>) -> Vec<T>
where
    T: PartialEq + Clone,
{
    if order.is_empty() {
        return Vec::new();
    }

    let Some(start) = resolve_bound(order, min, 0) else {
        return Vec::new();
    };
    let Some(end) = resolve_bound(order, max, order.len() - 1) else {
        return Vec::new();
    };

    if start > end {
        return Vec::new();
    }

    order[start..=end].to_vec()
}

fn resolve_bound<T: PartialEq>(order: &[T], bound: Option<&T>, fallback: usize) -> Option<usize> {
    match bound {
        Some(value) => order.iter().position(|member| member == value),
        None => Some(fallback),
    }
}

/// A type whose values form a fixed, totally ordered scale.
///
/// The order is declared once through [`Ordinal::ORDER`] and never inferred
/// from discriminants or names.
pub trait Ordinal: Sized + Copy + PartialEq + 'static {
    /// Every member, lowest first.
    const ORDER: &'static [Self];

    /// Wire name of the member, as used in payloads and query strings.
    fn as_str(self) -> &'static str;

    /// Position of the member within [`Ordinal::ORDER`].
    #[must_use]
    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|member| *member == self)
            .unwrap_or_default()
    }

    /// Members between `min` and `max` inclusive, in declared order.
    #[must_use]
    fn expand(min: Option<Self>, max: Option<Self>) -> Vec<Self> {
        expand(Self::ORDER, min.as_ref(), max.as_ref())
    }

    /// Wire names of every member, lowest first.
    #[must_use]
    fn names() -> Vec<String> {
        Self::ORDER.iter().map(|member| member.as_str().to_string()).collect()
    }
}

/// Language proficiency tiers, from `ELEMENTARY` to `NATIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageLevel {
    Elementary,
    PreIntermediate,
    Intermediate,
    UpperIntermediate,
    Advanced,
    Native,
}

impl Ordinal for LanguageLevel {
    const ORDER: &'static [Self] = &[
        Self::Elementary,
        Self::PreIntermediate,
        Self::Intermediate,
        Self::UpperIntermediate,
        Self::Advanced,
        Self::Native,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Elementary => "ELEMENTARY",
            Self::PreIntermediate => "PRE_INTERMEDIATE",
            Self::Intermediate => "INTERMEDIATE",
            Self::UpperIntermediate => "UPPER_INTERMEDIATE",
            Self::Advanced => "ADVANCED",
            Self::Native => "NATIVE",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not the wire name of any level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for LanguageLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// Optional inclusive bounds on an ordinal scale.
///
/// No relation between the two bounds is enforced here: an inverted pair is
/// a valid value that simply expands to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct LevelRange<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<T>,
}

impl<T> Default for LevelRange<T> {
    fn default() -> Self {
        Self {
            min_level: None,
            max_level: None,
        }
    }
}

impl<T: Ordinal> LevelRange<T> {
    #[must_use]
    pub fn new(min_level: Option<T>, max_level: Option<T>) -> Self {
        Self {
            min_level,
            max_level,
        }
    }

    /// Members covered by this range, lowest first.
    #[must_use]
    pub fn expand(&self) -> Vec<T> {
        T::expand(self.min_level, self.max_level)
    }

    /// Whether the range is inverted and therefore matches nothing.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        match (self.min_level, self.max_level) {
            (Some(min), Some(max)) => min.index() > max.index(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LanguageLevel::{Advanced, Elementary, Intermediate, Native, PreIntermediate, UpperIntermediate};

    #[test]
    fn test_expand_middle_band() {
        assert_eq!(
            LanguageLevel::expand(Some(PreIntermediate), Some(UpperIntermediate)),
            vec![PreIntermediate, Intermediate, UpperIntermediate]
        );
    }

    #[test]
    fn test_expand_without_bounds_returns_full_order() {
        assert_eq!(LanguageLevel::expand(None, None), LanguageLevel::ORDER.to_vec());
    }

    #[test]
    fn test_expand_open_ended_bounds() {
        assert_eq!(
            LanguageLevel::expand(Some(Advanced), None),
            vec![Advanced, Native]
        );
        assert_eq!(
            LanguageLevel::expand(None, Some(PreIntermediate)),
            vec![Elementary, PreIntermediate]
        );
    }

    #[test]
    fn test_expand_single_level() {
        assert_eq!(
            LanguageLevel::expand(Some(Intermediate), Some(Intermediate)),
            vec![Intermediate]
        );
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let range = LevelRange::new(Some(Native), Some(Elementary));
        assert!(range.is_inverted());
        assert!(range.expand().is_empty());
    }

    #[test]
    fn test_expand_generic_slice() {
        let order = ["low", "mid", "high"];
        assert_eq!(expand(&order, Some(&"mid"), None), vec!["mid", "high"]);
        assert!(expand(&order, Some(&"unknown"), None).is_empty());

        let empty: [&str; 0] = [];
        assert!(expand(&empty, None, None).is_empty());
    }

    #[test]
    fn test_level_wire_names() {
        assert_eq!(
            serde_json::to_value(UpperIntermediate).unwrap(),
            serde_json::json!("UPPER_INTERMEDIATE")
        );
        assert_eq!("pre_intermediate".parse::<LanguageLevel>(), Ok(PreIntermediate));
        assert!("FLUENT".parse::<LanguageLevel>().is_err());
        assert_eq!(LanguageLevel::names().len(), 6);
    }

    #[test]
    fn test_level_range_json_shape() {
        let range: LevelRange<LanguageLevel> =
            serde_json::from_value(serde_json::json!({"minLevel": "INTERMEDIATE"})).unwrap();
        assert_eq!(range.min_level, Some(Intermediate));
        assert_eq!(range.max_level, None);
        assert_eq!(range.expand(), vec![Intermediate, UpperIntermediate, Advanced, Native]);
    }
}
