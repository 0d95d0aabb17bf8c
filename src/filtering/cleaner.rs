//! Filter cleaning before submission.
//!
//! A search form carries many fields that mean "no filter" when they are
//! blank. [`clean`] strips those according to a declared [`FilterPolicy`],
//! fills in defaults for fields the API always expects, and flattens
//! relational selector fields into the identifier shape the API accepts.
//!
//! ```rust
//! use hirequery::filtering::cleaner::{clean, Fallback, FilterPolicy};
//! use serde_json::json;
//!
//! let policy = FilterPolicy::new()
//!     .preserve_with("page", Fallback::PositiveInteger(1))
//!     .preserve("status");
//!
//! let values = json!({"vacancyId": null, "recruiterId": "123"});
//! let cleaned = clean(values.as_object().unwrap(), &policy);
//!
//! assert_eq!(serde_json::Value::Object(cleaned), json!({"page": 1, "recruiterId": "123"}));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::ordinal;
use crate::models::FormState;

/// How a single field is treated by [`clean`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum FieldPolicy {
    /// Forwarded whenever present, even if falsy. The fallback, when given,
    /// is substituted for an absent or unusable value.
    Preserve {
        #[serde(default)]
        fallback: Option<Fallback>,
    },
    /// Omitted when it carries no signal.
    DropIfEmpty {
        /// Numeric zero counts as "unset" for this field.
        #[serde(default, rename = "zeroIsUnset")]
        zero_is_unset: bool,
    },
    /// Never forwarded.
    Drop,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self::DropIfEmpty {
            zero_is_unset: false,
        }
    }
}

/// Default substituted for a preserved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fallback {
    /// Used when the value is absent or `null`.
    Value(Value),
    /// Used unless the value is already an integer `>= 1`.
    PositiveInteger(u64),
}

/// Post-cleaning reshaping of a field that references related entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Selector {
    /// `{skill: {id}}` becomes the bare `id`.
    BareId { relation: String },
    /// `{language: {id}, level}` becomes `{languageId, level}`.
    Inline { relation: String },
    /// `{language: {id}, minLevel, maxLevel}` becomes
    /// `{languageId, levels: [...]}`, the levels being every member of
    /// `order` inside the bounds.
    LevelRange { relation: String, order: Vec<String> },
}

impl Selector {
    #[must_use]
    pub fn bare_id(relation: impl Into<String>) -> Self {
        Self::BareId {
            relation: relation.into(),
        }
    }

    #[must_use]
    pub fn inline(relation: impl Into<String>) -> Self {
        Self::Inline {
            relation: relation.into(),
        }
    }

    #[must_use]
    pub fn level_range<T: ordinal::Ordinal>(relation: impl Into<String>) -> Self {
        Self::LevelRange {
            relation: relation.into(),
            order: T::names(),
        }
    }

    /// Flatten a single object or every element of an array.
    fn apply(&self, value: &Value) -> Value {
        match value {
            Value::Array(entries) => Value::Array(
                entries
                    .iter()
                    .filter_map(|entry| self.flatten_entry(entry))
                    .collect(),
            ),
            other => self.flatten_entry(other).unwrap_or(Value::Null),
        }
    }

    fn flatten_entry(&self, entry: &Value) -> Option<Value> {
        match self {
            Self::BareId { relation } => match entry {
                Value::String(_) | Value::Number(_) => Some(entry.clone()),
                Value::Object(fields) => related_id(fields, relation),
                _ => None,
            },
            Self::Inline { relation } => {
                let fields = entry.as_object()?;
                let id = related_id(fields, relation)?;
                let mut flat = fields.clone();
                flat.remove(relation);
                flat.insert(format!("{relation}Id"), id);
                Some(Value::Object(flat))
            }
            Self::LevelRange { relation, order } => {
                let fields = entry.as_object()?;
                let id = related_id(fields, relation)?;
                let mut flat = fields.clone();
                flat.remove(relation);
                let min = level_bound(flat.remove("minLevel"));
                let max = level_bound(flat.remove("maxLevel"));
                let levels = ordinal::expand(order, min.as_ref(), max.as_ref())
                    .into_iter()
                    .map(Value::String)
                    .collect();
                flat.insert(format!("{relation}Id"), id);
                flat.insert("levels".to_string(), Value::Array(levels));
                Some(Value::Object(flat))
            }
        }
    }
}

fn related_id(fields: &Map<String, Value>, relation: &str) -> Option<Value> {
    match fields.get(relation)?.get("id")? {
        Value::Null => None,
        id => Some(id.clone()),
    }
}

fn level_bound(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(level) if !level.trim().is_empty() => Some(level),
        _ => None,
    }
}

/// Declared treatment of every field of one search form.
///
/// Fields that are not named fall back to [`FieldPolicy::default`]
/// (dropped when empty, zero kept).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPolicy {
    #[serde(default)]
    fields: BTreeMap<String, FieldPolicy>,
    #[serde(default)]
    selectors: BTreeMap<String, Selector>,
}

impl FilterPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, policy: FieldPolicy) -> Self {
        self.fields.insert(name.into(), policy);
        self
    }

    /// Keep the field whenever it is present.
    #[must_use]
    pub fn preserve(self, name: impl Into<String>) -> Self {
        self.field(name, FieldPolicy::Preserve { fallback: None })
    }

    /// Keep the field, substituting `fallback` when it is missing.
    #[must_use]
    pub fn preserve_with(self, name: impl Into<String>, fallback: Fallback) -> Self {
        self.field(
            name,
            FieldPolicy::Preserve {
                fallback: Some(fallback),
            },
        )
    }

    #[must_use]
    pub fn drop_if_empty(self, name: impl Into<String>) -> Self {
        self.field(name, FieldPolicy::default())
    }

    /// Drop the field when empty, treating `0` as empty too.
    #[must_use]
    pub fn zero_is_unset(self, name: impl Into<String>) -> Self {
        self.field(
            name,
            FieldPolicy::DropIfEmpty {
                zero_is_unset: true,
            },
        )
    }

    #[must_use]
    pub fn always_drop(self, name: impl Into<String>) -> Self {
        self.field(name, FieldPolicy::Drop)
    }

    #[must_use]
    pub fn selector(mut self, name: impl Into<String>, selector: Selector) -> Self {
        self.selectors.insert(name.into(), selector);
        self
    }

    #[must_use]
    pub fn policy_for(&self, name: &str) -> FieldPolicy {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn preserved(&self) -> impl Iterator<Item = (&String, Option<&Fallback>)> {
        self.fields.iter().filter_map(|(name, policy)| match policy {
            FieldPolicy::Preserve { fallback } => Some((name, fallback.as_ref())),
            _ => None,
        })
    }
}

/// Whether a value means "no filter".
#[must_use]
pub fn carries_no_signal(value: &Value, zero_is_unset: bool) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Number(number) => zero_is_unset && is_zero(number),
        Value::Bool(_) => false,
    }
}

fn is_zero(number: &serde_json::Number) -> bool {
    number.as_i64() == Some(0)
        || number.as_u64() == Some(0)
        || number.as_f64().is_some_and(|float| float.abs() < f64::EPSILON)
}

fn is_positive_integer(value: &Value) -> bool {
    value.as_u64().is_some_and(|number| number >= 1)
}

fn resolve_preserved(value: Option<&Value>, fallback: Option<&Fallback>) -> Option<Value> {
    let present = value.filter(|value| !value.is_null());
    match fallback {
        None => present.cloned(),
        Some(Fallback::Value(default)) => Some(present.cloned().unwrap_or_else(|| default.clone())),
        Some(Fallback::PositiveInteger(default)) => match present {
            Some(value) if is_positive_integer(value) => Some(value.clone()),
            _ => Some(Value::from(*default)),
        },
    }
}

/// Project form values onto the payload the search API expects.
///
/// Empty drop-if-empty fields are removed, preserved fields get their
/// fallbacks, and selector fields are flattened. A selector field left
/// without any identifier is removed too, unless it is preserved.
#[must_use]
pub fn clean(values: &FormState, policy: &FilterPolicy) -> FormState {
    let mut cleaned = Map::new();

    for (name, fallback) in policy.preserved() {
        if let Some(value) = resolve_preserved(values.get(name), fallback) {
            cleaned.insert(name.clone(), value);
        }
    }

    for (name, value) in values {
        match policy.policy_for(name) {
            FieldPolicy::Preserve { .. } => {}
            FieldPolicy::Drop => {
                tracing::trace!(field = %name, "dropping transient field");
            }
            FieldPolicy::DropIfEmpty { zero_is_unset } => {
                if carries_no_signal(value, zero_is_unset) {
                    tracing::trace!(field = %name, "dropping empty filter");
                } else {
                    cleaned.insert(name.clone(), value.clone());
                }
            }
        }
    }

    flatten_selectors(&mut cleaned, policy);

    for name in policy.selectors.keys() {
        let emptied = cleaned
            .get(name)
            .is_some_and(|value| carries_no_signal(value, false));
        let preserved = matches!(policy.policy_for(name), FieldPolicy::Preserve { .. });
        if emptied && !preserved {
            tracing::trace!(field = %name, "selector left no identifiers");
            cleaned.remove(name);
        }
    }

    cleaned
}

/// Reshape an edit form's values for saving without dropping empty ones.
///
/// Transient fields are removed and selector fields flattened; blank values
/// are kept so that a save can clear them.
pub fn reshape(values: &mut FormState, policy: &FilterPolicy) {
    values.retain(|name, _| policy.policy_for(name) != FieldPolicy::Drop);
    flatten_selectors(values, policy);
}

fn flatten_selectors(values: &mut FormState, policy: &FilterPolicy) {
    for (name, selector) in &policy.selectors {
        if let Some(value) = values.get_mut(name)
            && !value.is_null()
        {
            *value = selector.apply(value);
        }
    }
}
