//! Nullable text fields on editable records.
//!
//! The backend stores unset optional text as `null`; form inputs only deal in
//! strings. Loading a record turns `null` into `""`, saving turns blank input
//! back into `null`, so an empty input always means "unset".
//!
//! Non-empty values are never trimmed or otherwise changed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::FormState;

/// Optional text attributes of a persisted record.
pub type PersistedFields = BTreeMap<String, Option<String>>;

/// The same attributes as held by a form.
pub type FormFields = BTreeMap<String, String>;

/// `null` becomes `""`; everything else is unchanged.
#[must_use]
pub fn to_form(record: &PersistedFields) -> FormFields {
    record
        .iter()
        .map(|(field, value)| (field.clone(), value.clone().unwrap_or_default()))
        .collect()
}

/// Blank text becomes `null`; everything else is unchanged.
#[must_use]
pub fn to_persisted(form: &FormFields) -> PersistedFields {
    form.iter()
        .map(|(field, value)| {
            let value = if value.trim().is_empty() {
                None
            } else {
                Some(value.clone())
            };
            (field.clone(), value)
        })
        .collect()
}

/// Names of the nullable text fields of one record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NullableFields(BTreeSet<String>);

impl NullableFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into());
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Prepare a loaded record for editing: every declared field that is
    /// `null` or missing becomes `""`.
    pub fn load_into_form(&self, record: &mut FormState) {
        for field in &self.0 {
            let entry = record.entry(field.clone()).or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::String(String::new());
            }
        }
    }

    /// Prepare edited values for saving: every declared field holding blank
    /// text becomes `null`. Fields absent from the form stay absent.
    pub fn save_from_form(&self, form: &mut FormState) {
        for field in &self.0 {
            if let Some(value) = form.get_mut(field)
                && value.as_str().is_some_and(|text| text.trim().is_empty())
            {
                *value = Value::Null;
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for NullableFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
