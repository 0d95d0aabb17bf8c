use crate::errors::CodecError;
use crate::filtering::{FilterPolicy, QuerySchema, clean, reshape};
use crate::models::{FormState, merge_defaults};
use crate::nullable::NullableFields;
use crate::validation::{RecordValidator, ValidationErrors};

/// A search page whose filter state is mirrored into the URL and sent to a
/// search endpoint.
///
/// Implementors only declare their field policies; the conversions between
/// URL, form and payload are provided.
pub trait SearchSurface {
    const RESOURCE_NAME: &'static str;

    /// How each filter field travels through the query string.
    fn query_schema() -> QuerySchema;

    /// How each filter field is treated before submission.
    fn filter_policy() -> FilterPolicy;

    /// Initial form values, before anything is read from the URL.
    /// Default is empty.
    #[must_use]
    fn defaults() -> FormState {
        FormState::new()
    }

    /// Rules checked before the filter is submitted.
    /// Default accepts everything.
    #[must_use]
    fn validator() -> RecordValidator {
        RecordValidator::new()
    }

    /// Build form state from a raw URL query string.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when a structured field cannot be decoded.
    fn from_query(raw: &str) -> Result<FormState, CodecError> {
        let parsed = Self::query_schema().from_query_string(raw)?;
        Ok(merge_defaults(&Self::defaults(), parsed))
    }

    /// Reflect form state into a shareable query string.
    #[must_use]
    fn to_query(form: &FormState) -> String {
        Self::query_schema().to_query_string(form)
    }

    /// Validate form state and clean it into a request payload.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    fn prepare(form: &FormState) -> Result<FormState, ValidationErrors> {
        Self::validator().validate(form).result()?;
        Ok(clean(form, &Self::filter_policy()))
    }
}

/// An editable record (profile, company, vacancy) loaded from and saved to
/// the backend.
pub trait EditForm {
    const RESOURCE_NAME: &'static str;

    /// Optional text fields stored as `null` when unset.
    fn nullable_fields() -> NullableFields;

    fn validator() -> RecordValidator;

    /// Transient fields and relational selectors of the form.
    /// Default declares none.
    #[must_use]
    fn selector_policy() -> FilterPolicy {
        FilterPolicy::new()
    }

    /// Turn a persisted record into form values.
    #[must_use]
    fn load(record: FormState) -> FormState {
        let mut form = record;
        Self::nullable_fields().load_into_form(&mut form);
        form
    }

    /// Validate form values and turn them into the patch sent on save.
    ///
    /// # Errors
    ///
    /// Returns every field that failed validation.
    fn save(form: &FormState) -> Result<FormState, ValidationErrors> {
        Self::validator().validate(form).result()?;
        let mut patch = form.clone();
        Self::nullable_fields().save_from_form(&mut patch);
        reshape(&mut patch, &Self::selector_policy());
        tracing::debug!(resource = Self::RESOURCE_NAME, fields = patch.len(), "prepared save patch");
        Ok(patch)
    }
}
