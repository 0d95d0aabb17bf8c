//! Axum extractor that decodes a search page's query string.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::marker::PhantomData;

use crate::core::SearchSurface;
use crate::errors::ApiError;
use crate::models::FormState;

/// Form state of surface `S`, read from the request URL with defaults
/// applied.
///
/// Rejects with `400 Bad Request` when a structured field cannot be decoded.
/// Validation is left to [`payload`](Self::payload) so handlers can still
/// echo the raw form back.
#[derive(Debug, Clone)]
pub struct SearchQuery<S> {
    pub form: FormState,
    surface: PhantomData<fn() -> S>,
}

impl<S: SearchSurface> SearchQuery<S> {
    #[must_use]
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            surface: PhantomData,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> FormState {
        self.form
    }

    /// Validate and clean the form into the payload for the search backend.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ValidationFailed`] listing every invalid field.
    pub fn payload(&self) -> Result<FormState, ApiError> {
        Ok(S::prepare(&self.form)?)
    }

    /// The canonical query string for the current form, suitable for a
    /// redirect or a share link.
    #[must_use]
    pub fn canonical_query(&self) -> String {
        S::to_query(&self.form)
    }
}

impl<S, St> FromRequestParts<St> for SearchQuery<S>
where
    S: SearchSurface,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default();
        let form = S::from_query(raw)?;
        tracing::debug!(resource = S::RESOURCE_NAME, fields = form.len(), "decoded search query");
        Ok(Self::new(form))
    }
}
