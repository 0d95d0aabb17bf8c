use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// In-memory values of one search or edit form, keyed by field name.
pub type FormState = Map<String, Value>;

/// Flat string-keyed, string-valued query representation of a form.
pub type QueryMap = BTreeMap<String, String>;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_PER_PAGE: u64 = 10;

/// Merge values parsed from a URL over a form's defaults.
///
/// Parsed values win key by key; defaults fill everything the URL did not
/// mention.
#[must_use]
pub fn merge_defaults(defaults: &FormState, parsed: FormState) -> FormState {
    let mut merged = defaults.clone();
    merged.extend(parsed);
    merged
}

/// Page selection for list endpoints.
///
/// # Pagination
/// Pages are 1-based, for example `page=2&perPage=25`. Missing values fall
/// back to page 1 with 10 items per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-based).
    ///
    /// Example: `1`
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: u64,
    /// Number of items per page.
    ///
    /// Example: `10`
    #[serde(default = "default_per_page")]
    #[param(example = 10)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Rows to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.per_page.max(1)
    }
}
