use serde_json::json;

use crate::core::SearchSurface;
use crate::filtering::{Fallback, FilterPolicy, QuerySchema};
use crate::models::FormState;

/// Applications received by a recruiter.
///
/// `status` is forwarded whenever it is set, even to `""` (all statuses),
/// because the backend distinguishes an explicit "all" from no status
/// filter at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationSearch;

impl SearchSurface for ApplicationSearch {
    const RESOURCE_NAME: &'static str = "applications";

    fn query_schema() -> QuerySchema {
        QuerySchema::new()
            .number("page")
            .default_value("page", 1)
            .text("status")
            .text("vacancyId")
            .text("recruiterId")
            .text("jobSeekerId")
    }

    fn filter_policy() -> FilterPolicy {
        FilterPolicy::new()
            .preserve_with("page", Fallback::PositiveInteger(1))
            .preserve("status")
    }

    fn defaults() -> FormState {
        let mut defaults = FormState::new();
        defaults.insert("page".into(), json!(1));
        defaults
    }
}
