use serde_json::json;

use crate::core::SearchSurface;
use crate::filtering::{Fallback, FilterPolicy, QuerySchema};
use crate::models::FormState;

/// Company directory search.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanySearch;

impl SearchSurface for CompanySearch {
    const RESOURCE_NAME: &'static str = "companies";

    fn query_schema() -> QuerySchema {
        QuerySchema::new()
            .number("page")
            .default_value("page", 1)
            .text("name")
            .id_list("industryIds")
            .id_list("cityIds")
            .number("minEmployees")
            .flag("hiringOnly")
            .default_value("hiringOnly", false)
    }

    fn filter_policy() -> FilterPolicy {
        FilterPolicy::new()
            .preserve_with("page", Fallback::PositiveInteger(1))
            .zero_is_unset("minEmployees")
    }

    fn defaults() -> FormState {
        let mut defaults = FormState::new();
        defaults.insert("page".into(), json!(1));
        defaults.insert("hiringOnly".into(), json!(false));
        defaults
    }
}
