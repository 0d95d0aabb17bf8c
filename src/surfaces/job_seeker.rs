use serde_json::json;

use crate::core::SearchSurface;
use crate::filtering::{Fallback, FilterPolicy, LanguageLevel, QuerySchema, Selector};
use crate::models::FormState;
use crate::validation::{RecordValidator, Rule};

/// Candidate search for recruiters.
///
/// Each language filter names a language and an optional proficiency band,
/// e.g. `{"language": {"id": "en"}, "minLevel": "INTERMEDIATE"}`. The band is
/// sent as the explicit list of accepted levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobSeekerSearch;

impl SearchSurface for JobSeekerSearch {
    const RESOURCE_NAME: &'static str = "job-seekers";

    fn query_schema() -> QuerySchema {
        QuerySchema::new()
            .number("page")
            .default_value("page", 1)
            .text("position")
            .id_list("skillIds")
            .id_list("cityIds")
            .number("experience")
            .number("maxExpectedSalary")
            .flag("openToWork")
            .json("languages")
    }

    fn filter_policy() -> FilterPolicy {
        FilterPolicy::new()
            .preserve_with("page", Fallback::PositiveInteger(1))
            .zero_is_unset("maxExpectedSalary")
            .always_drop("newLanguage")
            .selector("languages", Selector::level_range::<LanguageLevel>("language"))
    }

    fn defaults() -> FormState {
        let mut defaults = FormState::new();
        defaults.insert("page".into(), json!(1));
        defaults
    }

    fn validator() -> RecordValidator {
        RecordValidator::new()
            .optional("experience")
            .rule("experience", Rule::Range { min: Some(0.0), max: Some(50.0) })
            .optional("maxExpectedSalary")
            .rule("maxExpectedSalary", Rule::Range { min: Some(0.0), max: None })
    }
}
