use serde_json::{Value, json};

use crate::core::SearchSurface;
use crate::filtering::cleaner::carries_no_signal;
use crate::filtering::{Fallback, FilterPolicy, QuerySchema};
use crate::models::FormState;
use crate::validation::{CrossFieldRule, RecordValidator, Rule, is_bigger_than};

/// Public vacancy search.
///
/// Salary bounds of `0` mean "any salary"; `experience = 0` is a real filter
/// for roles open to people without experience. `minSalary` starts at `0` so
/// that an upper bound alone still compares against a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct VacancySearch;

impl SearchSurface for VacancySearch {
    const RESOURCE_NAME: &'static str = "vacancies";

    fn query_schema() -> QuerySchema {
        QuerySchema::new()
            .number("page")
            .default_value("page", 1)
            .text("title")
            .text("workFormat")
            .id_list("categoryIds")
            .id_list("cityIds")
            .number("minSalary")
            .default_value("minSalary", 0)
            .number("maxSalary")
            .number("experience")
            .flag("withSalaryOnly")
            .json("languages")
    }

    fn filter_policy() -> FilterPolicy {
        FilterPolicy::new()
            .preserve_with("page", Fallback::PositiveInteger(1))
            .zero_is_unset("minSalary")
            .zero_is_unset("maxSalary")
            .drop_if_empty("experience")
            .always_drop("newCity")
    }

    fn defaults() -> FormState {
        let mut defaults = FormState::new();
        defaults.insert("page".into(), json!(1));
        defaults.insert("minSalary".into(), json!(0));
        defaults
    }

    fn validator() -> RecordValidator {
        RecordValidator::new()
            .optional("minSalary")
            .rule("minSalary", Rule::Range { min: Some(0.0), max: None })
            .optional("maxSalary")
            .rule("maxSalary", Rule::Range { min: Some(0.0), max: None })
            .cross(CrossFieldRule::new(
                "maxSalary",
                "minSalary",
                unbounded_or_bigger,
                "Must be greater than minSalary",
            ))
            .optional("experience")
            .rule("experience", Rule::Range { min: Some(0.0), max: Some(50.0) })
    }
}

/// An upper bound the cleaner would drop as unset is "no limit" and never
/// conflicts with the lower bound.
fn unbounded_or_bigger(max: &Value, min: &Value) -> bool {
    carries_no_signal(max, true) || is_bigger_than(max, min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_salary_means_any() {
        let form = VacancySearch::from_query("minSalary=0&experience=0&title=").unwrap();
        let payload = VacancySearch::prepare(&form).unwrap();
        assert_eq!(Value::Object(payload), json!({"page": 1, "experience": 0}));
    }

    #[test]
    fn test_inverted_salary_bounds_are_reported_on_max() {
        let form = VacancySearch::from_query("minSalary=3000&maxSalary=2000").unwrap();
        let errors = VacancySearch::prepare(&form).unwrap_err();
        assert_eq!(errors.get("maxSalary"), Some("Must be greater than minSalary"));
        assert!(!errors.contains("minSalary"));
    }

    #[test]
    fn test_upper_salary_bound_alone() {
        let form = VacancySearch::from_query("maxSalary=4000").unwrap();
        let payload = VacancySearch::prepare(&form).unwrap();
        assert_eq!(Value::Object(payload), json!({"page": 1, "maxSalary": 4000}));
    }

    #[test]
    fn test_zero_upper_bound_means_unbounded() {
        for upper in ["0", "0.0", ""] {
            let form = VacancySearch::from_query(&format!("minSalary=2000&maxSalary={upper}"))
                .unwrap();
            let payload = VacancySearch::prepare(&form).unwrap();
            assert_eq!(
                Value::Object(payload),
                json!({"page": 1, "minSalary": 2000}),
                "maxSalary={upper}"
            );
        }
    }

    #[test]
    fn test_default_page_is_not_written_to_url() {
        let form = VacancySearch::from_query("cityIds=2,5").unwrap();
        assert_eq!(form["page"], json!(1));
        assert_eq!(form["minSalary"], json!(0));
        assert_eq!(VacancySearch::to_query(&form), "cityIds=2%2C5");
    }
}
