//! Edit forms for records owned by a user.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::EditForm;
use crate::filtering::{FilterPolicy, Selector};
use crate::nullable::NullableFields;
use crate::validation::{CrossFieldRule, RecordValidator, Rule};

static WEBSITE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("website pattern is a valid regex"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").expect("phone pattern is a valid regex"));

fn website_rule() -> Rule {
    Rule::Pattern {
        regex: WEBSITE_REGEX.clone(),
        message: "Must be a link starting with http:// or https://".to_string(),
    }
}

fn phone_rule() -> Rule {
    Rule::Pattern {
        regex: PHONE_REGEX.clone(),
        message: "Invalid phone number".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyProfileForm;

impl EditForm for CompanyProfileForm {
    const RESOURCE_NAME: &'static str = "company-profile";

    fn nullable_fields() -> NullableFields {
        NullableFields::new()
            .field("website")
            .field("description")
            .field("phone")
            .field("logoUrl")
    }

    fn validator() -> RecordValidator {
        RecordValidator::new()
            .rule("name", Rule::Required)
            .rule("name", Rule::MinLength(2))
            .rule("name", Rule::MaxLength(100))
            .rule("email", Rule::Required)
            .rule("email", Rule::Email)
            .optional("website")
            .rule("website", website_rule())
            .optional("phone")
            .rule("phone", phone_rule())
    }
}

/// A candidate's own profile. Skills and languages are picked from
/// dictionaries and saved as identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobSeekerProfileForm;

impl EditForm for JobSeekerProfileForm {
    const RESOURCE_NAME: &'static str = "job-seeker-profile";

    fn nullable_fields() -> NullableFields {
        ["phone", "about", "linkedin", "github", "position"]
            .into_iter()
            .collect()
    }

    fn validator() -> RecordValidator {
        RecordValidator::new()
            .rule("firstName", Rule::Required)
            .rule("firstName", Rule::Name)
            .rule("lastName", Rule::Required)
            .rule("lastName", Rule::Name)
            .rule("email", Rule::Required)
            .rule("email", Rule::Email)
            .optional("phone")
            .rule("phone", phone_rule())
            .optional("linkedin")
            .rule("linkedin", website_rule())
            .optional("github")
            .rule("github", website_rule())
            .optional("experience")
            .rule("experience", Rule::Range { min: Some(0.0), max: Some(50.0) })
    }

    fn selector_policy() -> FilterPolicy {
        FilterPolicy::new()
            .always_drop("newSkill")
            .always_drop("newLanguage")
            .selector("skills", Selector::bare_id("skill"))
            .selector("languages", Selector::inline("language"))
    }
}

/// A vacancy as edited by a recruiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct VacancyForm;

impl EditForm for VacancyForm {
    const RESOURCE_NAME: &'static str = "vacancy";

    fn nullable_fields() -> NullableFields {
        NullableFields::new().field("description").field("workFormat")
    }

    fn validator() -> RecordValidator {
        RecordValidator::new()
            .rule("title", Rule::Required)
            .rule("title", Rule::MinLength(3))
            .rule("title", Rule::MaxLength(120))
            .rule("minSalary", Rule::Required)
            .rule("minSalary", Rule::Range { min: Some(0.0), max: None })
            .optional("maxSalary")
            .rule("maxSalary", Rule::Range { min: Some(0.0), max: None })
            .cross(CrossFieldRule::bigger_than("maxSalary", "minSalary"))
    }

    fn selector_policy() -> FilterPolicy {
        FilterPolicy::new()
            .always_drop("newSkill")
            .always_drop("newLanguage")
            .selector("skills", Selector::bare_id("skill"))
            .selector("languages", Selector::inline("language"))
    }
}
