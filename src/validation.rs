//! Validation Support
//!
//! Form validation never fails loudly: every problem becomes one message
//! attached to one field, and the caller decides whether to block the
//! submission.
//!
//! Rules are declared per field on a [`RecordValidator`]. Relations between
//! two fields are expressed as a [`CrossFieldRule`] that looks both fields up
//! by name when the record is validated, so the same rule works for any
//! record shape.
//!
//! # Example
//!
//! ```rust
//! use hirequery::validation::{CrossFieldRule, RecordValidator, Rule};
//! use serde_json::json;
//!
//! let validator = RecordValidator::new()
//!     .rule("title", Rule::Required)
//!     .rule("title", Rule::MinLength(3))
//!     .cross(CrossFieldRule::bigger_than("maxSalary", "minSalary"));
//!
//! let record = json!({"title": "QA", "minSalary": 3000, "maxSalary": 3000});
//! let errors = validator.validate(record.as_object().unwrap());
//!
//! assert_eq!(errors.get("title"), Some("Must be at least 3 characters"));
//! assert_eq!(errors.get("maxSalary"), Some("Must be greater than minSalary"));
//! assert_eq!(errors.get("minSalary"), None);
//! ```

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::FormState;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Field name to message, at most one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error. A field that already has a message keeps it.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.entry(error.field).or_insert(error.message);
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of fields with errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message attached to `field`, if any
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (field, message) in &self.errors {
            write!(f, "\n  - {field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A constraint on a single field, checked in isolation.
///
/// Apart from [`Rule::Required`], rules pass when the value is absent or
/// `null`; combine them with `Required` for mandatory fields.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Range { min: Option<f64>, max: Option<f64> },
    Pattern { regex: Regex, message: String },
    Email,
    /// 2-30 letters, spaces, apostrophes or hyphens
    Name,
}

impl Rule {
    /// Build a [`Rule::Pattern`] from a regular expression.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error for an invalid pattern.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Check `value` as the content of `field`.
    ///
    /// # Errors
    ///
    /// Returns the single message this rule produces for the field.
    pub fn check(&self, field: &str, value: Option<&Value>) -> Result<(), ValidationError> {
        if let Self::Required = self {
            return validators::validate_present(field, value);
        }

        let Some(value) = value.filter(|value| !value.is_null()) else {
            return Ok(());
        };

        match self {
            Self::Required => Ok(()),
            Self::MinLength(min) => {
                validators::validate_length(field, as_text(field, value)?, Some(*min), None)
            }
            Self::MaxLength(max) => {
                validators::validate_length(field, as_text(field, value)?, None, Some(*max))
            }
            Self::Range { min, max } => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| ValidationError::new(field, "Must be a number"))?;
                validators::validate_range(field, number, *min, *max)
            }
            Self::Pattern { regex, message } => {
                if regex.is_match(as_text(field, value)?) {
                    Ok(())
                } else {
                    Err(ValidationError::new(field, message.clone()))
                }
            }
            Self::Email => validators::validate_email(field, as_text(field, value)?),
            Self::Name => validators::validate_name(field, as_text(field, value)?),
        }
    }
}

fn as_text<'a>(field: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, "Must be text"))
}

/// Predicate over the target and sibling values of a [`CrossFieldRule`].
pub type Predicate = fn(&Value, &Value) -> bool;

/// A constraint relating a target field to a sibling field of the same record.
///
/// Failures are always reported on the target field.
#[derive(Debug, Clone)]
pub struct CrossFieldRule {
    pub target: String,
    pub sibling: String,
    predicate: Predicate,
    message: String,
}

impl CrossFieldRule {
    pub fn new(
        target: impl Into<String>,
        sibling: impl Into<String>,
        predicate: Predicate,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            sibling: sibling.into(),
            predicate,
            message: message.into(),
        }
    }

    /// `target` must be a number strictly greater than the number in `sibling`.
    pub fn bigger_than(target: impl Into<String>, sibling: impl Into<String>) -> Self {
        let sibling = sibling.into();
        let message = format!("Must be greater than {sibling}");
        Self::new(target, sibling, is_bigger_than, message)
    }

    /// Check the rule against `record`.
    ///
    /// # Errors
    ///
    /// Returns an error on the target field when the predicate fails,
    /// including when either field is missing.
    pub fn check(&self, record: &FormState) -> Result<(), ValidationError> {
        let target = record.get(&self.target).unwrap_or(&Value::Null);
        let sibling = record.get(&self.sibling).unwrap_or(&Value::Null);
        if (self.predicate)(target, sibling) {
            Ok(())
        } else {
            Err(ValidationError::new(&self.target, &self.message))
        }
    }
}

/// Both values are finite numbers and `value > other`.
#[must_use]
pub fn is_bigger_than(value: &Value, other: &Value) -> bool {
    match (value.as_f64(), other.as_f64()) {
        (Some(value), Some(other)) => value.is_finite() && other.is_finite() && value > other,
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
struct FieldRules {
    optional: bool,
    rules: Vec<Rule>,
}

/// Declared rules of one record type, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    fields: BTreeMap<String, FieldRules>,
    cross: Vec<CrossFieldRule>,
}

impl RecordValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to `field`. Rules run in the order they were added.
    #[must_use]
    pub fn rule(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.fields.entry(field.into()).or_default().rules.push(rule);
        self
    }

    /// Skip every rule of `field`, cross-field rules included, while it is
    /// absent, `null` or blank.
    #[must_use]
    pub fn optional(mut self, field: impl Into<String>) -> Self {
        self.fields.entry(field.into()).or_default().optional = true;
        self
    }

    #[must_use]
    pub fn cross(mut self, rule: CrossFieldRule) -> Self {
        self.cross.push(rule);
        self
    }

    fn skips(&self, field: &str, record: &FormState) -> bool {
        self.fields
            .get(field)
            .is_some_and(|rules| rules.optional && is_blank(record.get(field)))
    }

    /// Validate `record`; it is valid iff the returned mapping is empty.
    #[must_use]
    pub fn validate(&self, record: &FormState) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for (field, field_rules) in &self.fields {
            if self.skips(field, record) {
                continue;
            }
            let value = record.get(field);
            if let Some(error) = field_rules
                .rules
                .iter()
                .find_map(|rule| rule.check(field, value).err())
            {
                errors.add(error);
            }
        }

        for rule in &self.cross {
            if errors.contains(&rule.target) || self.skips(&rule.target, record) {
                continue;
            }
            if let Err(error) = rule.check(record) {
                errors.add(error);
            }
        }

        errors
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use regex::Regex;
    use serde_json::Value;
    use std::fmt;
    use std::sync::LazyLock;

    static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[\p{L} '\-]{2,30}$").expect("name pattern is a valid regex")
    });

    static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    });

    /// Validate string length (in characters) is within range
    ///
    /// # Errors
    ///
    /// Returns an error when the length falls outside the bounds.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Returns an error when the value falls outside the bounds.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_val}"),
            ));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_val}"),
            ));
        }

        Ok(())
    }

    /// Email validation; surrounding whitespace is ignored
    ///
    /// # Errors
    ///
    /// Returns an error for anything not shaped like `local@domain.tld`.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();

        if !EMAIL_PATTERN.is_match(value) {
            return Err(ValidationError::new(field, "Invalid email format"));
        }

        if value.len() > 255 {
            return Err(ValidationError::new(
                field,
                "Email must be at most 255 characters",
            ));
        }

        Ok(())
    }

    /// Person or company name: 2-30 letters, spaces, apostrophes or hyphens
    ///
    /// # Errors
    ///
    /// Returns an error when the value does not match.
    pub fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
        if NAME_PATTERN.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                "Must be 2-30 letters, spaces, apostrophes or hyphens",
            ))
        }
    }

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Returns an error for blank text.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }

    /// Validate a form value is present: not missing, `null`, blank text or
    /// an empty list
    ///
    /// # Errors
    ///
    /// Returns an error when the value carries nothing.
    pub fn validate_present(field: &str, value: Option<&Value>) -> Result<(), ValidationError> {
        match value {
            None | Some(Value::Null) => Err(ValidationError::new(field, "This field is required")),
            Some(Value::String(text)) => validate_required(field, text),
            Some(Value::Array(items)) if items.is_empty() => {
                Err(ValidationError::new(field, "This field is required"))
            }
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> FormState {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validation_error_creation() {
        let err = ValidationError::new("email", "Invalid email");
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email");
    }

    #[test]
    fn test_validation_errors_keep_first_message_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add(ValidationError::new("field1", "error1"));
        errors.add(ValidationError::new("field1", "error2"));
        errors.add(ValidationError::new("field2", "error3"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("field1"), Some("error1"));
        assert!(errors.clone().result().is_err());
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"field1": "error1", "field2": "error3"})
        );
    }

    #[test]
    fn test_validate_length() {
        use validators::validate_length;

        assert!(validate_length("name", "ab", Some(3), None).is_err());
        assert!(validate_length("name", "abcdef", None, Some(5)).is_err());
        assert!(validate_length("name", "abc", Some(3), Some(5)).is_ok());
        // counted in characters, not bytes
        assert!(validate_length("name", "Їжак", None, Some(4)).is_ok());
    }

    #[test]
    fn test_validate_range() {
        use validators::validate_range;

        assert!(validate_range("age", 5, Some(10), None).is_err());
        assert!(validate_range("age", 150, None, Some(120)).is_err());
        assert!(validate_range("age", 25, Some(0), Some(120)).is_ok());
    }

    #[test]
    fn test_validate_email() {
        use validators::validate_email;

        assert!(validate_email("email", "invalid").is_err());
        assert!(validate_email("email", "a@b").is_err());
        assert!(validate_email("email", "two words@example.com").is_err());
        assert!(validate_email("email", "test@example.com").is_ok());
        assert!(validate_email("email", "  test@example.com  ").is_ok());
    }

    #[test]
    fn test_validate_name() {
        use validators::validate_name;

        assert!(validate_name("firstName", "Anne-Marie").is_ok());
        assert!(validate_name("firstName", "O'Neil").is_ok());
        assert!(validate_name("firstName", "Олена").is_ok());
        assert!(validate_name("firstName", "J").is_err());
        assert!(validate_name("firstName", "R2D2").is_err());
        assert!(validate_name("firstName", &"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_required() {
        use validators::{validate_present, validate_required};

        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", "John").is_ok());

        assert!(validate_present("skills", None).is_err());
        assert!(validate_present("skills", Some(&json!([]))).is_err());
        assert!(validate_present("count", Some(&json!(0))).is_ok());
    }

    #[test]
    fn test_bigger_than_rule() {
        let rule = CrossFieldRule::bigger_than("max", "min");

        assert!(rule.check(&record(json!({"min": 1, "max": 2}))).is_ok());
        assert!(rule.check(&record(json!({"min": 1.5, "max": 1.75}))).is_ok());

        for failing in [
            json!({"min": 2, "max": 2}),
            json!({"min": 3, "max": 2}),
            json!({"min": 1}),
            json!({"max": 2}),
            json!({"min": "1", "max": 2}),
            json!({"min": 1, "max": "2"}),
            json!({"min": null, "max": 2}),
        ] {
            let err = rule.check(&record(failing.clone())).unwrap_err();
            assert_eq!(err.field, "max", "{failing}");
        }
    }

    #[test]
    fn test_custom_cross_field_predicate() {
        fn same_text(value: &Value, other: &Value) -> bool {
            value.as_str().is_some() && value == other
        }

        let validator = RecordValidator::new().cross(CrossFieldRule::new(
            "passwordConfirmation",
            "password",
            same_text,
            "Passwords do not match",
        ));

        let errors = validator.validate(&record(json!({
            "password": "secret",
            "passwordConfirmation": "secrte",
        })));
        assert_eq!(errors.get("passwordConfirmation"), Some("Passwords do not match"));
        assert!(!errors.contains("password"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let validator = RecordValidator::new()
            .rule("lastName", Rule::Required)
            .rule("lastName", Rule::Name);

        let errors = validator.validate(&record(json!({"lastName": ""})));
        assert_eq!(errors.get("lastName"), Some("This field is required"));

        let errors = validator.validate(&record(json!({"lastName": "X"})));
        assert_eq!(
            errors.get("lastName"),
            Some("Must be 2-30 letters, spaces, apostrophes or hyphens")
        );
    }

    #[test]
    fn test_optional_fields_skip_rules_when_blank() {
        let validator = RecordValidator::new()
            .optional("maxSalary")
            .rule("maxSalary", Rule::Range { min: Some(0.0), max: None })
            .cross(CrossFieldRule::bigger_than("maxSalary", "minSalary"));

        assert!(validator.validate(&record(json!({"minSalary": 1000}))).is_empty());
        assert!(validator.validate(&record(json!({"maxSalary": ""}))).is_empty());

        let errors = validator.validate(&record(json!({"maxSalary": 500})));
        assert_eq!(errors.get("maxSalary"), Some("Must be greater than minSalary"));

        let errors = validator.validate(&record(json!({"maxSalary": -1, "minSalary": -5})));
        assert_eq!(errors.get("maxSalary"), Some("Must be at least 0"));
    }

    #[test]
    fn test_pattern_rule() {
        let rule = Rule::pattern(r"^https?://", "Must be a link").unwrap();
        assert!(rule.check("website", Some(&json!("https://example.com"))).is_ok());
        assert!(rule.check("website", Some(&json!("example.com"))).is_err());
        assert!(rule.check("website", None).is_ok());
        assert!(rule.check("website", Some(&json!(42))).is_err());
        assert!(Rule::pattern("(", "broken").is_err());
    }

    #[test]
    fn test_record_is_valid_when_mapping_is_empty() {
        let validator = RecordValidator::new()
            .rule("email", Rule::Required)
            .rule("email", Rule::Email);
        let errors = validator.validate(&record(json!({"email": " hr@example.com "})));
        assert!(errors.result().is_ok());
    }
}
