//! Conversion between form state and URL query parameters.
//!
//! Search pages mirror their filters into the URL so a search can be shared
//! or bookmarked. Every field declares how it travels through the query
//! string:
//!
//! | Kind     | Form value            | Query value              |
//! |----------|-----------------------|--------------------------|
//! | `Text`   | `"backend"`           | `backend`                |
//! | `Number` | `2500`                | `2500`                   |
//! | `Flag`   | `true`                | `true`                   |
//! | `Json`   | `[{"languageId": 1}]` | `[{"languageId":1}]`     |
//! | `IdList` | `["3", "8"]`          | `3,8`                    |
//!
//! The codec does not validate. A JSON field that fails to decode is an
//! error for the caller, not an empty filter.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::errors::CodecError;
use crate::models::{FormState, QueryMap};

/// How one field is written to and read from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryFieldKind {
    Text,
    Number,
    Flag,
    Json,
    IdList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryField {
    pub kind: QueryFieldKind,
    /// Value that is left out of the query string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl QueryField {
    #[must_use]
    pub fn new(kind: QueryFieldKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }
}

/// Declared query fields of one search form.
///
/// Keys that the schema does not declare are ignored in both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySchema {
    fields: BTreeMap<String, QueryField>,
}

impl QuerySchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: QueryFieldKind) -> Self {
        self.fields.insert(name.into(), QueryField::new(kind));
        self
    }

    #[must_use]
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, QueryFieldKind::Text)
    }

    #[must_use]
    pub fn number(self, name: impl Into<String>) -> Self {
        self.field(name, QueryFieldKind::Number)
    }

    #[must_use]
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.field(name, QueryFieldKind::Flag)
    }

    #[must_use]
    pub fn json(self, name: impl Into<String>) -> Self {
        self.field(name, QueryFieldKind::Json)
    }

    #[must_use]
    pub fn id_list(self, name: impl Into<String>) -> Self {
        self.field(name, QueryFieldKind::IdList)
    }

    /// Declare the value a field takes when it is not in the URL. Such values
    /// are not written to the query string.
    #[must_use]
    pub fn default_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(field) = self.fields.get_mut(name) {
            field.default = Some(value.into());
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryField> {
        self.fields.get(name)
    }

    /// Flatten form values into query parameters.
    ///
    /// Absent, `null` and default-valued fields produce no entry, nor does an
    /// empty identifier list or a blank number or flag.
    #[must_use]
    pub fn serialize(&self, form: &FormState) -> QueryMap {
        let mut query = QueryMap::new();

        for (name, value) in form {
            let Some(field) = self.fields.get(name) else {
                tracing::debug!(field = %name, "skipping undeclared form field");
                continue;
            };
            if value.is_null() || field.default.as_ref() == Some(value) {
                continue;
            }
            if value.as_str().is_some_and(|text| is_blank_scalar(field.kind, text)) {
                continue;
            }
            if let Some(encoded) = encode_value(field.kind, value) {
                query.insert(name.clone(), encoded);
            }
        }

        query
    }

    /// Read query parameters back into form values.
    ///
    /// Fields missing from `query` are missing from the result, and so are
    /// blank `Number` and `Flag` parameters; defaults are applied by
    /// [`merge_defaults`](crate::models::merge_defaults).
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when a `Json` field is not valid JSON, a
    /// `Number` field is not numeric or a `Flag` field is not a boolean.
    pub fn parse(&self, query: &QueryMap) -> Result<FormState, CodecError> {
        let mut form = FormState::new();

        for (name, raw) in query {
            let Some(field) = self.fields.get(name) else {
                tracing::debug!(field = %name, "skipping undeclared query parameter");
                continue;
            };
            if is_blank_scalar(field.kind, raw) {
                continue;
            }
            form.insert(name.clone(), decode_value(name, field.kind, raw)?);
        }

        Ok(form)
    }

    /// [`serialize`](Self::serialize) and URL-encode in one step.
    #[must_use]
    pub fn to_query_string(&self, form: &FormState) -> String {
        encode_query(&self.serialize(form))
    }

    /// URL-decode and [`parse`](Self::parse) in one step.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn from_query_string(&self, raw: &str) -> Result<FormState, CodecError> {
        self.parse(&decode_query(raw))
    }
}

/// An empty number or flag input means "not set", as sent by a plain form.
fn is_blank_scalar(kind: QueryFieldKind, raw: &str) -> bool {
    matches!(kind, QueryFieldKind::Number | QueryFieldKind::Flag) && raw.trim().is_empty()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn encode_value(kind: QueryFieldKind, value: &Value) -> Option<String> {
    match (kind, value) {
        (QueryFieldKind::IdList, Value::Array(ids)) => {
            let ids: Vec<String> = ids
                .iter()
                .filter_map(scalar_string)
                .filter(|id| !id.is_empty())
                .collect();
            if ids.is_empty() {
                None
            } else {
                Some(ids.join(","))
            }
        }
        (QueryFieldKind::Json, value) => Some(value.to_string()),
        (_, Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
        (_, value) => scalar_string(value),
    }
}

fn decode_value(name: &str, kind: QueryFieldKind, raw: &str) -> Result<Value, CodecError> {
    match kind {
        QueryFieldKind::Text => Ok(Value::String(raw.to_string())),
        QueryFieldKind::Number => parse_number(raw).ok_or_else(|| CodecError::InvalidNumber {
            field: name.to_string(),
            value: raw.to_string(),
        }),
        QueryFieldKind::Flag => match raw.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(CodecError::InvalidFlag {
                field: name.to_string(),
                value: raw.to_string(),
            }),
        },
        QueryFieldKind::Json => serde_json::from_str(raw).map_err(|source| {
            tracing::warn!(field = %name, error = %source, "query field holds malformed JSON");
            CodecError::MalformedJson {
                field: name.to_string(),
                source,
            }
        }),
        QueryFieldKind::IdList => Ok(Value::Array(
            raw.split(',')
                .filter(|id| !id.is_empty())
                .map(|id| Value::String(id.to_string()))
                .collect(),
        )),
    }
}

/// Integers stay integers; anything else numeric becomes a float.
fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::from(integer));
    }
    if let Ok(integer) = trimmed.parse::<u64>() {
        return Some(Value::from(integer));
    }
    let float = trimmed.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

/// Encode query parameters as an `application/x-www-form-urlencoded` string.
#[must_use]
pub fn encode_query(query: &QueryMap) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decode a raw URL query string. A leading `?` is accepted and the last
/// occurrence of a repeated key wins.
#[must_use]
pub fn decode_query(raw: &str) -> QueryMap {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> QuerySchema {
        QuerySchema::new()
            .number("page")
            .default_value("page", 1)
            .text("title")
            .text("workFormat")
            .number("minSalary")
            .flag("remote")
            .json("languages")
            .id_list("categoryIds")
    }

    fn form(value: Value) -> FormState {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_serialize_field_kinds() {
        let query = schema().serialize(&form(json!({
            "page": 1,
            "title": "Rust developer",
            "minSalary": 2500,
            "remote": true,
            "languages": [{"languageId": "en", "level": "ADVANCED"}],
            "categoryIds": ["3", 8],
            "workFormat": null,
        })));

        assert_eq!(query.get("page"), None, "default page is not written");
        assert_eq!(query.get("workFormat"), None);
        assert_eq!(query["title"], "Rust developer");
        assert_eq!(query["minSalary"], "2500");
        assert_eq!(query["remote"], "true");
        assert_eq!(query["categoryIds"], "3,8");
        assert_eq!(
            query["languages"],
            r#"[{"languageId":"en","level":"ADVANCED"}]"#
        );
    }

    #[test]
    fn test_empty_id_list_is_not_serialized() {
        let query = schema().serialize(&form(json!({"categoryIds": []})));
        assert!(query.is_empty());
    }

    #[test]
    fn test_undeclared_fields_are_ignored() {
        let query = schema().serialize(&form(json!({"newSkill": "Go"})));
        assert!(query.is_empty());

        let parsed = schema()
            .parse(&QueryMap::from([("utm_source".to_string(), "mail".to_string())]))
            .unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let original = form(json!({
            "page": 3,
            "title": "Data engineer",
            "workFormat": "REMOTE",
            "minSalary": 1200.5,
            "remote": false,
            "languages": [{"languageId": "uk", "levels": ["NATIVE"]}],
            "categoryIds": ["4", "15"],
        }));
        let parsed = schema().parse(&schema().serialize(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_leaves_missing_fields_out() {
        let parsed = schema().from_query_string("?title=qa").unwrap();
        assert_eq!(Value::Object(parsed), json!({"title": "qa"}));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = schema()
            .from_query_string("languages=%5B%7B%22languageId")
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedJson { ref field, .. } if field == "languages"));
    }

    #[test]
    fn test_invalid_number_and_flag() {
        assert!(matches!(
            schema().from_query_string("minSalary=lots"),
            Err(CodecError::InvalidNumber { .. })
        ));
        assert!(matches!(
            schema().from_query_string("remote=yes"),
            Err(CodecError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn test_blank_number_and_flag_are_absent() {
        let parsed = schema().from_query_string("title=rust&minSalary=&remote=%20").unwrap();
        assert_eq!(Value::Object(parsed), json!({"title": "rust"}));
    }

    #[test]
    fn test_blank_number_is_not_serialized() {
        let original = form(json!({"minSalary": "", "remote": " ", "title": ""}));
        let query = schema().serialize(&original);
        assert_eq!(query.get("minSalary"), None);
        assert_eq!(query.get("remote"), None);
        assert_eq!(query["title"], "");

        let parsed = schema().parse(&query).unwrap();
        assert_eq!(Value::Object(parsed), json!({"title": ""}));
    }

    #[test]
    fn test_id_list_blank_ids_are_skipped_both_ways() {
        let query = schema().serialize(&form(json!({"categoryIds": ["", "a", 7]})));
        assert_eq!(query["categoryIds"], "a,7");
        assert_eq!(schema().parse(&query).unwrap()["categoryIds"], json!(["a", "7"]));

        let query = schema().serialize(&form(json!({"categoryIds": [""]})));
        assert!(query.is_empty());
    }

    #[test]
    fn test_id_list_parse() {
        let parsed = schema().from_query_string("categoryIds=1%2C2%2C%2C3").unwrap();
        assert_eq!(parsed["categoryIds"], json!(["1", "2", "3"]));
    }

    #[test]
    fn test_query_string_is_ascii() {
        let encoded = schema().to_query_string(&form(json!({"title": "Розробник & QA"})));
        assert!(encoded.is_ascii());
        let parsed = schema().from_query_string(&encoded).unwrap();
        assert_eq!(parsed["title"], json!("Розробник & QA"));
    }

    #[test]
    fn test_schema_from_json_config() {
        let schema: QuerySchema = serde_json::from_value(json!({
            "page": {"kind": "number", "default": 1},
            "skillIds": {"kind": "idList"},
        }))
        .unwrap();
        assert_eq!(schema.get("skillIds").map(|f| f.kind), Some(QueryFieldKind::IdList));
        assert_eq!(
            schema,
            QuerySchema::new().number("page").default_value("page", 1).id_list("skillIds")
        );
    }
}
