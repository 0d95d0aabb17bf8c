use axum::{Json, Router, routing::get};
use hirequery::surfaces::{JobSeekerProfileForm, VacancySearch};
use hirequery::{ApiError, EditForm, FormState, PageRequest, Paginated, SearchQuery};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Once;

pub const PER_PAGE: u64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vacancy {
    pub id: u32,
    pub title: String,
    pub min_salary: u64,
}

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn vacancies() -> Vec<Vacancy> {
    [
        (1, "Rust engineer", 4000),
        (2, "Backend engineer (Rust)", 3000),
        (3, "QA engineer", 1500),
        (4, "Senior Rust developer", 6000),
        (5, "Data analyst", 2500),
    ]
    .into_iter()
    .map(|(id, title, min_salary)| Vacancy {
        id,
        title: title.to_string(),
        min_salary,
    })
    .collect()
}

async fn search_payload(query: SearchQuery<VacancySearch>) -> Result<Json<Value>, ApiError> {
    let payload = query.payload()?;
    Ok(Json(json!({
        "payload": payload,
        "query": query.canonical_query(),
    })))
}

async fn search_vacancies(
    query: SearchQuery<VacancySearch>,
) -> Result<Paginated<Vacancy>, ApiError> {
    let payload = query.payload()?;
    let title = payload
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_lowercase);
    let min_salary = payload.get("minSalary").and_then(Value::as_u64).unwrap_or(0);
    let page = payload.get("page").and_then(Value::as_u64).unwrap_or(1);

    let matching: Vec<Vacancy> = vacancies()
        .into_iter()
        .filter(|vacancy| {
            title
                .as_deref()
                .is_none_or(|title| vacancy.title.to_lowercase().contains(title))
        })
        .filter(|vacancy| vacancy.min_salary >= min_salary)
        .collect();

    let request = PageRequest::new(page, PER_PAGE);
    let total = matching.len() as u64;
    let data = matching
        .into_iter()
        .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(request.limit()).unwrap_or(usize::MAX))
        .collect();

    Ok(Paginated::new(data, total, request))
}

async fn save_profile(Json(form): Json<FormState>) -> Result<Json<FormState>, ApiError> {
    Ok(Json(JobSeekerProfileForm::save(&form)?))
}

pub fn setup_test_app() -> Router {
    init_tracing();

    let api = Router::new()
        .route("/vacancies", get(search_vacancies))
        .route("/vacancies/payload", get(search_payload))
        .route("/profile", axum::routing::put(save_profile));

    Router::new().nest("/api/v1", api)
}
