pub mod core;
pub mod errors;
pub mod extract;
pub mod filtering;
pub mod models;
pub mod nullable;
pub mod pagination;
pub mod surfaces;
pub mod validation;

pub use crate::core::{EditForm, SearchSurface};
pub use errors::{ApiError, CodecError, ErrorResponse};
pub use extract::SearchQuery;
pub use filtering::{FilterPolicy, LanguageLevel, LevelRange, Ordinal, QuerySchema, clean};
pub use models::{FormState, PageRequest, QueryMap, merge_defaults};
pub use nullable::NullableFields;
pub use pagination::{Paginated, PaginationMeta, paginate};
pub use validation::{CrossFieldRule, RecordValidator, Rule, ValidationError, ValidationErrors};
