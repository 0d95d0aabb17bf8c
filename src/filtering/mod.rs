//! # Filter Normalization
//!
//! A search form's state travels through three shapes:
//!
//! 1. **Query string** - what the URL holds, so searches can be bookmarked.
//! 2. **Form state** - what the page edits, a JSON object per form.
//! 3. **Request payload** - what the search API receives.
//!
//! ## Main Components
//!
//! - **[`QuerySchema`]**: query string ↔ form state
//! - **[`clean`]**: form state → request payload, driven by a [`FilterPolicy`]
//! - **[`ordinal`]**: expands ordinal ranges (language levels) into the exact
//!   values a backend `IN` filter needs
//! - **[`conditions`]**: `IN` conditions for the expanded values
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Scalars as-is, defaults omitted
//! GET /vacancies?title=rust&minSalary=2000
//!
//! // Identifier lists are comma-joined
//! GET /vacancies?categoryIds=3,8,11
//!
//! // Structured fields are JSON-encoded in a single parameter
//! GET /job-seekers?languages=[{"language":{"id":"en"},"minLevel":"INTERMEDIATE"}]
//! ```

pub mod cleaner;
pub mod conditions;
pub mod ordinal;
pub mod query;

pub use cleaner::{Fallback, FieldPolicy, FilterPolicy, Selector, clean, reshape};
pub use conditions::{ids_in_condition, level_in_condition};
pub use ordinal::{LanguageLevel, LevelRange, Ordinal, expand};
pub use query::{QueryField, QueryFieldKind, QuerySchema, decode_query, encode_query};
