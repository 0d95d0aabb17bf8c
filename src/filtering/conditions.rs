use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use serde_json::Value;

use super::ordinal::{LevelRange, Ordinal};

/// Build an `IN` condition matching every level inside `range`.
///
/// An inverted range expands to no levels, which renders as a condition that
/// matches no rows.
#[must_use]
pub fn level_in_condition<T: Ordinal>(column: &str, range: &LevelRange<T>) -> SimpleExpr {
    let levels: Vec<String> = range
        .expand()
        .into_iter()
        .map(|level| level.as_str().to_string())
        .collect();
    Expr::col(Alias::new(column)).is_in(levels)
}

/// Build an `IN` condition from a cleaned identifier list.
///
/// Returns `None` when the list holds no usable identifiers, meaning "no
/// filter" rather than "match nothing".
#[must_use]
pub fn ids_in_condition(column: &str, ids: &[Value]) -> Option<SimpleExpr> {
    let in_values: Vec<String> = ids
        .iter()
        .filter_map(|id| match id {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();

    if in_values.is_empty() {
        return None;
    }
    Some(Expr::col(Alias::new(column)).is_in(in_values))
}
