use std::cmp::Ordering;

use serde_json::Value;

use super::types::{FilterOrderInfo, SortDirection, SqlParam};
use crate::database::Document;

pub struct FilterOrder;

impl FilterOrder {
    /// `ORDER BY` over JSONB fields, falling back to insertion order so that
    /// equal keys page deterministically.
    pub fn generate(infos: &[FilterOrderInfo], params: &mut Vec<SqlParam>) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|info| {
                params.push(SqlParam::Text(info.field.clone()));
                format!("doc -> ${} {}", params.len(), info.sort.to_sql())
            })
            .collect();
        parts.push("seq ASC".to_string());
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Stable in-memory sort matching the SQL ordering.
    pub fn sort(infos: &[FilterOrderInfo], docs: &mut [Document]) {
        if infos.is_empty() {
            return;
        }
        docs.sort_by(|a, b| {
            for info in infos {
                let ordering = compare_fields(a.get(&info.field), b.get(&info.field), info.sort);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
}

// Missing and null sort first ascending and last descending.
fn compare_fields(a: Option<&Value>, b: Option<&Value>, sort: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => match sort {
            SortDirection::Asc => Ordering::Less,
            SortDirection::Desc => Ordering::Greater,
        },
        (Some(_), None) => match sort {
            SortDirection::Asc => Ordering::Greater,
            SortDirection::Desc => Ordering::Less,
        },
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}
