use serde_json::Value;

use super::types::{FilterOp, FilterWhereInfo, SqlParam, ID_FIELD};
use crate::database::{id_key, Document};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions as a SQL predicate over the `doc` JSONB column.
    pub fn generate(conditions: &[FilterWhereInfo], starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        let sql_conditions: Vec<String> = conditions
            .iter()
            .map(|condition| filter_where.build_sql_condition(condition))
            .collect();

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, filter_where.param_values)
    }

    /// Evaluate conditions against an in-memory document.
    pub fn matches(conditions: &[FilterWhereInfo], doc: &Document) -> bool {
        conditions.iter().all(|condition| Self::matches_condition(condition, doc))
    }

    fn matches_condition(condition: &FilterWhereInfo, doc: &Document) -> bool {
        let field = doc.get(&condition.field);
        match condition.operator {
            FilterOp::Eq => {
                if let (ID_FIELD, Value::String(key)) = (condition.field.as_str(), &condition.data) {
                    return field.and_then(id_key).as_deref() == Some(key.as_str());
                }
                if condition.data.is_null() {
                    field.map_or(true, Value::is_null)
                } else {
                    field == Some(&condition.data)
                }
            }
            FilterOp::IContains => {
                let needle = condition.data.as_str().unwrap_or_default().to_lowercase();
                field
                    .and_then(Value::as_str)
                    .map_or(false, |haystack| haystack.to_lowercase().contains(&needle))
            }
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        match condition.operator {
            FilterOp::Eq => {
                if condition.field == ID_FIELD {
                    if let Value::String(id) = &condition.data {
                        return format!("id = {}", self.param(SqlParam::Text(id.clone())));
                    }
                }
                let key = self.param(SqlParam::Text(condition.field.clone()));
                if condition.data.is_null() {
                    format!("(doc -> {} IS NULL OR doc -> {} = 'null'::jsonb)", key, key)
                } else {
                    let value = self.param(SqlParam::Json(condition.data.clone()));
                    format!("doc -> {} = {}", key, value)
                }
            }
            FilterOp::IContains => {
                let key = self.param(SqlParam::Text(condition.field.clone()));
                let needle = match &condition.data {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let needle = self.param(SqlParam::Text(needle));
                format!(
                    "(jsonb_typeof(doc -> {key}) = 'string' AND strpos(lower(doc ->> {key}), lower({needle})) > 0)"
                )
            }
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
