use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, SortDirection, SqlParam, SqlResult, ID_FIELD};
use crate::database::Document;

/// Collection query: conditions plus cursor modifiers (sort, skip, limit).
///
/// A limit of zero means "no limit", as with document-store cursors.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self {
            conditions: vec![FilterWhereInfo {
                field: ID_FIELD.to_string(),
                operator: FilterOp::Eq,
                data: Value::String(id.to_string()),
            }],
            ..Self::default()
        }
    }

    pub fn where_eq(&mut self, field: &str, value: Value) -> Result<&mut Self, FilterError> {
        Self::validate_field(field)?;
        self.conditions.push(FilterWhereInfo { field: field.to_string(), operator: FilterOp::Eq, data: value });
        Ok(self)
    }

    pub fn where_icontains(&mut self, field: &str, text: &str) -> Result<&mut Self, FilterError> {
        Self::validate_field(field)?;
        self.conditions.push(FilterWhereInfo {
            field: field.to_string(),
            operator: FilterOp::IContains,
            data: Value::String(text.to_string()),
        });
        Ok(self)
    }

    pub fn order(&mut self, field: &str, sort: SortDirection) -> Result<&mut Self, FilterError> {
        Self::validate_field(field)?;
        self.order_data.push(FilterOrderInfo { field: field.to_string(), sort });
        Ok(self)
    }

    pub fn limit(&mut self, limit: u64, offset: Option<u64>) -> &mut Self {
        self.limit = Some(limit).filter(|l| *l > 0);
        self.offset = offset.filter(|o| *o > 0);
        self
    }

    /// `SELECT` returning the matching documents of `table`.
    pub fn to_sql(&self, table: &str) -> SqlResult {
        let (where_clause, mut params) = FilterWhere::generate(&self.conditions, 0);
        let order_clause = FilterOrder::generate(&self.order_data, &mut params);

        let mut query = format!("SELECT doc FROM \"{}\" WHERE {} {}", table, where_clause, order_clause);
        if let Some(limit) = self.limit {
            params.push(SqlParam::Int(clamp(limit)));
            query.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if let Some(offset) = self.offset {
            params.push(SqlParam::Int(clamp(offset)));
            query.push_str(&format!(" OFFSET ${}", params.len()));
        }

        SqlResult { query, params }
    }

    /// `DELETE` of the first matching document of `table`.
    pub fn to_delete_one_sql(&self, table: &str) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0);
        let query = format!(
            "DELETE FROM \"{table}\" WHERE id IN (SELECT id FROM \"{table}\" WHERE {where_clause} ORDER BY seq ASC LIMIT 1)"
        );
        SqlResult { query, params }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        FilterWhere::matches(&self.conditions, doc)
    }

    /// Apply the whole query to an in-memory collection.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut matched: Vec<Document> = docs.into_iter().filter(|doc| self.matches(doc)).cloned().collect();
        FilterOrder::sort(&self.order_data, &mut matched);

        let offset = usize::try_from(self.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = self.limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    fn validate_field(field: &str) -> Result<(), FilterError> {
        if field.is_empty() || field.starts_with('$') || field.contains('\0') {
            return Err(FilterError::InvalidField(field.to_string()));
        }
        Ok(())
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
