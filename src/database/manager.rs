use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::{Query, QueryScalar};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use tracing::info;

use super::store::{assign_id, Collection, DeleteResult, DocumentStore, InsertOneResult, StoreError, UpdateResult};
use super::Document;
use crate::config::AppConfig;
use crate::filter::{Filter, SqlParam, ID_FIELD};

/// PostgreSQL-backed document store: one table per collection, one JSONB
/// document per row.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Open the pool and make sure every collection table exists.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let connection_string = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect(&connection_string)
            .await?;

        let store = Self::open(pool).await?;

        info!("Connected document store to database '{}'", config.database.name);
        Ok(store)
    }

    /// Wrap an existing pool, creating any missing collection tables.
    pub async fn open(pool: PgPool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.ensure_collections().await?;
        Ok(store)
    }

    async fn ensure_collections(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    seq BIGSERIAL NOT NULL,
                    doc JSONB NOT NULL
                )",
                Self::quote_identifier(collection.name())
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let sql = filter.to_sql(collection.name());
        let rows: Vec<Json<Document>> = bind_scalar(sqlx::query_scalar::<Postgres, Json<Document>>(&sql.query), sql.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let mut first = filter.clone();
        first.limit(1, None);
        let sql = first.to_sql(collection.name());
        let row: Option<Json<Document>> = bind_scalar(sqlx::query_scalar::<Postgres, Json<Document>>(&sql.query), sql.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, StoreError> {
        let (key, id) = assign_id(&mut doc)?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", Self::quote_identifier(collection.name()));

        sqlx::query(&sql)
            .bind(&key)
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateId(key.clone()),
                other => StoreError::Sqlx(other),
            })?;

        Ok(InsertOneResult { acknowledged: true, inserted_id: id })
    }

    async fn upsert_one(&self, collection: Collection, id: &str, mut fields: Document) -> Result<UpdateResult, StoreError> {
        fields.insert(ID_FIELD.to_string(), serde_json::Value::String(id.to_string()));

        // No row back means the document exists and the merge changed nothing.
        // An existing document keeps its own `_id` value.
        let table = Self::quote_identifier(collection.name());
        let sql = format!(
            "INSERT INTO {table} (id, doc) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET doc = {table}.doc || (EXCLUDED.doc - '_id')
             WHERE ({table}.doc || (EXCLUDED.doc - '_id')) IS DISTINCT FROM {table}.doc
             RETURNING (xmax = 0) AS inserted"
        );

        let inserted: Option<bool> = sqlx::query_scalar::<Postgres, bool>(&sql)
            .bind(id)
            .bind(Json(fields))
            .fetch_optional(&self.pool)
            .await?;

        Ok(match inserted {
            Some(true) => UpdateResult::upserted(id),
            Some(false) => UpdateResult::matched(true),
            None => UpdateResult::matched(false),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
        let sql = filter.to_delete_one_sql(collection.name());
        let result = bind_query(sqlx::query::<Postgres>(&sql.query), sql.params).execute(&self.pool).await?;
        Ok(DeleteResult { acknowledged: true, deleted_count: result.rows_affected() })
    }

    async fn estimated_document_count(&self, collection: Collection) -> Result<u64, StoreError> {
        // Planner statistics; -1 or 0 until the table has been analyzed.
        let estimate: Option<i64> = sqlx::query_scalar::<Postgres, i64>("SELECT reltuples::BIGINT FROM pg_class WHERE oid = to_regclass($1)")
            .bind(collection.name())
            .fetch_optional(&self.pool)
            .await?;

        let count = match estimate {
            Some(n) if n > 0 => n,
            _ => {
                let sql = format!("SELECT count(*) FROM {}", Self::quote_identifier(collection.name()));
                sqlx::query_scalar::<Postgres, i64>(&sql).fetch_one(&self.pool).await?
            }
        };
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed document store pool");
    }
}

fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: Vec<SqlParam>,
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s),
            SqlParam::Json(v) => query.bind(Json(v)),
            SqlParam::Int(i) => query.bind(i),
        };
    }
    query
}

fn bind_query<'q>(mut query: Query<'q, Postgres, PgArguments>, params: Vec<SqlParam>) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s),
            SqlParam::Json(v) => query.bind(Json(v)),
            SqlParam::Int(i) => query.bind(i),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(PgDocumentStore::quote_identifier("foods"), "\"foods\"");
        assert_eq!(PgDocumentStore::quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
