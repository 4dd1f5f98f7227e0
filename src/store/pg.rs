//! PostgreSQL-backed store using table bindings from the web config.

use crate::config::TableSpec;
use crate::error::AppError;
use crate::model::Instance;
use crate::sql::{bind_all, delete, insert, parse_pk, select_all, select_by_pk, update, QueryBuf};
use crate::store::Store;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    tables: HashMap<String, TableSpec>,
}

impl PgStore {
    pub fn new(pool: PgPool, tables: HashMap<String, TableSpec>) -> Self {
        PgStore { pool, tables }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn table(&self, kind: &str) -> Result<&TableSpec, AppError> {
        self.tables
            .get(kind)
            .ok_or_else(|| AppError::NotRegistered(kind.to_string()))
    }

    fn pk_value(table: &TableSpec, instance: &Instance) -> Result<Value, AppError> {
        let raw = instance
            .pk_string()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no primary key", instance.kind)))?;
        parse_pk(table, &raw).ok_or_else(|| AppError::BadRequest(format!("invalid id: {}", raw)))
    }

    async fn fetch_optional(&self, table: &TableSpec, q: &QueryBuf) -> Result<Option<Instance>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| row_to_instance(table, &r)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get(&self, kind: &str, pk: &str) -> Result<Option<Instance>, AppError> {
        let table = self.table(kind)?;
        let Some(pk) = parse_pk(table, pk) else {
            return Ok(None);
        };
        self.fetch_optional(table, &select_by_pk(table, pk)).await
    }

    async fn all(&self, kind: &str) -> Result<Vec<Instance>, AppError> {
        let table = self.table(kind)?;
        let q = select_all(table);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|r| row_to_instance(table, r)).collect())
    }

    async fn save(&self, instance: &mut Instance) -> Result<(), AppError> {
        let table = self.table(&instance.kind)?;
        let q = if instance.is_saved() {
            update(table, Self::pk_value(table, instance)?, &instance.fields)
        } else {
            insert(table, &instance.fields)
        };
        let saved = self
            .fetch_optional(table, &q)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", instance.kind, instance.pk_string().unwrap_or_default())))?;
        *instance = saved;
        Ok(())
    }

    async fn delete(&self, instance: &Instance) -> Result<(), AppError> {
        let table = self.table(&instance.kind)?;
        let q = delete(table, Self::pk_value(table, instance)?);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} {}",
                instance.kind,
                instance.pk_string().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

fn row_to_instance(table: &TableSpec, row: &PgRow) -> Instance {
    let pk = cell_to_value(row, &table.pk_column);
    let mut fields = Map::new();
    for c in &table.columns {
        fields.insert(c.name.clone(), cell_to_value(row, &c.name));
    }
    Instance {
        kind: table.web_id.clone(),
        pk: Some(pk).filter(|v| !v.is_null()),
        fields,
    }
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    Value::Null
}
