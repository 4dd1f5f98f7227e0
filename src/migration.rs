//! Apply web config to the database: CREATE SCHEMA and CREATE TABLE for each descriptor table.

use crate::config::{resolve, FullConfig, PkType, TableSpec};
use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::PgPool;
use std::collections::BTreeSet;

fn pk_column_def(table: &TableSpec) -> String {
    let typ = match table.pk_type {
        PkType::BigInt => "BIGSERIAL",
        PkType::Int => "SERIAL",
        PkType::Uuid => "UUID DEFAULT gen_random_uuid()",
        PkType::Text => "TEXT",
    };
    format!("{} {} PRIMARY KEY", quoted(&table.pk_column), typ)
}

/// DDL for one table. Idempotent (IF NOT EXISTS); existing tables are left untouched.
pub fn create_table_sql(table: &TableSpec) -> String {
    let mut col_defs = vec![pk_column_def(table)];
    for c in &table.columns {
        col_defs.push(format!("{} {}", quoted(&c.name), c.pg_type.to_uppercase()));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table(table),
        col_defs.join(", ")
    )
}

/// Validate config, then create missing schemas and tables.
pub async fn apply_migrations(pool: &PgPool, config: &FullConfig) -> Result<(), AppError> {
    let site = resolve(config)?;
    let mut tables: Vec<&TableSpec> = site.tables.values().collect();
    tables.sort_by(|a, b| a.web_id.cmp(&b.web_id));

    let schemas: BTreeSet<&str> = tables.iter().map(|t| t.schema_name.as_str()).collect();
    for schema in schemas {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
            .execute(pool)
            .await?;
    }

    for table in tables {
        let ddl = create_table_sql(table);
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(pool).await?;
        tracing::info!(web_id = %table.web_id, table = %table.table_name, "table ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnInfo;

    #[test]
    fn ddl_lists_pk_then_columns() {
        let table = TableSpec {
            web_id: "book".into(),
            schema_name: "public".into(),
            table_name: "books".into(),
            pk_column: "id".into(),
            pk_type: PkType::BigInt,
            columns: vec![
                ColumnInfo { name: "title".into(), pg_type: "text" },
                ColumnInfo { name: "rating".into(), pg_type: "double precision" },
            ],
        };
        assert_eq!(
            create_table_sql(&table),
            r#"CREATE TABLE IF NOT EXISTS "public"."books" ("id" BIGSERIAL PRIMARY KEY, "title" TEXT, "rating" DOUBLE PRECISION)"#
        );
    }
}
