//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a table binding.

use crate::config::{PkType, TableSpec};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(table: &TableSpec) -> String {
    format!("{}.{}", quoted(&table.schema_name), quoted(&table.table_name))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a parameter and return its placeholder, cast to `pg_type`.
    fn push_param(&mut self, v: Value, pg_type: &str) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type)
    }
}

pub fn pk_pg_type(pk_type: PkType) -> &'static str {
    match pk_type {
        PkType::BigInt => "bigint",
        PkType::Int => "integer",
        PkType::Uuid => "uuid",
        PkType::Text => "text",
    }
}

/// Parse a primary key taken from a URL path. `None` when it cannot be a key of this type.
pub fn parse_pk(table: &TableSpec, raw: &str) -> Option<Value> {
    match table.pk_type {
        PkType::BigInt | PkType::Int => raw.parse::<i64>().ok().map(|n| Value::Number(n.into())),
        PkType::Uuid => uuid::Uuid::parse_str(raw).ok().map(|u| Value::String(u.to_string())),
        PkType::Text => Some(Value::String(raw.to_string())),
    }
}

/// SELECT list: pk first, then columns. uuid and date come back as text so rows map to JSON strings.
fn select_column_list(table: &TableSpec) -> String {
    let pk = match table.pk_type {
        PkType::Uuid => format!("{}::text AS {}", quoted(&table.pk_column), quoted(&table.pk_column)),
        _ => quoted(&table.pk_column),
    };
    std::iter::once(pk)
        .chain(table.columns.iter().map(|c| {
            let q = quoted(&c.name);
            if c.pg_type == "date" {
                format!("{}::text AS {}", q, q)
            } else {
                q
            }
        }))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT all rows ORDER BY pk.
pub fn select_all(table: &TableSpec) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(table),
        qualified_table(table),
        quoted(&table.pk_column)
    );
    q
}

/// SELECT by primary key.
pub fn select_by_pk(table: &TableSpec, pk: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(pk, pk_pg_type(table.pk_type));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(table),
        qualified_table(table),
        quoted(&table.pk_column),
        ph
    );
    q
}

/// INSERT every configured column (missing values bind NULL); the database assigns the pk.
pub fn insert(table: &TableSpec, fields: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let val = fields.get(&c.name).cloned().unwrap_or(Value::Null);
        placeholders.push(q.push_param(val, c.pg_type));
        cols.push(quoted(&c.name));
    }
    q.sql = if cols.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            qualified_table(table),
            select_column_list(table)
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            qualified_table(table),
            cols.join(", "),
            placeholders.join(", "),
            select_column_list(table)
        )
    };
    q
}

/// UPDATE by pk: SET only configured columns present in `fields`.
pub fn update(table: &TableSpec, pk: Value, fields: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &table.columns {
        let Some(v) = fields.get(&c.name) else { continue };
        let ph = q.push_param(v.clone(), c.pg_type);
        sets.push(format!("{} = {}", quoted(&c.name), ph));
    }
    let id_ph = q.push_param(pk, pk_pg_type(table.pk_type));
    q.sql = if sets.is_empty() {
        format!(
            "SELECT {} FROM {} WHERE {} = {}",
            select_column_list(table),
            qualified_table(table),
            quoted(&table.pk_column),
            id_ph
        )
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
            qualified_table(table),
            sets.join(", "),
            quoted(&table.pk_column),
            id_ph,
            select_column_list(table)
        )
    };
    q
}

/// DELETE by pk.
pub fn delete(table: &TableSpec, pk: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(pk, pk_pg_type(table.pk_type));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        qualified_table(table),
        quoted(&table.pk_column),
        ph
    );
    q
}
