//! Bind serde_json::Value parameters with concrete PostgreSQL types.

use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A value that can be bound to a PostgreSQL query. Placeholders carry explicit casts,
/// so strings may stand in for dates and uuids.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Text(String),
}

impl From<&Value> for PgBindValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::F64(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => PgBindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Text(v.to_string()),
        }
    }
}

pub fn bind_value<'q>(query: Query<'q, Postgres, PgArguments>, v: &Value) -> Query<'q, Postgres, PgArguments> {
    match PgBindValue::from(v) {
        PgBindValue::Null => query.bind(None::<String>),
        PgBindValue::Bool(b) => query.bind(b),
        PgBindValue::I64(n) => query.bind(n),
        PgBindValue::F64(n) => query.bind(n),
        PgBindValue::Text(s) => query.bind(s),
    }
}

pub fn bind_all<'q>(mut query: Query<'q, Postgres, PgArguments>, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = bind_value(query, p);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_map_to_bind_values() {
        assert_eq!(PgBindValue::from(&json!(null)), PgBindValue::Null);
        assert_eq!(PgBindValue::from(&json!(3)), PgBindValue::I64(3));
        assert_eq!(PgBindValue::from(&json!(2.5)), PgBindValue::F64(2.5));
        assert_eq!(PgBindValue::from(&json!("x")), PgBindValue::Text("x".into()));
        assert_eq!(PgBindValue::from(&json!([1])), PgBindValue::Text("[1]".into()));
    }
}
