//! Resolved config: validated descriptors plus table bindings for SQL-backed storage.

use crate::config::PkType;
use crate::registry::Registry;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// PostgreSQL type name for casts when binding string values (e.g. "date").
    pub pg_type: &'static str,
}

/// Table binding for one descriptor.
#[derive(Clone, Debug)]
pub struct TableSpec {
    pub web_id: String,
    pub schema_name: String,
    pub table_name: String,
    pub pk_column: String,
    pub pk_type: PkType,
    /// Non-key columns, in form field order.
    pub columns: Vec<ColumnInfo>,
}

impl TableSpec {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub struct ResolvedSite {
    pub registry: Registry,
    pub tables: HashMap<String, TableSpec>,
}
