//! Result tables: the caller-supplied rows behind a list page.

use crate::model::Instance;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Instance>,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Instance>) -> Self {
        Table { columns, rows }
    }

    /// Row contexts in order: the instance context plus `cells`, one display string per column.
    pub fn row_contexts(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut ctx = row.to_context();
                let cells: Vec<Value> = self
                    .columns
                    .iter()
                    .map(|c| Value::String(cell_text(row.get(&c.name))))
                    .collect();
                if let Value::Object(map) = &mut ctx {
                    map.insert("cells".into(), Value::Array(cells));
                }
                ctx
            })
            .collect()
    }

    pub fn to_context(&self) -> Value {
        serde_json::json!({
            "columns": self.columns,
            "count": self.rows.len(),
        })
    }
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "yes".into(),
        Some(Value::Bool(false)) => "no".into(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_column_order() {
        let table = Table::new(
            vec![
                Column { name: "title".into(), label: "Title".into() },
                Column { name: "in_print".into(), label: "In print".into() },
                Column { name: "pages".into(), label: "Pages".into() },
            ],
            vec![Instance::with_pk("book", 1).field("title", "Dune").field("in_print", true)],
        );
        let rows = table.row_contexts();
        assert_eq!(rows[0]["cells"], serde_json::json!(["Dune", "yes", ""]));
        assert_eq!(rows[0]["label"], "Dune");
    }
}
