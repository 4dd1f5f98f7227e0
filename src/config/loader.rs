//! Load descriptor config from JSON and resolve it into a registry and table bindings.

use crate::config::resolved::{ColumnInfo, ResolvedSite, TableSpec};
use crate::config::{validate, FullConfig, WebConfig};
use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use crate::registry::Registry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Schema used when a table config omits one.
pub const DEFAULT_SCHEMA: &str = "public";

pub fn from_json_str(s: &str) -> Result<FullConfig, ConfigError> {
    serde_json::from_str(s).map_err(|e| ConfigError::Load(e.to_string()))
}

/// Read a config file: either `{"webs": [...]}` or a bare array of web configs.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))?;
    let config = if value.is_array() {
        let webs: Vec<WebConfig> = serde_json::from_value(value).map_err(|e| ConfigError::Load(e.to_string()))?;
        FullConfig { webs }
    } else {
        serde_json::from_value(value).map_err(|e| ConfigError::Load(e.to_string()))?
    };
    tracing::debug!(path = %path.display(), webs = config.webs.len(), "loaded web config");
    Ok(config)
}

/// Validate and build the registry (one `ConfigDescriptor` per web) and table bindings.
pub fn resolve(config: &FullConfig) -> Result<ResolvedSite, ConfigError> {
    validate(config)?;

    let mut registry = Registry::new();
    let mut tables = HashMap::new();
    for web in &config.webs {
        registry.register(Arc::new(ConfigDescriptor::new(web.clone())))?;
        tables.insert(web.web_id.clone(), table_spec(web));
    }
    Ok(ResolvedSite { registry, tables })
}

fn table_spec(web: &WebConfig) -> TableSpec {
    TableSpec {
        web_id: web.web_id.clone(),
        schema_name: web.table.schema.clone().unwrap_or_else(|| DEFAULT_SCHEMA.into()),
        table_name: web.table.name.clone(),
        pk_column: web.table.primary_key.clone(),
        pk_type: web.table.pk_type,
        columns: web
            .fields
            .iter()
            .map(|f| ColumnInfo {
                name: f.name.clone(),
                pg_type: f.kind.pg_type(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PkType;

    const CONFIG: &str = r#"{"webs": [
        {
            "web_id": "book", "app_label": "library",
            "table": {"schema": "lib", "name": "books", "pk_type": "uuid"},
            "fields": [{"name": "title"}, {"name": "published_on", "type": "date"}]
        },
        {
            "web_id": "author", "app_label": "library", "url_prefix": "writers",
            "table": {"name": "authors"},
            "fields": [{"name": "name"}]
        }
    ]}"#;

    #[test]
    fn resolves_registry_and_tables() {
        let site = resolve(&from_json_str(CONFIG).unwrap()).unwrap();
        assert_eq!(site.registry.ids(), vec!["author", "book"]);
        assert_eq!(site.registry.resolve_by_prefix("writers").unwrap().web_id(), "author");

        let books = &site.tables["book"];
        assert_eq!(books.schema_name, "lib");
        assert_eq!(books.pk_column, "id");
        assert_eq!(books.pk_type, PkType::Uuid);
        assert_eq!(books.column("published_on").unwrap().pg_type, "date");
        assert_eq!(site.tables["author"].schema_name, DEFAULT_SCHEMA);
    }

    #[tokio::test]
    async fn loads_bare_array_files() {
        let dir = std::env::temp_dir().join(format!("webs-config-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("webs.json");
        let webs = serde_json::from_str::<serde_json::Value>(CONFIG).unwrap()["webs"].clone();
        tokio::fs::write(&path, webs.to_string()).await.unwrap();

        let config = load_from_path(&path).await.unwrap();
        assert_eq!(config.webs.len(), 2);
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let err = load_from_path("/nonexistent/webs.json").await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
