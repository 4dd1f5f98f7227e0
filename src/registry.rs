//! Descriptor registry: identifier -> descriptor, populated explicitly at startup.
//!
//! Build a [`Registry`], then either hand it to [`crate::AppState`] or [`install`] it
//! process-wide. The registry is never mutated after it starts serving requests.

use crate::descriptor::Descriptor;
use crate::error::{AppError, ConfigError};
use crate::model::Instance;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Default)]
pub struct Registry {
    by_id: HashMap<String, Arc<dyn Descriptor>>,
    id_by_prefix: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Add a descriptor. Ids and URL prefixes must be unique.
    pub fn register(&mut self, web: Arc<dyn Descriptor>) -> Result<(), ConfigError> {
        let id = web.web_id().to_string();
        let prefix = web.url_prefix().to_string();
        if self.by_id.contains_key(&id) {
            return Err(ConfigError::DuplicateWebId(id));
        }
        if self.id_by_prefix.contains_key(&prefix) {
            return Err(ConfigError::DuplicateUrlPrefix(prefix));
        }
        tracing::debug!(web_id = %id, url_prefix = %prefix, "registered web");
        self.id_by_prefix.insert(prefix, id.clone());
        self.by_id.insert(id, web);
        Ok(())
    }

    pub fn resolve(&self, web_id: &str) -> Result<Arc<dyn Descriptor>, AppError> {
        self.by_id
            .get(web_id)
            .cloned()
            .ok_or_else(|| AppError::NotRegistered(web_id.to_string()))
    }

    pub fn resolve_by_prefix(&self, prefix: &str) -> Result<Arc<dyn Descriptor>, AppError> {
        let id = self
            .id_by_prefix
            .get(prefix)
            .ok_or_else(|| AppError::NotRegistered(prefix.to_string()))?;
        self.resolve(id)
    }

    /// Descriptor responsible for `instance`, by its descriptor key.
    pub fn resolve_by_instance(&self, instance: &Instance) -> Result<Arc<dyn Descriptor>, AppError> {
        self.resolve(instance.descriptor_key())
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_id.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// Install the process-wide registry. Fails if one is already installed.
pub fn install(registry: Registry) -> Result<Arc<Registry>, ConfigError> {
    let registry = Arc::new(registry);
    GLOBAL
        .set(registry.clone())
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    tracing::info!(webs = registry.len(), "installed web registry");
    Ok(registry)
}

pub fn global() -> Option<Arc<Registry>> {
    GLOBAL.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldKind;
    use crate::service::{FieldSpec, FormSpec};

    struct Web {
        id: &'static str,
        prefix: &'static str,
        form: FormSpec,
    }

    impl Descriptor for Web {
        fn web_id(&self) -> &str {
            self.id
        }
        fn app_label(&self) -> &str {
            "library"
        }
        fn form(&self) -> &FormSpec {
            &self.form
        }
        fn url_prefix(&self) -> &str {
            self.prefix
        }
    }

    fn web(id: &'static str, prefix: &'static str) -> Arc<dyn Descriptor> {
        Arc::new(Web {
            id,
            prefix,
            form: FormSpec::new(vec![FieldSpec::new("name", FieldKind::Text)]),
        })
    }

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.register(web("book", "books")).unwrap();
        r.register(web("author", "authors")).unwrap();
        r
    }

    #[test]
    fn resolve_returns_the_declared_identifier() {
        let r = registry();
        for id in r.ids() {
            assert_eq!(r.resolve(id).unwrap().web_id(), id);
        }
        assert_eq!(r.resolve_by_prefix("authors").unwrap().web_id(), "author");
        assert_eq!(r.resolve_by_instance(&Instance::with_pk("book", 1)).unwrap().web_id(), "book");
    }

    #[test]
    fn unknown_identifier_is_a_lookup_error() {
        let r = registry();
        assert!(matches!(r.resolve("shelf"), Err(AppError::NotRegistered(id)) if id == "shelf"));
        assert!(r.resolve_by_instance(&Instance::new("shelf")).is_err());
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut r = registry();
        assert!(matches!(r.register(web("book", "other")), Err(ConfigError::DuplicateWebId(_))));
        assert!(matches!(r.register(web("novel", "books")), Err(ConfigError::DuplicateUrlPrefix(_))));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn global_install_happens_once() {
        let installed = install(registry()).unwrap();
        assert_eq!(installed.len(), 2);
        assert!(global().is_some());
        assert!(matches!(install(Registry::new()), Err(ConfigError::AlreadyInstalled)));
    }
}
