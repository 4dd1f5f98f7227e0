//! Config validation: identifiers, uniqueness, and field references.

use crate::config::FullConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*$").expect("identifier regex is valid")
});

fn check_ident(s: &str) -> Result<(), ConfigError> {
    if IDENT.is_match(s) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier(s.to_string()))
    }
}

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let mut web_ids = HashSet::new();
    let mut prefixes = HashSet::new();

    for web in &config.webs {
        check_ident(&web.web_id)?;
        check_ident(&web.app_label)?;
        check_ident(&web.table.name)?;
        check_ident(&web.table.primary_key)?;
        if let Some(schema) = &web.table.schema {
            check_ident(schema)?;
        }
        if !web_ids.insert(web.web_id.as_str()) {
            return Err(ConfigError::DuplicateWebId(web.web_id.clone()));
        }
        let prefix = web.url_prefix.as_deref().unwrap_or(&web.web_id);
        if prefix.is_empty() || prefix.contains('/') {
            return Err(ConfigError::InvalidIdentifier(prefix.to_string()));
        }
        if !prefixes.insert(prefix) {
            return Err(ConfigError::DuplicateUrlPrefix(prefix.to_string()));
        }

        if web.fields.is_empty() {
            return Err(ConfigError::Validation(format!("web '{}' has no fields", web.web_id)));
        }
        let mut field_names = HashSet::new();
        for f in &web.fields {
            check_ident(&f.name)?;
            if f.name == web.table.primary_key {
                return Err(ConfigError::Validation(format!(
                    "web '{}': primary key '{}' cannot be a form field",
                    web.web_id, f.name
                )));
            }
            if !field_names.insert(f.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "web '{}': duplicate field '{}'",
                    web.web_id, f.name
                )));
            }
            if let Some(pattern) = &f.validation.pattern {
                Regex::new(pattern).map_err(|e| {
                    ConfigError::Validation(format!("web '{}': field '{}' pattern: {}", web.web_id, f.name, e))
                })?;
            }
        }

        let references = web
            .list_columns
            .iter()
            .map(|c| ("list column", c))
            .chain(web.label_field.iter().map(|c| ("label field", c)))
            .chain(web.delete_blockers.iter().map(|b| ("delete blocker field", &b.field)));
        for (kind, name) in references {
            if !field_names.contains(name.as_str()) {
                return Err(ConfigError::MissingReference {
                    web_id: web.web_id.clone(),
                    kind,
                    id: name.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::from_json_str;

    fn config(json: &str) -> FullConfig {
        from_json_str(json).unwrap()
    }

    const BOOK: &str = r#"{"webs": [{
        "web_id": "book", "app_label": "library",
        "table": {"name": "books"},
        "fields": [{"name": "title"}],
        "list_columns": ["title"]
    }]}"#;

    #[test]
    fn accepts_minimal_config() {
        validate(&config(BOOK)).unwrap();
    }

    #[test]
    fn rejects_duplicate_ids_and_prefixes() {
        let mut c = config(BOOK);
        c.webs.push(c.webs[0].clone());
        assert!(matches!(validate(&c), Err(ConfigError::DuplicateWebId(id)) if id == "book"));

        let mut c = config(BOOK);
        let mut other = c.webs[0].clone();
        other.web_id = "novel".into();
        other.url_prefix = Some("book".into());
        c.webs.push(other);
        assert!(matches!(validate(&c), Err(ConfigError::DuplicateUrlPrefix(p)) if p == "book"));
    }

    #[test]
    fn rejects_unknown_list_column() {
        let mut c = config(BOOK);
        c.webs[0].list_columns.push("isbn".into());
        assert!(matches!(
            validate(&c),
            Err(ConfigError::MissingReference { kind: "list column", .. })
        ));
    }

    #[test]
    fn rejects_bad_identifiers() {
        let mut c = config(BOOK);
        c.webs[0].web_id = "Book-Shelf".into();
        assert!(matches!(validate(&c), Err(ConfigError::InvalidIdentifier(_))));
    }
}
