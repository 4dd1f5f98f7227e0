//! Descriptor built from a JSON web config entry.

use crate::config::WebConfig;
use crate::descriptor::{Column, Descriptor};
use crate::error::AppError;
use crate::model::Instance;
use crate::service::{FieldSpec, FormSpec};
use async_trait::async_trait;
use serde_json::Value;

pub struct ConfigDescriptor {
    config: WebConfig,
    form: FormSpec,
}

impl ConfigDescriptor {
    pub fn new(config: WebConfig) -> Self {
        let form = FormSpec::new(config.fields.iter().map(FieldSpec::from).collect()).with_media(config.media.clone());
        ConfigDescriptor { config, form }
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }
}

fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[async_trait]
impl Descriptor for ConfigDescriptor {
    fn web_id(&self) -> &str {
        &self.config.web_id
    }

    fn app_label(&self) -> &str {
        &self.config.app_label
    }

    fn form(&self) -> &FormSpec {
        &self.form
    }

    fn verbose_name(&self) -> String {
        self.config
            .verbose_name
            .clone()
            .unwrap_or_else(|| crate::case::to_verbose(self.web_id()))
    }

    fn verbose_name_plural(&self) -> String {
        self.config
            .verbose_name_plural
            .clone()
            .unwrap_or_else(|| crate::case::pluralize(&self.verbose_name()))
    }

    fn perm_id(&self) -> &str {
        self.config.perm_id.as_deref().unwrap_or(&self.config.web_id)
    }

    fn url_prefix(&self) -> &str {
        self.config.url_prefix.as_deref().unwrap_or(&self.config.web_id)
    }

    fn template_prefix(&self) -> &str {
        self.config.template_prefix.as_deref().unwrap_or(&self.config.web_id)
    }

    fn instance_label(&self, instance: &Instance) -> String {
        self.assert_instance_type(instance);
        match self.config.label_field.as_deref().and_then(|f| instance.get(f)) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | None => instance.to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn list_columns(&self) -> Vec<Column> {
        if self.config.list_columns.is_empty() {
            return self
                .form
                .fields
                .iter()
                .map(|f| Column {
                    name: f.name.clone(),
                    label: f.label.clone(),
                })
                .collect();
        }
        self.config
            .list_columns
            .iter()
            .filter_map(|name| self.form.fields.iter().find(|f| &f.name == name))
            .map(|f| Column {
                name: f.name.clone(),
                label: f.label.clone(),
            })
            .collect()
    }

    async fn check_delete(&self, instance: &Instance) -> Result<Vec<String>, AppError> {
        self.assert_instance_type(instance);
        Ok(self
            .config
            .delete_blockers
            .iter()
            .filter(|b| truthy(instance.get(&b.field)))
            .map(|b| b.message.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::from_json_str;
    use crate::urls::PrefixUrls;

    fn descriptor() -> ConfigDescriptor {
        let config = from_json_str(
            r#"{"webs": [{
                "web_id": "book", "app_label": "library",
                "verbose_name": "volume", "url_prefix": "books", "label_field": "title",
                "table": {"name": "books"},
                "fields": [
                    {"name": "title", "validation": {"required": true}},
                    {"name": "isbn", "label": "ISBN"},
                    {"name": "on_loan", "type": "boolean"}
                ],
                "list_columns": ["isbn", "title"],
                "media": {"css": ["/static/book.css"]},
                "delete_blockers": [{"field": "on_loan", "message": "Book is on loan"}]
            }]}"#,
        )
        .unwrap();
        ConfigDescriptor::new(config.webs.into_iter().next().unwrap())
    }

    #[test]
    fn config_overrides_conventions() {
        let d = descriptor();
        assert_eq!(d.verbose_name(), "volume");
        assert_eq!(d.verbose_name_plural(), "volumes");
        assert_eq!(d.perm_id(), "book");
        assert_eq!(d.list_url(&PrefixUrls::default()).unwrap(), "/books/");
        assert_eq!(d.form().media.css, vec!["/static/book.css"]);
        let cols: Vec<_> = d.list_columns().into_iter().map(|c| c.label).collect();
        assert_eq!(cols, vec!["ISBN", "Title"]);
    }

    #[test]
    fn label_field_names_instances() {
        let d = descriptor();
        let inst = Instance::with_pk("book", 1).field("title", "Dune");
        assert_eq!(d.instance_label(&inst), "Dune");
        assert_eq!(d.instance_label(&Instance::with_pk("book", 2)), "book 2");
    }

    #[tokio::test]
    async fn delete_blockers_report_truthy_fields() {
        let d = descriptor();
        let free = Instance::with_pk("book", 1).field("on_loan", false);
        assert!(d.check_delete(&free).await.unwrap().is_empty());
        let lent = Instance::with_pk("book", 1).field("on_loan", true);
        assert_eq!(d.check_delete(&lent).await.unwrap(), vec!["Book is on loan"]);
    }
}
