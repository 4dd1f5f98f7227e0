//! Model forms: bind from an instance or from submitted data, validate, build the instance.

use crate::case::field_label;
use crate::config::{FieldConfig, FieldKind, Media, ValidationRule};
use crate::error::AppError;
use crate::model::Instance;
use crate::service::validation::FieldValidator;
use crate::store::Store;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub rule: ValidationRule,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.to_string(),
            label: field_label(name),
            kind,
            rule: ValidationRule::default(),
        }
        .with_kind_format()
    }

    /// Email fields are format-checked unless the rule names another format.
    fn with_kind_format(mut self) -> Self {
        if self.kind == FieldKind::Email && self.rule.format.is_none() {
            self.rule.format = Some("email".into());
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.rule.required = Some(true);
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rule = rule;
        self.with_kind_format()
    }

    pub fn is_required(&self) -> bool {
        self.rule.required == Some(true)
    }
}

impl From<&FieldConfig> for FieldSpec {
    fn from(c: &FieldConfig) -> Self {
        FieldSpec {
            name: c.name.clone(),
            label: c.label.clone().unwrap_or_else(|| field_label(&c.name)),
            kind: c.kind,
            rule: c.validation.clone(),
        }
        .with_kind_format()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
    pub media: Media,
}

impl FormSpec {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        FormSpec {
            fields,
            media: Media::default(),
        }
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media = media;
        self
    }

    /// Unbound form showing the values of `instance`.
    pub fn for_instance(&self, instance: &Instance) -> BoundForm {
        BoundForm {
            fields: self.fields.clone(),
            media: self.media.clone(),
            is_bound: false,
            instance: instance.clone(),
            raw: BTreeMap::new(),
            cleaned: Map::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Form bound to submitted `data`; `instance` is the row the form edits (unsaved for add).
    /// Submitted strings are coerced per field kind and validated immediately.
    pub fn bind(&self, data: &[(String, String)], instance: Instance) -> BoundForm {
        let mut raw = BTreeMap::new();
        for (k, v) in data {
            raw.insert(k.clone(), v.clone());
        }
        let mut cleaned = Map::new();
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for field in &self.fields {
            let submitted = raw.get(&field.name).map(String::as_str);
            let mut field_errors = Vec::new();
            match coerce(field, submitted) {
                Ok(value) => {
                    field_errors.extend(FieldValidator::validate(&field.label, &value, &field.rule));
                    if field.kind == FieldKind::Boolean && field.is_required() && value == Value::Bool(false) {
                        field_errors.push(format!("{} is required", field.label));
                    }
                    cleaned.insert(field.name.clone(), value);
                }
                Err(msg) => field_errors.push(msg),
            }
            if !field_errors.is_empty() {
                errors.insert(field.name.clone(), field_errors);
            }
        }
        BoundForm {
            fields: self.fields.clone(),
            media: self.media.clone(),
            is_bound: true,
            instance,
            raw,
            cleaned,
            errors,
        }
    }
}

fn coerce(field: &FieldSpec, submitted: Option<&str>) -> Result<Value, String> {
    let s = submitted.unwrap_or("").trim();
    match field.kind {
        FieldKind::Text | FieldKind::Textarea | FieldKind::Email => Ok(Value::String(s.to_string())),
        FieldKind::Boolean => Ok(Value::Bool(!matches!(
            s.to_lowercase().as_str(),
            "" | "false" | "0" | "off"
        ))),
        _ if s.is_empty() => Ok(Value::Null),
        FieldKind::Integer => s
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| format!("{}: enter a whole number", field.label)),
        FieldKind::Float => s
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("{}: enter a number", field.label)),
        FieldKind::Date => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| format!("{}: enter a valid date", field.label)),
    }
}

/// A form bound either to an existing instance (unbound, for display) or to submitted data.
#[derive(Clone, Debug)]
pub struct BoundForm {
    fields: Vec<FieldSpec>,
    media: Media,
    is_bound: bool,
    instance: Instance,
    raw: BTreeMap<String, String>,
    cleaned: Map<String, Value>,
    errors: BTreeMap<String, Vec<String>>,
}

impl BoundForm {
    pub fn is_bound(&self) -> bool {
        self.is_bound
    }

    /// Only a submitted form without field errors is valid.
    pub fn is_valid(&self) -> bool {
        self.is_bound && self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn cleaned_data(&self) -> &Map<String, Value> {
        &self.cleaned
    }

    pub fn media(&self) -> &Media {
        &self.media
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Build the instance with cleaned values applied, without persisting it.
    pub fn construct_instance(&self) -> Instance {
        let mut instance = self.instance.clone();
        for (k, v) in &self.cleaned {
            instance.fields.insert(k.clone(), v.clone());
        }
        instance
    }

    /// Build and persist the instance.
    pub async fn save(&self, store: &dyn Store) -> Result<Instance, AppError> {
        let mut instance = self.construct_instance();
        store.save(&mut instance).await?;
        Ok(instance)
    }

    pub fn to_context(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|f| {
                let value = if self.is_bound {
                    self.raw.get(&f.name).cloned().unwrap_or_default()
                } else {
                    self.instance.get(&f.name).map(display_value).unwrap_or_default()
                };
                let checked = match (self.is_bound, self.cleaned.get(&f.name), self.instance.get(&f.name)) {
                    (true, Some(Value::Bool(b)), _) => *b,
                    (false, _, Some(Value::Bool(b))) => *b,
                    _ => false,
                };
                serde_json::json!({
                    "name": f.name,
                    "label": f.label,
                    "input_type": f.kind.input_type(),
                    "textarea": f.kind == FieldKind::Textarea,
                    "checkbox": f.kind == FieldKind::Boolean,
                    "required": f.is_required(),
                    "value": value,
                    "checked": checked,
                    "errors": self.errors.get(&f.name).cloned().unwrap_or_default(),
                })
            })
            .collect();
        serde_json::json!({
            "is_bound": self.is_bound,
            "has_errors": !self.errors.is_empty(),
            "fields": fields,
        })
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn spec() -> FormSpec {
        FormSpec::new(vec![
            FieldSpec::new("title", FieldKind::Text).required(),
            FieldSpec::new("pages", FieldKind::Integer),
            FieldSpec::new("in_print", FieldKind::Boolean),
            FieldSpec::new("published_on", FieldKind::Date),
        ])
    }

    fn data(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn instance_form_is_never_valid() {
        let form = spec().for_instance(&Instance::with_pk("book", 1).field("title", "Dune"));
        assert!(!form.is_bound());
        assert!(!form.is_valid());
        assert_eq!(form.to_context()["fields"][0]["value"], "Dune");
    }

    #[test]
    fn valid_submission_coerces_values() {
        let form = spec().bind(
            &data(&[("title", " Dune "), ("pages", "412"), ("in_print", "on"), ("published_on", "1965-08-01")]),
            Instance::new("book"),
        );
        assert!(form.is_valid(), "{:?}", form.errors());
        let inst = form.construct_instance();
        assert_eq!(inst.kind, "book");
        assert!(!inst.is_saved());
        assert_eq!(inst.get("title"), Some(&json!("Dune")));
        assert_eq!(inst.get("pages"), Some(&json!(412)));
        assert_eq!(inst.get("in_print"), Some(&json!(true)));
        assert_eq!(inst.get("published_on"), Some(&json!("1965-08-01")));
    }

    #[test]
    fn invalid_submission_reports_per_field() {
        let form = spec().bind(&data(&[("pages", "many"), ("published_on", "soon")]), Instance::new("book"));
        assert!(!form.is_valid());
        let errs = form.errors();
        assert_eq!(errs["title"], vec!["Title is required"]);
        assert_eq!(errs["pages"], vec!["Pages: enter a whole number"]);
        assert_eq!(errs["published_on"], vec!["Published on: enter a valid date"]);
        assert!(!errs.contains_key("in_print"));
        assert_eq!(form.to_context()["fields"][1]["value"], "many");
    }

    #[test]
    fn editing_keeps_primary_key() {
        let existing = Instance::with_pk("book", 5).field("title", "Old");
        let form = spec().bind(&data(&[("title", "New")]), existing);
        let inst = form.construct_instance();
        assert_eq!(inst.pk, Some(json!(5)));
        assert_eq!(inst.get("title"), Some(&json!("New")));
        assert_eq!(inst.get("pages"), Some(&Value::Null));
    }

    #[test]
    fn email_fields_check_format() {
        let spec = FormSpec::new(vec![FieldSpec::new("contact", FieldKind::Email)]);
        let form = spec.bind(&data(&[("contact", "nobody")]), Instance::new("author"));
        assert_eq!(form.errors()["contact"], vec!["Contact must be a valid email"]);
        let form = spec.bind(&data(&[("contact", "")]), Instance::new("author"));
        assert!(form.is_valid());
    }

    #[tokio::test]
    async fn save_persists_through_the_store() {
        let store = MemoryStore::new();
        let form = spec().bind(&data(&[("title", "Dune")]), Instance::new("book"));
        let saved = form.save(&store).await.unwrap();
        assert!(saved.is_saved());
        assert_eq!(store.save_count(), 1);
    }
}
