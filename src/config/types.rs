//! Raw config types matching the JSON descriptor config (`{"webs": [...]}`).

use serde::{Deserialize, Serialize};

/// Storage type of a primary key column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PkType {
    #[default]
    BigInt,
    Int,
    Uuid,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default = "default_pk")]
    pub primary_key: String,
    #[serde(default)]
    pub pk_type: PkType,
}

fn default_pk() -> String {
    "id".into()
}

/// Input kind of a form field; drives coercion of submitted strings and the column type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Integer,
    Float,
    Boolean,
    Date,
    Email,
}

impl FieldKind {
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Integer | FieldKind::Float => "number",
            FieldKind::Boolean => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Email => "email",
        }
    }

    pub fn pg_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Textarea | FieldKind::Email => "text",
            FieldKind::Integer => "bigint",
            FieldKind::Float => "double precision",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub validation: ValidationRule,
}

/// Static assets a form needs on the page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub js: Vec<String>,
}

/// Refuse deletion while `field` holds a truthy value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteBlocker {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebConfig {
    pub web_id: String,
    pub app_label: String,
    #[serde(default)]
    pub verbose_name: Option<String>,
    #[serde(default)]
    pub verbose_name_plural: Option<String>,
    #[serde(default)]
    pub perm_id: Option<String>,
    #[serde(default)]
    pub url_prefix: Option<String>,
    #[serde(default)]
    pub template_prefix: Option<String>,
    /// Field used as the display label of an instance (breadcrumbs, confirmation pages).
    #[serde(default)]
    pub label_field: Option<String>,
    pub table: TableConfig,
    pub fields: Vec<FieldConfig>,
    #[serde(default)]
    pub list_columns: Vec<String>,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub delete_blockers: Vec<DeleteBlocker>,
}

/// All descriptor configs in one struct for in-memory loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FullConfig {
    #[serde(default)]
    pub webs: Vec<WebConfig>,
}
