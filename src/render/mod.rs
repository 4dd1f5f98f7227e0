//! Template rendering. Actions produce template names and a context; a [`Renderer`] turns
//! them into HTML. [`TemplateEngine`] is the handlebars-backed implementation.

mod helpers;
pub mod presentation;
mod templates;

pub use presentation::{pagination_context, show_breadcrumbs, show_error_list, show_list_buttons, show_view_buttons};

use crate::error::AppError;
use crate::model::Action;
use crate::registry::Registry;
use crate::urls::Reverse;
use handlebars::Handlebars;
use helpers::{breadcrumbs_fragment, error_list_fragment, passthrough_fragment, Fragment, ObjectUrl, UrlWithParam};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

pub trait Renderer: Send + Sync {
    fn has_template(&self, name: &str) -> bool;

    fn render(&self, name: &str, context: &Value) -> Result<String, AppError>;

    /// Render the first candidate that exists.
    fn render_first(&self, candidates: &[String], context: &Value) -> Result<String, AppError> {
        let name = candidates
            .iter()
            .find(|c| self.has_template(c))
            .ok_or_else(|| AppError::Template(format!("no template among {:?}", candidates)))?;
        tracing::debug!(template = %name, "render");
        self.render(name, context)
    }
}

pub struct TemplateEngine {
    hb: Handlebars<'static>,
}

impl TemplateEngine {
    /// Engine with the built-in templates and helpers. `registry` and `urls` back the
    /// `get_view_url`/`get_edit_url`/`get_delete_url` helpers.
    pub fn new(registry: Arc<Registry>, urls: Arc<dyn Reverse>) -> Result<Self, AppError> {
        let mut hb = Handlebars::new();
        for (name, source) in templates::DEFAULTS {
            hb.register_template_string(name, *source)?;
        }
        hb.register_helper("url_with_param", Box::new(UrlWithParam));
        for (name, action) in [
            ("get_view_url", Action::View),
            ("get_edit_url", Action::Edit),
            ("get_delete_url", Action::Delete),
        ] {
            hb.register_helper(
                name,
                Box::new(ObjectUrl {
                    registry: registry.clone(),
                    urls: urls.clone(),
                    action,
                }),
            );
        }
        let fragments: [(&str, &'static str, fn(&Value) -> Result<Value, String>); 4] = [
            ("show_breadcrumbs", "webs_breadcrumbs", breadcrumbs_fragment),
            ("show_error_list", "webs_error_list", error_list_fragment),
            ("show_buttons", "webs_buttons", passthrough_fragment),
            ("show_pagination", "webs_pagination", passthrough_fragment),
        ];
        for (name, template, build) in fragments {
            hb.register_helper(name, Box::new(Fragment { template, build }));
        }
        Ok(TemplateEngine { hb })
    }

    /// Add or replace a template.
    pub fn register_template(&mut self, name: &str, source: &str) -> Result<(), AppError> {
        self.hb.register_template_string(name, source)?;
        Ok(())
    }

    /// Register every `.html` file under `dir`, named by its path relative to `dir`
    /// (e.g. `library/book_detail.html`). Returns the number of templates loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, AppError> {
        let mut loaded = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| AppError::Template(format!("{}: {}", dir.display(), e)))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let source = std::fs::read_to_string(path)
                .map_err(|e| AppError::Template(format!("{}: {}", path.display(), e)))?;
            self.register_template(&name, &source)?;
            tracing::debug!(template = %name, "loaded template");
            loaded += 1;
        }
        Ok(loaded)
    }
}

impl Renderer for TemplateEngine {
    fn has_template(&self, name: &str) -> bool {
        self.hb.has_template(name)
    }

    fn render(&self, name: &str, context: &Value) -> Result<String, AppError> {
        Ok(self.hb.render(name, context)?)
    }
}
