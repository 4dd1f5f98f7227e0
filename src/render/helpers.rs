//! Handlebars helpers: query-string mutation, object URLs, and the shared fragments.

use crate::descriptor::Breadcrumb;
use crate::model::{Action, Instance};
use crate::querystring::{parse_changes, url_with_param};
use crate::registry::Registry;
use crate::render::presentation::{show_breadcrumbs, show_error_list};
use crate::urls::Reverse;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonRender, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;
use std::sync::Arc;

fn other(msg: impl Into<String>) -> RenderErrorReason {
    RenderErrorReason::Other(msg.into())
}

/// `{{url_with_param page=3}}`: the current query string with `page` set to 3.
/// `"key=value"` arguments are accepted too; their value is looked up in the context.
pub struct UrlWithParam;

impl HelperDef for UrlWithParam {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let request = ctx
            .data()
            .get("request")
            .ok_or_else(|| other("request not in context"))?;
        let current = query_pairs(request);

        let bits: Vec<String> = h.params().iter().map(|p| p.value().render()).collect();
        let mut changes: Vec<(String, String)> = parse_changes(bits.iter().map(String::as_str))
            .map_err(|e| other(e.0))?
            .into_iter()
            .map(|(key, expr)| {
                let value = resolve_expr(ctx.data(), &expr);
                (key, value)
            })
            .collect();
        for (key, value) in h.hash() {
            changes.push((key.to_string(), value.value().render()));
        }
        out.write(&url_with_param(&current, &changes))?;
        Ok(())
    }
}

/// Resolve a `key=value` value half: quoted text is literal, a dotted path is looked up in
/// the context, anything unresolved is kept as written.
fn resolve_expr(data: &Value, expr: &str) -> String {
    let unquoted = expr
        .strip_prefix('"')
        .and_then(|e| e.strip_suffix('"'))
        .or_else(|| expr.strip_prefix('\'').and_then(|e| e.strip_suffix('\'')));
    if let Some(literal) = unquoted {
        return literal.to_string();
    }
    let pointer: String = expr
        .split('.')
        .map(|part| format!("/{}", part.replace('~', "~0").replace('/', "~1")))
        .collect();
    match data.pointer(&pointer) {
        Some(value) => value.render(),
        None => expr.to_string(),
    }
}

fn query_pairs(request: &Value) -> Vec<(String, String)> {
    request
        .get("query")
        .and_then(Value::as_array)
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| {
                    let k = pair.get(0)?.as_str()?;
                    let v = pair.get(1)?.as_str()?;
                    Some((k.to_string(), v.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `{{get_view_url object}}` and friends: URL of an object through the descriptor registered
/// for its kind.
pub struct ObjectUrl {
    pub registry: Arc<Registry>,
    pub urls: Arc<dyn Reverse>,
    pub action: Action,
}

impl HelperDef for ObjectUrl {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let instance = h
            .param(0)
            .and_then(|p| Instance::from_context(p.value()))
            .ok_or_else(|| other(format!("{} expects an object", h.name())))?;
        let web = self
            .registry
            .resolve_by_instance(&instance)
            .map_err(|e| other(e.to_string()))?;
        let urls = self.urls.as_ref();
        let url = match self.action {
            Action::Edit => web.edit_url(urls, &instance),
            Action::Delete => web.delete_url(urls, &instance),
            _ => web.view_url(urls, &instance),
        }
        .map_err(|e| other(e.to_string()))?;
        out.write(&url)?;
        Ok(())
    }
}

/// Renders a fragment template with a context built from the helper's first argument.
pub struct Fragment {
    pub template: &'static str,
    pub build: fn(&Value) -> Result<Value, String>,
}

impl HelperDef for Fragment {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let arg = h.param(0).map(|p| p.value().clone()).unwrap_or(Value::Null);
        let ctx = (self.build)(&arg).map_err(other)?;
        let html = r.render(self.template, &ctx)?;
        out.write(&html)?;
        Ok(())
    }
}

pub fn breadcrumbs_fragment(arg: &Value) -> Result<Value, String> {
    let trail: Vec<Breadcrumb> = match arg {
        Value::Null => Vec::new(),
        other => serde_json::from_value(other.clone()).map_err(|e| format!("show_breadcrumbs: {}", e))?,
    };
    Ok(show_breadcrumbs(&trail))
}

pub fn error_list_fragment(arg: &Value) -> Result<Value, String> {
    let errors: Vec<String> = match arg {
        Value::Null => Vec::new(),
        other => serde_json::from_value(other.clone()).map_err(|e| format!("show_error_list: {}", e))?,
    };
    Ok(show_error_list(&errors))
}

/// Buttons and pagination arrive as ready-made contexts.
pub fn passthrough_fragment(arg: &Value) -> Result<Value, String> {
    Ok(arg.clone())
}
