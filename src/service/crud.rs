//! CrudService: the generic list/view/add/edit/delete actions driven by a descriptor.
//!
//! Every action builds its breadcrumb trail first, then checks permissions; a denied request
//! gets the 403 error page and no side effects. Actions return an [`Outcome`]; rendering is
//! left to [`crate::AppState::respond`].

use crate::descriptor::{Breadcrumb, Descriptor, Table};
use crate::error::AppError;
use crate::extractors::WebRequest;
use crate::model::{Action, Instance};
use crate::pagination::{Paginator, PER_PAGE};
use crate::render::{pagination_context, show_list_buttons, show_view_buttons};
use crate::response::{Outcome, TemplateResponse};
use crate::service::BoundForm;
use crate::settings::RedirectPolicy;
use crate::store::Store;
use crate::urls::Reverse;
use serde_json::{json, Map, Value};

pub const ERROR_TEMPLATE: &str = "webs/error.html";

pub struct CrudService<'a> {
    web: &'a dyn Descriptor,
    store: &'a dyn Store,
    urls: &'a dyn Reverse,
    redirect_policy: RedirectPolicy,
}

impl<'a> CrudService<'a> {
    pub fn new(web: &'a dyn Descriptor, store: &'a dyn Store, urls: &'a dyn Reverse) -> Self {
        CrudService {
            web,
            store,
            urls,
            redirect_policy: RedirectPolicy::default(),
        }
    }

    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// List page over `table`. `form` (a search/filter form) and `context` are optional; `context`
    /// entries override the defaults.
    pub async fn object_list(
        &self,
        req: &WebRequest,
        form: Option<&BoundForm>,
        table: Table,
        template: Option<&str>,
        context: Map<String, Value>,
    ) -> Result<Outcome, AppError> {
        let web = self.web;
        let breadcrumbs = web.list_breadcrumbs(self.urls)?;
        if let Some(denied) = self.check_perms(req, Action::List, &breadcrumbs) {
            return Ok(denied);
        }

        let rows = table
            .row_contexts()
            .into_iter()
            .zip(table.rows.iter())
            .map(|(mut row, instance)| {
                if let Some(obj) = row.as_object_mut() {
                    obj.insert("label".into(), Value::String(web.instance_label(instance)));
                    obj.insert("url".into(), json!(web.view_url(self.urls, instance).ok()));
                }
                row
            })
            .collect();
        let paginator = Paginator::new(rows, PER_PAGE);
        let page = paginator.page_from_query(req.query_value("page"));

        let mut ctx = self.base_context(req, breadcrumbs);
        ctx.insert("table".into(), table.to_context());
        ctx.insert("pagination".into(), pagination_context(&page, &req.query));
        ctx.insert("page_obj".into(), serde_json::to_value(&page).unwrap_or(Value::Null));
        ctx.insert("tools".into(), show_list_buttons(web, self.urls, &req.user)?);
        if let Some(form) = form {
            ctx.insert("form".into(), form.to_context());
            ctx.insert("media".into(), json!(form.media()));
        }
        ctx.extend(context);

        tracing::debug!(web_id = %web.web_id(), page = page.number, rows = page.count, "object list");
        Ok(self.page(template, "list", "object_list", ctx))
    }

    pub async fn object_view(
        &self,
        req: &WebRequest,
        instance: &Instance,
        template: Option<&str>,
    ) -> Result<Outcome, AppError> {
        let web = self.web;
        web.assert_instance_type(instance);
        let breadcrumbs = web.view_breadcrumbs(self.urls, instance)?;
        if let Some(denied) = self.check_perms(req, Action::View, &breadcrumbs) {
            return Ok(denied);
        }

        let fields: Vec<Value> = web
            .form()
            .for_instance(instance)
            .to_context()
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .map(|f| {
                        let value = match f.get("checkbox") {
                            Some(Value::Bool(true)) => {
                                json!(if f["checked"] == true { "yes" } else { "no" })
                            }
                            _ => f["value"].clone(),
                        };
                        json!({ "name": f["name"], "label": f["label"], "value": value })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut ctx = self.base_context(req, breadcrumbs);
        ctx.insert("object".into(), self.object_context(instance));
        ctx.insert("fields".into(), Value::Array(fields));
        ctx.insert("tools".into(), show_view_buttons(web, self.urls, &req.user, instance)?);
        Ok(self.page(template, "detail", "object_detail", ctx))
    }

    pub async fn object_add(&self, req: &WebRequest, template: Option<&str>) -> Result<Outcome, AppError> {
        let web = self.web;
        let breadcrumbs = web.add_breadcrumbs(self.urls)?;
        if let Some(denied) = self.check_perms(req, Action::Add, &breadcrumbs) {
            return Ok(denied);
        }

        let form = if req.is_post() {
            let form = web.form().bind(&req.form, web.new_instance());
            if let Some(url) = self.save_valid(req, &form).await? {
                return Ok(Outcome::Redirect(url));
            }
            form
        } else {
            let instance = web.new_instance();
            web.assert_instance_type(&instance);
            web.form().for_instance(&instance)
        };

        let mut ctx = self.base_context(req, breadcrumbs);
        ctx.insert("object".into(), Value::Null);
        self.insert_form(&mut ctx, &form);
        Ok(self.page(template, "edit", "object_edit", ctx))
    }

    pub async fn object_edit(
        &self,
        req: &WebRequest,
        instance: &Instance,
        template: Option<&str>,
    ) -> Result<Outcome, AppError> {
        let web = self.web;
        web.assert_instance_type(instance);
        let breadcrumbs = web.edit_breadcrumbs(self.urls, instance)?;
        if let Some(denied) = self.check_perms(req, Action::Edit, &breadcrumbs) {
            return Ok(denied);
        }

        let form = if req.is_post() {
            let form = web.form().bind(&req.form, instance.clone());
            if let Some(url) = self.save_valid(req, &form).await? {
                return Ok(Outcome::Redirect(url));
            }
            form
        } else {
            web.form().for_instance(instance)
        };

        let mut ctx = self.base_context(req, breadcrumbs);
        ctx.insert("object".into(), self.object_context(instance));
        self.insert_form(&mut ctx, &form);
        Ok(self.page(template, "edit", "object_edit", ctx))
    }

    pub async fn object_delete(
        &self,
        req: &WebRequest,
        instance: &Instance,
        template: Option<&str>,
    ) -> Result<Outcome, AppError> {
        let web = self.web;
        web.assert_instance_type(instance);
        let breadcrumbs = web.delete_breadcrumbs(self.urls, instance)?;
        if let Some(denied) = self.check_perms(req, Action::Delete, &breadcrumbs) {
            return Ok(denied);
        }

        let mut errorlist = Vec::new();
        if req.is_post() {
            errorlist = web.check_delete(instance).await?;
            if errorlist.is_empty() {
                let url = self
                    .redirect_policy
                    .choose(req.next(), web.delete_finished_url(self.urls, instance)?);
                self.store.delete(instance).await?;
                tracing::info!(web_id = %web.web_id(), pk = ?instance.pk_string(), "deleted");
                return Ok(Outcome::Redirect(url));
            }
            tracing::warn!(web_id = %web.web_id(), pk = ?instance.pk_string(), reasons = ?errorlist, "delete blocked");
        }

        let mut ctx = self.base_context(req, breadcrumbs);
        ctx.insert("object".into(), self.object_context(instance));
        ctx.insert("errorlist".into(), json!(errorlist));
        Ok(self.page(template, "confirm_delete", "object_confirm_delete", ctx))
    }

    /// Run pre_save and persist a valid form. Returns the redirect target, or None when the form
    /// is invalid or the hook vetoed the save.
    async fn save_valid(&self, req: &WebRequest, form: &BoundForm) -> Result<Option<String>, AppError> {
        if !form.is_valid() {
            tracing::debug!(web_id = %self.web.web_id(), errors = ?form.errors(), "form invalid");
            return Ok(None);
        }
        let mut instance = form.construct_instance();
        if !self.web.pre_save(&mut instance, form).await {
            tracing::debug!(web_id = %self.web.web_id(), "pre_save declined");
            return Ok(None);
        }
        self.store.save(&mut instance).await?;
        tracing::info!(web_id = %self.web.web_id(), pk = ?instance.pk_string(), "saved");
        let url = self
            .redirect_policy
            .choose(req.next(), self.web.edit_finished_url(self.urls, &instance)?);
        Ok(Some(url))
    }

    fn check_perms(&self, req: &WebRequest, action: Action, breadcrumbs: &[Breadcrumb]) -> Option<Outcome> {
        if self.web.has_perms(&req.user, action) {
            return None;
        }
        tracing::warn!(
            web_id = %self.web.web_id(),
            action = %action,
            user = ?req.user.username(),
            "permission denied"
        );
        Some(Outcome::Render(TemplateResponse::forbidden(
            vec![ERROR_TEMPLATE.to_string()],
            json!({
                "title": "Access denied",
                "error_list": [self.web.denied_message(action)],
                "breadcrumbs": breadcrumbs,
                "request": req.to_context(),
                "user": req.user.to_context(),
            }),
        )))
    }

    fn base_context(&self, req: &WebRequest, breadcrumbs: Vec<Breadcrumb>) -> Map<String, Value> {
        let web = self.web;
        let mut ctx = Map::new();
        ctx.insert("request".into(), req.to_context());
        ctx.insert("user".into(), req.user.to_context());
        ctx.insert(
            "web".into(),
            json!({
                "web_id": web.web_id(),
                "app_label": web.app_label(),
                "verbose_name": web.verbose_name(),
                "verbose_name_plural": web.verbose_name_plural(),
                "url_prefix": web.url_prefix(),
            }),
        );
        ctx.insert("breadcrumbs".into(), json!(breadcrumbs));
        ctx
    }

    fn object_context(&self, instance: &Instance) -> Value {
        let mut ctx = instance.to_context();
        if let Some(obj) = ctx.as_object_mut() {
            obj.insert("label".into(), Value::String(self.web.instance_label(instance)));
        }
        ctx
    }

    fn insert_form(&self, ctx: &mut Map<String, Value>, form: &BoundForm) {
        let errors: Vec<&String> = form.errors().values().flatten().collect();
        ctx.insert("form".into(), form.to_context());
        ctx.insert("media".into(), json!(form.media()));
        ctx.insert("error_list".into(), json!(errors));
    }

    /// Explicit template, or `<app_label>/<template_prefix>_<suffix>.html` then `webs/<fallback>.html`.
    fn page(&self, template: Option<&str>, suffix: &str, fallback: &str, ctx: Map<String, Value>) -> Outcome {
        let templates = match template {
            Some(t) => vec![t.to_string()],
            None => vec![
                format!("{}/{}_{}.html", self.web.app_label(), self.web.template_prefix(), suffix),
                format!("webs/{}.html", fallback),
            ],
        };
        Outcome::Render(TemplateResponse::ok(templates, Value::Object(ctx)))
    }
}
