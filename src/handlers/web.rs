//! HTTP handlers: resolve the descriptor from the URL prefix, load the object, run the action.

use crate::descriptor::Descriptor;
use crate::error::AppError;
use crate::extractors::WebRequest;
use crate::model::{Action, Instance};
use crate::response::{Outcome, TemplateResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::{json, Map};
use std::sync::Arc;

async fn load(state: &AppState, web: &Arc<dyn Descriptor>, pk: &str) -> Result<Instance, AppError> {
    state
        .store
        .get(web.web_id(), pk)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", web.verbose_name(), pk)))
}

/// Home page: every web the user may list.
pub async fn index(State(state): State<AppState>, req: WebRequest) -> Result<Response, AppError> {
    let mut webs = Vec::new();
    for id in state.registry.ids() {
        let web = state.registry.resolve(id)?;
        if web.has_perms(&req.user, Action::List) {
            webs.push(json!({
                "web_id": id,
                "verbose_name_plural": web.verbose_name_plural(),
                "list_url": web.list_url(state.urls.as_ref())?,
            }));
        }
    }
    let breadcrumbs = json!([{ "url": state.urls.reverse("root", &[])?, "name": "Home" }]);
    let page = TemplateResponse::ok(
        vec!["webs/index.html".to_string()],
        json!({
            "webs": webs,
            "breadcrumbs": breadcrumbs,
            "request": req.to_context(),
            "user": req.user.to_context(),
        }),
    );
    state.respond(Outcome::Render(page))
}

pub async fn list(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
    req: WebRequest,
) -> Result<Response, AppError> {
    let web = state.registry.resolve_by_prefix(&prefix)?;
    let rows = state.store.all(web.web_id()).await?;
    let table = web.table(rows);
    let outcome = state
        .crud(web.as_ref())
        .object_list(&req, None, table, None, Map::new())
        .await?;
    state.respond(outcome)
}

pub async fn view(
    State(state): State<AppState>,
    Path((prefix, pk)): Path<(String, String)>,
    req: WebRequest,
) -> Result<Response, AppError> {
    let web = state.registry.resolve_by_prefix(&prefix)?;
    let instance = load(&state, &web, &pk).await?;
    let outcome = state.crud(web.as_ref()).object_view(&req, &instance, None).await?;
    state.respond(outcome)
}

pub async fn add(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
    req: WebRequest,
) -> Result<Response, AppError> {
    let web = state.registry.resolve_by_prefix(&prefix)?;
    let outcome = state.crud(web.as_ref()).object_add(&req, None).await?;
    state.respond(outcome)
}

pub async fn edit(
    State(state): State<AppState>,
    Path((prefix, pk)): Path<(String, String)>,
    req: WebRequest,
) -> Result<Response, AppError> {
    let web = state.registry.resolve_by_prefix(&prefix)?;
    let instance = load(&state, &web, &pk).await?;
    let outcome = state.crud(web.as_ref()).object_edit(&req, &instance, None).await?;
    state.respond(outcome)
}

pub async fn delete(
    State(state): State<AppState>,
    Path((prefix, pk)): Path<(String, String)>,
    req: WebRequest,
) -> Result<Response, AppError> {
    let web = state.registry.resolve_by_prefix(&prefix)?;
    let instance = load(&state, &web, &pk).await?;
    let outcome = state.crud(web.as_ref()).object_delete(&req, &instance, None).await?;
    state.respond(outcome)
}
