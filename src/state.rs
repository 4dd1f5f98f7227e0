//! Shared application state for all routes.

use crate::descriptor::Descriptor;
use crate::error::AppError;
use crate::registry::Registry;
use crate::render::Renderer;
use crate::response::Outcome;
use crate::service::CrudService;
use crate::settings::RedirectPolicy;
use crate::store::Store;
use crate::urls::Reverse;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub store: Arc<dyn Store>,
    pub renderer: Arc<dyn Renderer>,
    pub urls: Arc<dyn Reverse>,
    pub redirect_policy: RedirectPolicy,
}

impl AppState {
    pub fn new(
        registry: Arc<Registry>,
        store: Arc<dyn Store>,
        renderer: Arc<dyn Renderer>,
        urls: Arc<dyn Reverse>,
    ) -> Self {
        AppState {
            registry,
            store,
            renderer,
            urls,
            redirect_policy: RedirectPolicy::default(),
        }
    }

    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// Actions for `web` backed by this state's store and URL reverser.
    pub fn crud<'a>(&'a self, web: &'a dyn Descriptor) -> CrudService<'a> {
        CrudService::new(web, self.store.as_ref(), self.urls.as_ref()).with_redirect_policy(self.redirect_policy)
    }

    /// Render a page outcome to HTML, or issue a 303 redirect.
    pub fn respond(&self, outcome: Outcome) -> Result<Response, AppError> {
        match outcome {
            Outcome::Render(page) => {
                let body = self.renderer.render_first(&page.templates, &page.context)?;
                Ok((page.status, Html(body)).into_response())
            }
            Outcome::Redirect(url) => {
                let location = HeaderValue::try_from(url.as_str())
                    .map_err(|_| AppError::BadRequest(format!("invalid redirect target: {:?}", url)))?;
                Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
            }
        }
    }
}
