//! Action results: a page to render or a redirect.

use axum::http::StatusCode;
use serde_json::Value;

/// A page to be rendered with the first template in `templates` that exists.
#[derive(Clone, Debug)]
pub struct TemplateResponse {
    pub status: StatusCode,
    pub templates: Vec<String>,
    pub context: Value,
}

impl TemplateResponse {
    pub fn ok(templates: Vec<String>, context: Value) -> Self {
        TemplateResponse {
            status: StatusCode::OK,
            templates,
            context,
        }
    }

    pub fn forbidden(templates: Vec<String>, context: Value) -> Self {
        TemplateResponse {
            status: StatusCode::FORBIDDEN,
            templates,
            context,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Outcome {
    Render(TemplateResponse),
    /// See Other to the given URL.
    Redirect(String),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Render(page) => page.status,
            Outcome::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(url) => Some(url),
            Outcome::Render(_) => None,
        }
    }

    pub fn page(&self) -> Option<&TemplateResponse> {
        match self {
            Outcome::Render(page) => Some(page),
            Outcome::Redirect(_) => None,
        }
    }
}
