//! Request data the generic actions need: method, query and form pairs, user, path.

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::model::User;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::Method,
    Form,
};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct WebRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters in the order they were sent.
    pub query: Vec<(String, String)>,
    /// Urlencoded body pairs; empty unless the request is a POST.
    pub form: Vec<(String, String)>,
    pub user: User,
}

impl WebRequest {
    pub fn get(path: &str) -> Self {
        WebRequest {
            method: Method::GET,
            path: path.to_string(),
            query: Vec::new(),
            form: Vec::new(),
            user: User::Anonymous,
        }
    }

    pub fn post(path: &str, form: &[(&str, &str)]) -> Self {
        WebRequest {
            method: Method::POST,
            form: form.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..WebRequest::get(path)
        }
    }

    pub fn with_query(mut self, query: &[(&str, &str)]) -> Self {
        self.query = query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = user;
        self
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// Last value sent for `key` in the query string.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// The `?next=` redirect override.
    pub fn next(&self) -> Option<&str> {
        self.query_value("next")
    }

    pub fn to_context(&self) -> Value {
        let query: Vec<Value> = self
            .query
            .iter()
            .map(|(k, v)| serde_json::json!([k, v]))
            .collect();
        serde_json::json!({
            "method": self.method.as_str(),
            "path": self.path,
            "query": query,
            "user": self.user.to_context(),
        })
    }
}

#[async_trait]
impl<S> FromRequest<S> for WebRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, state)
            .await
            .unwrap_or_default();
        let Query(query) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let form = if method == Method::POST {
            let req = Request::from_parts(parts, body);
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            pairs
        } else {
            Vec::new()
        };
        Ok(WebRequest {
            method,
            path,
            query,
            form,
            user,
        })
    }
}
