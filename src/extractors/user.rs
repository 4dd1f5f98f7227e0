//! The requesting user, as placed in request extensions by an authentication layer.

use crate::model::User;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Extractor for the [`User`] stored in request extensions; anonymous when none was set.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<User>().cloned().unwrap_or_default()))
    }
}
