//! Request extractors.

mod request;
mod user;

pub use request::WebRequest;
pub use user::CurrentUser;
