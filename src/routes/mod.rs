//! Routers.

mod common;
mod web;

pub use common::common_routes;
pub use web::web_routes;
