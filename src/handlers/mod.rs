//! HTTP handlers for the generic web actions.

pub mod web;
pub use web::*;
