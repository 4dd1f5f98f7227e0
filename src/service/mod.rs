//! Generic actions, model forms and field validation.

mod crud;
mod form;
mod validation;

pub use crud::{CrudService, ERROR_TEMPLATE};
pub use form::{BoundForm, FieldSpec, FormSpec};
pub use validation::FieldValidator;
