//! Webs SDK: descriptor-driven list/view/add/edit/delete scaffolding for model-backed objects.

pub mod case;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod pagination;
pub mod querystring;
pub mod registry;
pub mod render;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod urls;

pub use config::{load_from_path, resolve, FullConfig, ResolvedSite, WebConfig};
pub use descriptor::{Breadcrumb, Button, ConfigDescriptor, Descriptor, Table};
pub use error::{AppError, ConfigError};
pub use extractors::{CurrentUser, WebRequest};
pub use migration::apply_migrations;
pub use model::{Action, Instance, User};
pub use pagination::{Page, PageToken, PageWindow, Paginator, PER_PAGE};
pub use registry::{global, install, Registry};
pub use render::{Renderer, TemplateEngine};
pub use response::{Outcome, TemplateResponse};
pub use routes::{common_routes, web_routes};
pub use service::{BoundForm, CrudService, FieldSpec, FormSpec};
pub use settings::{RedirectPolicy, Settings};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store};
pub use urls::{PrefixUrls, Reverse};
