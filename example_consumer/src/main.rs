//! Example consumer: serves list/view/add/edit/delete pages with webs-sdk.
//!
//! Run from repo root: `cargo run -p example-consumer`
//!
//! Without `WEBS_CONFIG_PATH` a code-defined `note` web backed by the in-memory store is served.
//! With it, every configured web is served; set `DATABASE_URL` to store rows in PostgreSQL.

use async_trait::async_trait;
use axum::{Extension, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use webs_sdk::config::FieldKind;
use webs_sdk::{
    apply_migrations, common_routes, load_from_path, resolve, web_routes, AppState, BoundForm, Descriptor, FieldSpec,
    FormSpec, Instance, MemoryStore, PgStore, PrefixUrls, Registry, Settings, Store, TemplateEngine, User,
};

/// Notes have a required title; the body is optional and trimmed before saving.
struct Note {
    form: FormSpec,
}

impl Note {
    fn new() -> Self {
        Note {
            form: FormSpec::new(vec![
                FieldSpec::new("title", FieldKind::Text).required(),
                FieldSpec::new("body", FieldKind::Textarea),
                FieldSpec::new("pinned", FieldKind::Boolean),
            ]),
        }
    }
}

#[async_trait]
impl Descriptor for Note {
    fn web_id(&self) -> &str {
        "note"
    }

    fn app_label(&self) -> &str {
        "notes"
    }

    fn form(&self) -> &FormSpec {
        &self.form
    }

    async fn pre_save(&self, instance: &mut Instance, _form: &BoundForm) -> bool {
        if let Some(body) = instance.get("body").and_then(|v| v.as_str()).map(str::trim) {
            let body = body.to_string();
            instance.fields.insert("body".into(), body.into());
        }
        true
    }

    async fn check_delete(&self, instance: &Instance) -> Result<Vec<String>, webs_sdk::AppError> {
        if instance.get("pinned").and_then(|v| v.as_bool()) == Some(true) {
            return Ok(vec!["Unpin the note before deleting it".to_string()]);
        }
        Ok(Vec::new())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("webs_sdk=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let (registry, store): (Registry, Arc<dyn Store>) = match &settings.config_path {
        Some(path) => {
            let config = load_from_path(path).await?;
            let site = resolve(&config)?;
            let store: Arc<dyn Store> = match &settings.database_url {
                Some(url) => {
                    let pool = sqlx::postgres::PgPoolOptions::new()
                        .max_connections(5)
                        .connect(url)
                        .await?;
                    apply_migrations(&pool, &config).await?;
                    Arc::new(PgStore::new(pool, site.tables))
                }
                None => Arc::new(MemoryStore::new()),
            };
            (site.registry, store)
        }
        None => {
            let mut registry = Registry::new();
            registry.register(Arc::new(Note::new()))?;
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            (registry, store)
        }
    };

    let registry = Arc::new(registry);
    let urls = Arc::new(PrefixUrls::new(&settings.mount));
    let mut engine = TemplateEngine::new(registry.clone(), urls.clone())?;
    if let Some(dir) = &settings.template_dir {
        let loaded = engine.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), loaded, "loaded templates");
    }
    let state = AppState::new(registry, store, Arc::new(engine), urls).with_redirect_policy(settings.redirect_policy);

    let webs = if settings.mount.is_empty() {
        web_routes(state)
    } else {
        Router::new().nest(&settings.mount, web_routes(state))
    };
    // Stand-in for a session layer: every request acts as a superuser.
    let app = common_routes()
        .merge(webs)
        .layer(Extension(User::superuser("demo")));

    let listener = TcpListener::bind(&settings.bind).await?;
    tracing::info!("Example consumer listening on http://{}{}/", listener.local_addr()?, settings.mount);
    axum::serve(listener, app).await?;
    Ok(())
}
