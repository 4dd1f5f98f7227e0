//! Web routes: list, add, view, edit and delete for every registered descriptor, keyed by URL prefix.

use crate::handlers::web::{add, delete, edit, index, list, view};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Form submissions larger than this are rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn web_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/:prefix/", get(list))
        .route("/:prefix/add/", get(add).post(add))
        .route("/:prefix/:pk/", get(view))
        .route("/:prefix/:pk/edit/", get(edit).post(edit))
        .route("/:prefix/:pk/delete/", get(delete).post(delete))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{from_json_str, resolve};
    use crate::model::{Instance, User};
    use crate::render::TemplateEngine;
    use crate::store::{MemoryStore, Store};
    use crate::urls::PrefixUrls;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Extension,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const CONFIG: &str = r#"{"webs": [{
        "web_id": "book", "app_label": "library", "url_prefix": "books", "label_field": "title",
        "table": {"name": "books"},
        "fields": [
            {"name": "title", "validation": {"required": true}},
            {"name": "on_loan", "type": "boolean"}
        ],
        "delete_blockers": [{"field": "on_loan", "message": "Book is on loan"}]
    }]}"#;

    async fn setup() -> (AppState, Arc<MemoryStore>) {
        let site = resolve(&from_json_str(CONFIG).unwrap()).unwrap();
        let registry = Arc::new(site.registry);
        let urls = Arc::new(PrefixUrls::default());
        let renderer = Arc::new(TemplateEngine::new(registry.clone(), urls.clone()).unwrap());
        let store = Arc::new(MemoryStore::new());
        let mut dune = Instance::new("book").field("title", "Dune").field("on_loan", false);
        store.save(&mut dune).await.unwrap();
        let state = AppState::new(registry, store.clone(), renderer, urls);
        (state, store)
    }

    fn app(state: AppState, user: User) -> Router {
        web_routes(state).layer(Extension(user))
    }

    async fn body_text(res: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_page_links_each_row() {
        let (state, _) = setup().await;
        let res = app(state, User::Anonymous).oneshot(get("/books/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains(r#"<a href="/books/1/">Dune</a>"#), "{html}");
        assert!(!html.contains("addlink"));
    }

    #[tokio::test]
    async fn index_lists_registered_webs() {
        let (state, _) = setup().await;
        let res = app(state, User::Anonymous).oneshot(get("/")).await.unwrap();
        let html = body_text(res).await;
        assert!(html.contains(r#"<a href="/books/">books</a>"#), "{html}");
    }

    #[tokio::test]
    async fn unknown_prefix_or_pk_is_not_found() {
        let (state, _) = setup().await;
        let router = app(state, User::Anonymous);
        let res = router.clone().oneshot(get("/shelves/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = router.clone().oneshot(get("/books/42/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = router.oneshot(get("/books/abc/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn anonymous_add_is_forbidden() {
        let (state, store) = setup().await;
        let res = app(state, User::Anonymous)
            .oneshot(post("/books/add/", "title=Emma"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let html = body_text(res).await;
        assert!(html.contains("You cannot add a book object"));
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.len("book"), 1);
    }

    #[tokio::test]
    async fn add_redirects_with_see_other() {
        let (state, store) = setup().await;
        let res = app(state, User::superuser("root"))
            .oneshot(post("/books/add/?next=%2Fbooks%2F", "title=Emma"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/books/");
        assert_eq!(store.len("book"), 2);
    }

    #[tokio::test]
    async fn edit_form_shows_current_values() {
        let (state, _) = setup().await;
        let res = app(state, User::authenticated("ed", ["library.edit_book"]))
            .oneshot(get("/books/1/edit/"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains(r#"name="title" id="id_title" value="Dune""#), "{html}");
    }

    #[tokio::test]
    async fn blocked_delete_explains_why() {
        let (state, store) = setup().await;
        let mut lent = store.get("book", "1").await.unwrap().unwrap();
        lent.fields.insert("on_loan".into(), serde_json::json!(true));
        store.save(&mut lent).await.unwrap();

        let res = app(state, User::superuser("root"))
            .oneshot(post("/books/1/delete/", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains("<li>Book is on loan</li>"));
        assert_eq!(store.delete_count(), 0);
    }

    #[tokio::test]
    async fn delete_redirects_to_list() {
        let (state, store) = setup().await;
        let res = app(state, User::superuser("root"))
            .oneshot(post("/books/1/delete/", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/books/");
        assert_eq!(store.len("book"), 0);
    }

    #[tokio::test]
    async fn malformed_next_redirects_to_the_default() {
        let (state, store) = setup().await;
        let state = state.with_redirect_policy(crate::settings::RedirectPolicy::SameOrigin);
        let res = app(state, User::superuser("root"))
            .oneshot(post("/books/1/delete/?next=%2F%0Aevil", ""))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/books/");
        assert_eq!(store.len("book"), 0);
    }

    #[tokio::test]
    async fn malformed_next_on_add_is_not_followed() {
        let (state, store) = setup().await;
        let res = app(state, User::superuser("root"))
            .oneshot(post("/books/add/?next=%2Fbooks%2F%0D%0AX-Evil%3A%201", "title=Emma"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/books/2/");
        assert_eq!(store.len("book"), 2);
    }
}
