//! Context builders for the shared page fragments (breadcrumbs, errors, buttons, pagination).

use crate::descriptor::{Breadcrumb, Descriptor};
use crate::error::AppError;
use crate::model::{Instance, User};
use crate::pagination::{Page, PageWindow};
use crate::querystring::url_with_param;
use crate::urls::Reverse;
use serde_json::{json, Value};

/// Split a trail into ancestors and the current page.
pub fn show_breadcrumbs(trail: &[Breadcrumb]) -> Value {
    match trail.split_last() {
        Some((last, ancestors)) => json!({ "breadcrumbs": ancestors, "object": last }),
        None => json!({ "breadcrumbs": [], "object": null }),
    }
}

pub fn show_error_list(errors: &[String]) -> Value {
    json!({ "error_list": errors })
}

pub fn show_list_buttons(web: &dyn Descriptor, urls: &dyn Reverse, user: &User) -> Result<Value, AppError> {
    Ok(json!({ "buttons": web.list_buttons(urls, user)? }))
}

pub fn show_view_buttons(
    web: &dyn Descriptor,
    urls: &dyn Reverse,
    user: &User,
    instance: &Instance,
) -> Result<Value, AppError> {
    Ok(json!({ "buttons": web.view_buttons(urls, user, instance)? }))
}

/// Page summary plus the page window, with each link carrying the current query string
/// with `page` replaced.
pub fn pagination_context(page: &Page, query: &[(String, String)]) -> Value {
    let link = |n: u32| url_with_param(query, &[("page".to_string(), n.to_string())]);
    let window = PageWindow::for_page(page);
    let mut ctx = window.to_context(page.number);
    if let Some(range) = ctx.get_mut("page_range").and_then(Value::as_array_mut) {
        for entry in range {
            let url = entry.get("page").and_then(Value::as_u64).map(|n| link(n as u32));
            if let Some(obj) = entry.as_object_mut() {
                obj.insert("url".into(), url.map(Value::String).unwrap_or(Value::Null));
            }
        }
    }
    if let Some(obj) = ctx.as_object_mut() {
        obj.insert("number".into(), json!(page.number));
        obj.insert("num_pages".into(), json!(page.num_pages));
        obj.insert("count".into(), json!(page.count));
        obj.insert("start_index".into(), json!(page.start_index));
        obj.insert("end_index".into(), json!(page.end_index));
        obj.insert("prev_url".into(), json!(window.prev.map(link)));
        obj.insert("next_url".into(), json!(window.next.map(link)));
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{Paginator, PER_PAGE};

    #[test]
    fn breadcrumbs_split_off_the_current_page() {
        let trail = vec![
            Breadcrumb::new("/", "Home"),
            Breadcrumb::new("/book/", "books"),
            Breadcrumb::new("/book/1/", "Dune"),
        ];
        let ctx = show_breadcrumbs(&trail);
        assert_eq!(ctx["breadcrumbs"].as_array().unwrap().len(), 2);
        assert_eq!(ctx["object"]["name"], "Dune");
        assert_eq!(show_breadcrumbs(&[])["object"], Value::Null);
    }

    #[test]
    fn pagination_links_keep_other_parameters() {
        let rows = (0..500).map(|i| json!(i)).collect();
        let page = Paginator::new(rows, PER_PAGE).page_from_query(Some("4"));
        let query = vec![("sort".to_string(), "title".to_string()), ("page".to_string(), "4".to_string())];
        let ctx = pagination_context(&page, &query);
        assert_eq!(ctx["pagination_required"], true);
        assert_eq!(ctx["number"], 4);
        assert_eq!(ctx["prev_url"], "?sort=title&page=3");
        assert_eq!(ctx["next_url"], "?sort=title&page=5");
        assert_eq!(ctx["page_range"][0]["url"], "?sort=title&page=1");
        let current: Vec<_> = ctx["page_range"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|e| e["current"] == true)
            .collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0]["page"], 4);
    }

    #[test]
    fn single_page_has_no_links() {
        let page = Paginator::new(vec![json!(1)], PER_PAGE).page_from_query(None);
        let ctx = pagination_context(&page, &[]);
        assert_eq!(ctx["pagination_required"], false);
        assert_eq!(ctx["prev_url"], Value::Null);
        assert_eq!(ctx["next_url"], Value::Null);
    }
}
