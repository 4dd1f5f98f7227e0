//! URL reversal: named routes to paths, mirroring the layout mounted by `web_routes`.

use crate::error::AppError;

/// Reverse a route name (plus positional arguments) to a URL path.
pub trait Reverse: Send + Sync {
    fn reverse(&self, name: &str, args: &[&str]) -> Result<String, AppError>;
}

/// Default reverser for routes mounted at `mount` (e.g. "" or "/admin"):
///
/// | name               | path                        |
/// |--------------------|-----------------------------|
/// | `root`             | `{mount}/`                  |
/// | `<prefix>_list`    | `{mount}/<prefix>/`         |
/// | `<prefix>_add`     | `{mount}/<prefix>/add/`     |
/// | `<prefix>_detail`  | `{mount}/<prefix>/<pk>/`    |
/// | `<prefix>_edit`    | `{mount}/<prefix>/<pk>/edit/`   |
/// | `<prefix>_delete`  | `{mount}/<prefix>/<pk>/delete/` |
#[derive(Clone, Debug, Default)]
pub struct PrefixUrls {
    mount: String,
}

impl PrefixUrls {
    pub fn new(mount: &str) -> Self {
        PrefixUrls {
            mount: mount.trim_end_matches('/').to_string(),
        }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }
}

impl Reverse for PrefixUrls {
    fn reverse(&self, name: &str, args: &[&str]) -> Result<String, AppError> {
        let no_match = || AppError::NoReverseMatch(format!("{} {:?}", name, args));
        if name == "root" {
            return if args.is_empty() {
                Ok(format!("{}/", self.mount))
            } else {
                Err(no_match())
            };
        }
        let (prefix, action) = ["_list", "_add", "_detail", "_edit", "_delete"]
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix).map(|p| (p, *suffix)))
            .filter(|(p, _)| !p.is_empty())
            .ok_or_else(no_match)?;
        let prefix = urlencoding::encode(prefix);
        match (action, args) {
            ("_list", []) => Ok(format!("{}/{}/", self.mount, prefix)),
            ("_add", []) => Ok(format!("{}/{}/add/", self.mount, prefix)),
            ("_detail", [pk]) => Ok(format!("{}/{}/{}/", self.mount, prefix, urlencoding::encode(pk))),
            ("_edit", [pk]) => Ok(format!("{}/{}/{}/edit/", self.mount, prefix, urlencoding::encode(pk))),
            ("_delete", [pk]) => Ok(format!("{}/{}/{}/delete/", self.mount, prefix, urlencoding::encode(pk))),
            _ => Err(no_match()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_conventional_names() {
        let urls = PrefixUrls::new("/admin/");
        assert_eq!(urls.reverse("root", &[]).unwrap(), "/admin/");
        assert_eq!(urls.reverse("book_author_list", &[]).unwrap(), "/admin/book_author/");
        assert_eq!(urls.reverse("book_add", &[]).unwrap(), "/admin/book/add/");
        assert_eq!(urls.reverse("book_detail", &["7"]).unwrap(), "/admin/book/7/");
        assert_eq!(urls.reverse("book_edit", &["7"]).unwrap(), "/admin/book/7/edit/");
        assert_eq!(urls.reverse("book_delete", &["a b"]).unwrap(), "/admin/book/a%20b/delete/");
    }

    #[test]
    fn unknown_names_and_wrong_arity_fail() {
        let urls = PrefixUrls::default();
        assert!(matches!(urls.reverse("book_publish", &[]), Err(AppError::NoReverseMatch(_))));
        assert!(urls.reverse("book_detail", &[]).is_err());
        assert!(urls.reverse("book_list", &["1"]).is_err());
        assert!(urls.reverse("_list", &[]).is_err());
    }
}
