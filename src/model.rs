//! Model-facing types: dynamic instances, the requesting user, and the five actions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// One of the five conventional operations a descriptor supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    View,
    Add,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::View => "view",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model record owned by the persistence layer.
///
/// `kind` is the descriptor key: the id of the descriptor responsible for this record.
/// A record without a primary key has not been saved yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub kind: String,
    #[serde(default)]
    pub pk: Option<Value>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Instance {
    pub fn new(kind: impl Into<String>) -> Self {
        Instance {
            kind: kind.into(),
            pk: None,
            fields: Map::new(),
        }
    }

    pub fn with_pk(kind: impl Into<String>, pk: impl Into<Value>) -> Self {
        Instance {
            kind: kind.into(),
            pk: Some(pk.into()),
            fields: Map::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn descriptor_key(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn is_saved(&self) -> bool {
        self.pk.as_ref().map(|v| !v.is_null()).unwrap_or(false)
    }

    /// Primary key as a URL path argument. Strings are used verbatim, numbers in decimal.
    pub fn pk_string(&self) -> Option<String> {
        match self.pk.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Context representation consumed by templates and template helpers.
    pub fn to_context(&self) -> Value {
        serde_json::json!({
            "kind": self.kind,
            "pk": self.pk.clone().unwrap_or(Value::Null),
            "label": self.to_string(),
            "fields": self.fields,
        })
    }

    /// Rebuild an instance from its context representation (as seen by template helpers).
    pub fn from_context(value: &Value) -> Option<Instance> {
        let obj = value.as_object()?;
        let kind = obj.get("kind")?.as_str()?.to_string();
        let pk = obj.get("pk").cloned().filter(|v| !v.is_null());
        let fields = obj
            .get("fields")
            .and_then(|f| f.as_object())
            .cloned()
            .unwrap_or_default();
        Some(Instance { kind, pk, fields })
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in ["name", "title"] {
            if let Some(Value::String(s)) = self.fields.get(key) {
                if !s.is_empty() {
                    return f.write_str(s);
                }
            }
        }
        match self.pk_string() {
            Some(pk) => write!(f, "{} {}", self.kind, pk),
            None => write!(f, "new {}", self.kind),
        }
    }
}

/// The requesting user as seen by permission predicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum User {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
        permissions: HashSet<String>,
        is_superuser: bool,
    },
}

impl User {
    pub fn authenticated<I, S>(username: &str, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        User::Authenticated {
            username: username.to_string(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            is_superuser: false,
        }
    }

    pub fn superuser(username: &str) -> Self {
        User::Authenticated {
            username: username.to_string(),
            permissions: HashSet::new(),
            is_superuser: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, User::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            User::Anonymous => None,
            User::Authenticated { username, .. } => Some(username),
        }
    }

    /// Permission tokens look like `<app_label>.<action>_<perm_id>`. Superusers hold all of them.
    pub fn has_perm(&self, token: &str) -> bool {
        match self {
            User::Anonymous => false,
            User::Authenticated {
                permissions,
                is_superuser,
                ..
            } => *is_superuser || permissions.contains(token),
        }
    }

    pub fn to_context(&self) -> Value {
        serde_json::json!({
            "is_authenticated": self.is_authenticated(),
            "username": self.username(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_name_then_title_then_pk() {
        let named = Instance::with_pk("book", 3).field("name", "Dune");
        assert_eq!(named.to_string(), "Dune");
        let titled = Instance::with_pk("book", 3).field("title", "Emma");
        assert_eq!(titled.to_string(), "Emma");
        assert_eq!(Instance::with_pk("book", 3).to_string(), "book 3");
        assert_eq!(Instance::new("book").to_string(), "new book");
    }

    #[test]
    fn context_representation_round_trips_kind_and_pk() {
        let inst = Instance::with_pk("book", "abc").field("name", "Dune");
        let back = Instance::from_context(&inst.to_context()).unwrap();
        assert_eq!(back, inst);
        assert_eq!(back.pk_string().as_deref(), Some("abc"));
    }

    #[test]
    fn permission_tokens() {
        let user = User::authenticated("ann", ["library.add_book"]);
        assert!(user.has_perm("library.add_book"));
        assert!(!user.has_perm("library.delete_book"));
        assert!(!User::Anonymous.has_perm("library.add_book"));
        assert!(User::superuser("root").has_perm("anything.at_all"));
    }
}
