//! Breadcrumb trails and action buttons.

use serde::{Deserialize, Serialize};

/// One step of navigational ancestry. The last crumb of a trail is the current page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub url: String,
    pub name: String,
}

impl Breadcrumb {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Breadcrumb {
            url: url.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub class: String,
    pub text: String,
    pub url: String,
}

impl Button {
    pub fn new(class: &str, text: impl Into<String>, url: String) -> Self {
        Button {
            class: class.to_string(),
            text: text.into(),
            url,
        }
    }
}
