//! Naming conventions: identifiers (snake_case) to human-readable names and labels.

/// Turn an identifier into a verbose name by replacing underscores with spaces.
/// e.g. "book_author" -> "book author"
pub fn to_verbose(s: &str) -> String {
    s.replace('_', " ")
}

/// Naive plural used when no explicit plural is configured.
/// e.g. "book author" -> "book authors"
pub fn pluralize(s: &str) -> String {
    format!("{}s", s)
}

/// Uppercase the first character, leaving the rest untouched.
/// e.g. "first name" -> "First name"
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Default form label for a field name.
/// e.g. "published_on" -> "Published on"
pub fn field_label(name: &str) -> String {
    capfirst(&to_verbose(name))
}
