//! Field validation from config rules. Errors are collected per field, not short-circuited.

use crate::config::ValidationRule;
use regex::Regex;
use serde_json::Value;

pub struct FieldValidator;

impl FieldValidator {
    /// Check one cleaned value against its rule. Returns every message that applies.
    pub fn validate(label: &str, v: &Value, rule: &ValidationRule) -> Vec<String> {
        let mut errors = Vec::new();
        if is_blank(v) {
            if rule.required == Some(true) {
                errors.push(format!("{} is required", label));
            }
            return errors;
        }
        if let Some(format) = &rule.format {
            if let Some(msg) = check_format(label, v, format) {
                errors.push(msg);
            }
        }
        if let Some(s) = v.as_str() {
            let len = s.chars().count();
            if let Some(max) = rule.max_length {
                if len > max as usize {
                    errors.push(format!("{} must be at most {} characters", label, max));
                }
            }
            if let Some(min) = rule.min_length {
                if len < min as usize {
                    errors.push(format!("{} must be at least {} characters", label, min));
                }
            }
            if let Some(pattern) = &rule.pattern {
                match Regex::new(pattern) {
                    Ok(re) if !re.is_match(s) => {
                        errors.push(format!("{} does not match required pattern", label))
                    }
                    Ok(_) => {}
                    Err(_) => errors.push(format!("invalid pattern for {}", label)),
                }
            }
        }
        if let Some(allowed) = &rule.allowed {
            if !allowed.iter().any(|a| value_eq(v, a)) {
                errors.push(format!(
                    "{} must be one of: {:?}",
                    label,
                    allowed.iter().take(5).collect::<Vec<_>>()
                ));
            }
        }
        if let Some(n) = v.as_f64() {
            if let Some(min) = rule.minimum {
                if n < min {
                    errors.push(format!("{} must be at least {}", label, min));
                }
            }
            if let Some(max) = rule.maximum {
                if n > max {
                    errors.push(format!("{} must be at most {}", label, max));
                }
            }
        }
        errors
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn check_format(label: &str, v: &Value, format: &str) -> Option<String> {
    let s = v.as_str()?;
    match format.to_lowercase().as_str() {
        "email" => {
            let ok = s
                .split_once('@')
                .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            (!ok).then(|| format!("{} must be a valid email", label))
        }
        "uuid" => uuid::Uuid::parse_str(s)
            .is_err()
            .then(|| format!("{} must be a valid UUID", label)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_blank_short_circuits_other_rules() {
        let rule = ValidationRule {
            required: Some(true),
            min_length: Some(3),
            ..Default::default()
        };
        assert_eq!(FieldValidator::validate("Title", &json!(""), &rule), vec!["Title is required"]);
        assert!(FieldValidator::validate("Title", &Value::Null, &ValidationRule::default()).is_empty());
    }

    #[test]
    fn collects_every_failure() {
        let rule = ValidationRule {
            max_length: Some(2),
            pattern: Some("^[0-9]+$".into()),
            ..Default::default()
        };
        let errs = FieldValidator::validate("Code", &json!("abc"), &rule);
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn numeric_bounds_and_allowed_values() {
        let rule = ValidationRule {
            minimum: Some(1.0),
            maximum: Some(5.0),
            ..Default::default()
        };
        assert!(FieldValidator::validate("Stars", &json!(3), &rule).is_empty());
        assert_eq!(FieldValidator::validate("Stars", &json!(9), &rule), vec!["Stars must be at most 5"]);

        let rule = ValidationRule {
            allowed: Some(vec![json!("a"), json!("b")]),
            ..Default::default()
        };
        assert!(FieldValidator::validate("Grade", &json!("a"), &rule).is_empty());
        assert_eq!(FieldValidator::validate("Grade", &json!("c"), &rule).len(), 1);
    }

    #[test]
    fn formats() {
        let email = ValidationRule {
            format: Some("email".into()),
            ..Default::default()
        };
        assert!(FieldValidator::validate("Email", &json!("a@b.org"), &email).is_empty());
        assert_eq!(FieldValidator::validate("Email", &json!("nope"), &email), vec!["Email must be a valid email"]);
    }
}
