//! Built-in rule factories.
//!
//! ```
//! use formstate::validation::{Rules, rules};
//!
//! let username = Rules::new()
//!     .rule("required", rules::required())
//!     .rule("minLength", rules::min_length(3));
//! assert_eq!(username.len(), 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::Rule;
use crate::reactive::Signal;

/// Local part (dot-atom or quoted string) @ domain (hostname or bracketed
/// IPv4 / general address literal).
const EMAIL_PATTERN: &str = r##"^(?:[A-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9]{2,}(?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"##;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));

/// Whether a value counts as filled in.
///
/// `null`, empty strings, empty arrays and objects without keys are empty.
/// Booleans (including `false`) and numbers are always present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Length of a value: element count for arrays, key count for objects,
/// character count for everything else (numbers and booleans are measured
/// by their printed form).
pub fn len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Require a non-empty value. Strings are trimmed first.
pub fn required() -> Rule {
    Rule::from_fn(|value| match value {
        Value::String(s) => !s.trim().is_empty(),
        other => is_present(other),
    })
    .with_message("Value is required")
}

/// Require a syntactically valid email address. Empty values pass; combine
/// with [`required`] to force presence.
pub fn email() -> Rule {
    pattern_rule(&EMAIL).with_message("Value is not a valid email address")
}

/// Require at least `min` characters (or elements / keys). Empty values
/// pass. `min` may be a live [`Signal`].
pub fn min_length(min: impl Into<Signal<usize>>) -> Rule {
    let min = min.into();
    let current = min.get();
    let for_message = min.clone();
    Rule::from_fn(move |value| !is_present(value) || len(value) >= min.get())
        .with_param("min", current)
        .with_message_fn(move |_| {
            format!("This field should be at least {} long.", for_message.get())
        })
}

/// Require at most `max` characters (or elements / keys).
pub fn max_length(max: impl Into<Signal<usize>>) -> Rule {
    let max = max.into();
    let current = max.get();
    let for_message = max.clone();
    Rule::from_fn(move |value| !is_present(value) || len(value) <= max.get())
        .with_param("max", current)
        .with_message_fn(move |_| {
            format!("This field should be at most {} long.", for_message.get())
        })
}

/// Require the value to equal another field's current value.
///
/// The other field is looked up by name on the form each time the rule
/// runs, so edits to either field re-run it. Naming a field the form does
/// not have always fails.
pub fn same_as(other: impl Into<String>) -> Rule {
    let other = other.into();
    let message = format!("This needs to be the same as the {other} field.");
    let target = other.clone();
    Rule::new(move |value, form| match form.field(&target) {
        Some(field) => *value == field.model(),
        None => {
            log::warn!("same_as rule refers to unknown field '{}'", target);
            false
        }
    })
    .with_param("equalTo", other)
    .with_message(message)
}

/// Regex-based rule. Empty values pass.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regex.
pub fn pattern(pattern: &str) -> Rule {
    let re = Regex::new(pattern).expect("Invalid regex pattern");
    let source = re.as_str().to_string();
    Rule::from_fn(move |value| !is_present(value) || re.is_match(&as_text(value)))
        .with_param("pattern", source)
        .with_message("Value does not match the expected format")
}

fn pattern_rule(re: &'static Regex) -> Rule {
    Rule::from_fn(move |value| !is_present(value) || re.is_match(&as_text(value)))
}

/// Ad hoc rule from a value predicate and a fixed message.
pub fn custom<F>(message: impl Into<String>, predicate: F) -> Rule
where
    F: Fn(&Value) -> bool + 'static,
{
    Rule::from_fn(predicate).with_message(message)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::Form;

    fn check(rule: &Rule, value: Value) -> bool {
        rule.check(&value, &Form::detached())
    }

    #[test]
    fn test_required() {
        let rule = required();
        assert!(!check(&rule, json!(null)));
        assert!(!check(&rule, json!("")));
        assert!(!check(&rule, json!("   ")));
        assert!(!check(&rule, json!([])));
        assert!(!check(&rule, json!({})));
        assert!(check(&rule, json!(false)));
        assert!(check(&rule, json!(0)));
        assert!(check(&rule, json!("x")));
        assert!(check(&rule, json!([1])));
        assert!(check(&rule, json!({ "id": "2" })));
        assert_eq!(rule.message(), "Value is required");
    }

    #[test]
    fn test_email() {
        let rule = email();
        assert!(check(&rule, json!("")));
        assert!(check(&rule, json!(null)));
        assert!(check(&rule, json!("H@race.com")));
        assert!(check(&rule, json!("first.last+tag@sub.example.org")));
        assert!(check(&rule, json!("user@[192.168.0.1]")));
        assert!(!check(&rule, json!("inl@ne")));
        assert!(!check(&rule, json!("no-at-sign.com")));
        assert!(!check(&rule, json!("two@@example.com")));
        assert_eq!(rule.message(), "Value is not a valid email address");
    }

    #[test]
    fn test_min_length() {
        let rule = min_length(3);
        assert!(check(&rule, json!("")));
        assert!(!check(&rule, json!("ab")));
        assert!(check(&rule, json!("abc")));
        assert!(!check(&rule, json!([1, 2])));
        assert!(check(&rule, json!({ "a": 1, "b": 2, "c": 3 })));
        assert!(check(&rule, json!(12345)));
        assert_eq!(rule.param("min"), Some(&json!(3)));
        assert_eq!(rule.message(), "This field should be at least 3 long.");
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(check(&min_length(3), json!("héé")));
    }

    #[test]
    fn test_max_length() {
        let rule = max_length(2);
        assert!(check(&rule, json!("ab")));
        assert!(!check(&rule, json!("abc")));
        assert_eq!(rule.message(), "This field should be at most 2 long.");
    }

    #[test]
    fn test_pattern() {
        let rule = pattern(r"^\d+$");
        assert!(check(&rule, json!("")));
        assert!(check(&rule, json!("123")));
        assert!(check(&rule, json!(42)));
        assert!(!check(&rule, json!("12a")));
    }

    #[test]
    fn test_same_as_unknown_field_fails() {
        let rule = same_as("password");
        assert!(!check(&rule, json!("xxxx")));
        assert_eq!(
            rule.message(),
            "This needs to be the same as the password field."
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(len(&json!("abc")), 3);
        assert_eq!(len(&json!([1, 2])), 2);
        assert_eq!(len(&json!({ "a": 1 })), 1);
        assert_eq!(len(&json!(true)), 4);
    }
}
