//! Declarative rule schemas.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::Rule;
use crate::reactive::Store;

/// Ordered set of named rules for one field.
///
/// Rule names are unique; adding a rule under an existing name replaces it
/// but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: IndexMap<String, Rule>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule (builder style).
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Rule)> for Rules {
    fn from_iter<I: IntoIterator<Item = (K, Rule)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (name, rule) in iter {
            rules.insert(name, rule);
        }
        rules
    }
}

/// Validation schema: field name to rule set, in declaration order.
///
/// Declaration order is the order fields are built in and the order their
/// errors appear in the form-level error list.
///
/// # Example
///
/// ```
/// use formstate::validation::{Rules, Schema, rules};
///
/// let schema = Schema::new()
///     .field("password", Rules::new().rule("required", rules::required()))
///     .field(
///         "samePassword",
///         Rules::new()
///             .rule("required", rules::required())
///             .rule("matches", rules::same_as("password")),
///     );
///
/// assert_eq!(schema.names().collect::<Vec<_>>(), ["password", "samePassword"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, Rules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field (builder style).
    pub fn field(mut self, name: impl Into<String>, rules: Rules) -> Self {
        self.insert(name, rules);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: Rules) {
        self.fields.insert(name.into(), rules);
    }

    pub fn get(&self, name: &str) -> Option<&Rules> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Schema variant that declares each field's initial value next to its
/// rules.
#[derive(Debug, Clone, Default)]
pub struct CombinedSchema {
    schema: Schema,
    values: Map<String, Value>,
}

impl CombinedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its initial value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>, rules: Rules) -> Self {
        let name = name.into();
        self.values.insert(name.clone(), value.into());
        self.schema.insert(name, rules);
        self
    }

    /// Split into the rule schema and a fresh value store.
    pub fn into_parts(self) -> (Schema, Store) {
        (self.schema, Store::from(self.values))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::rules;

    #[test]
    fn test_duplicate_rule_keeps_position_last_write_wins() {
        let rules = Rules::new()
            .rule("required", rules::required())
            .rule("minLength", rules::min_length(3))
            .rule("required", rules::custom("replaced", |_| true));

        assert_eq!(rules.names().collect::<Vec<_>>(), ["required", "minLength"]);
        assert_eq!(rules.get("required").unwrap().message(), "replaced");
    }

    #[test]
    fn test_combined_schema_into_parts() {
        let (schema, store) = CombinedSchema::new()
            .field("username", "Horace", Rules::new().rule("required", rules::required()))
            .field("password", "xxxxxx", Rules::new())
            .into_parts();

        assert_eq!(schema.names().collect::<Vec<_>>(), ["username", "password"]);
        assert_eq!(store.get("username"), Some(json!("Horace")));
        assert_eq!(store.len(), 2);
    }
}
