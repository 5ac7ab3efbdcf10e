//! Validator descriptors.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::Form;

/// Predicate signature: the field's current value plus the whole form as
/// context, so rules can look at sibling fields.
pub type Predicate = Rc<dyn Fn(&Value, &Form) -> bool>;

/// Message callback; receives the rule it belongs to.
pub type MessageFn = Rc<dyn Fn(&Rule) -> String>;

/// How a rule produces its error message.
#[derive(Clone, Default)]
pub enum Message {
    /// No message; resolves to an empty string.
    #[default]
    None,
    /// A fixed message.
    Literal(String),
    /// A message computed from the rule when the error is reported.
    Template(MessageFn),
}

/// A single validation rule: a predicate plus the message shown when it
/// fails.
///
/// Rules are immutable once built and cheap to clone.
///
/// # Example
///
/// ```
/// use formstate::validation::Rule;
///
/// let even = Rule::new(|value, _| value.as_i64().is_some_and(|n| n % 2 == 0))
///     .with_message("Value must be even");
///
/// assert_eq!(even.message(), "Value must be even");
/// ```
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
    message: Message,
    params: Map<String, Value>,
}

impl Rule {
    /// Create a rule with no message.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Form) -> bool + 'static,
    {
        Self {
            predicate: Rc::new(predicate),
            message: Message::None,
            params: Map::new(),
        }
    }

    /// Create a rule whose predicate only looks at the value.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self::new(move |value, _| predicate(value))
    }

    /// Attach a fixed message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Message::Literal(message.into());
        self
    }

    /// Attach a message computed from the rule (and its params) on demand.
    pub fn with_message_fn<F>(mut self, message: F) -> Self
    where
        F: Fn(&Rule) -> String + 'static,
    {
        self.message = Message::Template(Rc::new(message));
        self
    }

    /// Attach a named parameter, readable from message templates.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Resolve the message: templates are invoked with this rule, literals
    /// are returned as-is, and a missing message is the empty string.
    pub fn message(&self) -> String {
        match &self.message {
            Message::None => String::new(),
            Message::Literal(message) => message.clone(),
            Message::Template(template) => template(self),
        }
    }

    /// Run the predicate.
    pub fn check(&self, value: &Value, form: &Form) -> bool {
        (self.predicate)(value, form)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
