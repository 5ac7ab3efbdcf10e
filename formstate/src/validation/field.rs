//! Per-field validation state.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use super::form::FormRef;
use super::server::ServerOverlay;
use super::{FieldError, Rule, Rules, Validatable, ValidationConfig};
use crate::reactive::{Memo, State};

/// Live validation state of one field.
///
/// Cheap to clone; clones observe the same state. Every getter is a
/// tracked read, so UI code or other memos reading it are invalidated when
/// the answer changes.
#[derive(Clone)]
pub struct FieldState {
    inner: Rc<FieldInner>,
}

struct FieldInner {
    name: String,
    value: State<Value>,
    dirty: State<bool>,
    server: State<Option<String>>,
    server_rule: String,
    checks: Rc<IndexMap<String, (Rule, Memo<bool>)>>,
    invalid: Memo<bool>,
    error: Memo<bool>,
    errors: Memo<Vec<FieldError>>,
}

/// Wire one field's rules to its value.
///
/// Rule results are memos that pass while the field is untouched (unless
/// the form validates eagerly) and otherwise run the predicate against the
/// current value with the form as context. The form is only resolved when
/// a predicate actually runs, so sibling fields built later in the same
/// pass are visible to cross-field rules.
pub(crate) fn build_field(
    name: &str,
    value: State<Value>,
    rules: &Rules,
    form: &FormRef,
    overlay: &ServerOverlay,
    config: &ValidationConfig,
) -> FieldState {
    let dirty = State::new(false);
    let server = overlay.slot(name);
    let eager = config.validate_untouched;

    if rules.contains(&config.server_rule) {
        log::warn!(
            "field '{}' declares a rule named '{}', which is reserved for server errors",
            name,
            config.server_rule
        );
    }

    let checks: IndexMap<String, (Rule, Memo<bool>)> = rules
        .iter()
        .map(|(rule_name, rule)| {
            let result = Memo::new({
                let (rule, dirty, value, form) =
                    (rule.clone(), dirty.clone(), value.clone(), form.clone());
                let (field, rule_name) = (name.to_string(), rule_name.to_string());
                move || {
                    if !eager && !dirty.get() {
                        return true;
                    }
                    let Some(form) = form.upgrade() else {
                        return true;
                    };
                    log::trace!("checking {}.{}", field, rule_name);
                    rule.check(&value.get(), &form)
                }
            });
            (rule_name.to_string(), (rule.clone(), result))
        })
        .collect();
    let checks = Rc::new(checks);

    let invalid = Memo::new({
        let (checks, server) = (Rc::clone(&checks), server.clone());
        move || {
            let passing = checks.values().all(|(_, result)| result.get());
            !(passing && server.with(Option::is_none))
        }
    });

    let error = Memo::new({
        let (invalid, dirty) = (invalid.clone(), dirty.clone());
        move || invalid.get() && dirty.get()
    });

    let errors = Memo::new({
        let (checks, server) = (Rc::clone(&checks), server.clone());
        let field = name.to_string();
        let server_rule = config.server_rule.clone();
        move || {
            let mut errors: Vec<FieldError> = checks
                .iter()
                .filter(|(_, (_, result))| !result.get())
                .map(|(rule_name, (rule, _))| FieldError::new(&field, rule_name, rule.message()))
                .collect();
            if let Some(message) = server.get() {
                errors.push(FieldError::new(&field, &server_rule, message));
            }
            errors
        }
    });

    FieldState {
        inner: Rc::new(FieldInner {
            name: name.to_string(),
            value,
            dirty,
            server,
            server_rule: config.server_rule.clone(),
            checks,
            invalid,
            error,
            errors,
        }),
    }
}

impl FieldState {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current value.
    pub fn model(&self) -> Value {
        self.inner.value.get()
    }

    /// Write the value through to the store and mark the field dirty.
    ///
    /// Any injected server error on this field is dropped: it only stands
    /// until the user edits the field.
    pub fn set_model(&self, value: impl Into<Value>) {
        self.inner.dirty.set(true);
        self.inner.server.set(None);
        self.inner.value.set(value.into());
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// True iff at least one rule (or an injected server error) fails.
    pub fn is_invalid(&self) -> bool {
        self.inner.invalid.get()
    }

    /// Dirty and invalid.
    pub fn has_error(&self) -> bool {
        self.inner.error.get()
    }

    /// Failing rules in declaration order, then the server error if any.
    pub fn errors(&self) -> Vec<FieldError> {
        self.inner.errors.get()
    }

    /// Raw result of one rule (`true` = passing). The reserved server rule
    /// name reports whether a server error is pending.
    pub fn rule(&self, name: &str) -> Option<bool> {
        match self.inner.checks.get(name) {
            Some((_, result)) => Some(result.get()),
            None if name == self.inner.server_rule => {
                Some(self.inner.server.with(Option::is_none))
            }
            None => None,
        }
    }

    /// Names of the declared rules, in order.
    pub fn rule_names(&self) -> Vec<String> {
        self.inner.checks.keys().cloned().collect()
    }

    /// Pending server error message, if any.
    pub fn server_error(&self) -> Option<String> {
        self.inner.server.get()
    }

    /// Mark dirty without writing a value.
    pub fn touch(&self) {
        self.inner.dirty.set(true);
    }

    pub(crate) fn set_dirty(&self, dirty: bool) {
        self.inner.dirty.set(dirty);
    }
}

impl Validatable for FieldState {
    fn is_dirty(&self) -> bool {
        FieldState::is_dirty(self)
    }

    fn is_invalid(&self) -> bool {
        FieldState::is_invalid(self)
    }

    fn has_error(&self) -> bool {
        FieldState::has_error(self)
    }

    fn errors(&self) -> Vec<FieldError> {
        FieldState::errors(self)
    }

    fn touch(&self) {
        FieldState::touch(self)
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("name", &self.inner.name)
            .field("model", &self.inner.value.get_untracked())
            .field("dirty", &self.inner.dirty.get_untracked())
            .field("rules", &self.rule_names())
            .finish_non_exhaustive()
    }
}
