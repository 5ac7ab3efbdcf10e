//! The form handle and group-level aggregates.

use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::field::build_field;
use super::server::ServerOverlay;
use super::{FieldError, FieldState, Schema, Validatable, ValidationConfig, ValidationResult};
use crate::error::FormError;
use crate::reactive::{Memo, State, Store};

/// Live, form-level view over every field.
///
/// The handle is stable: rebuilding the form with new values swaps the
/// fields underneath it, so anything holding a `Form` keeps seeing current
/// data. Reads are tracked, including the lookup of a field by name.
#[derive(Clone)]
pub struct Form {
    inner: Rc<FormInner>,
}

struct FormInner {
    group: State<Rc<Group>>,
    overlay: ServerOverlay,
    config: Rc<ValidationConfig>,
}

/// Non-owning handle used by rule predicates to reach the form.
#[derive(Clone)]
pub(crate) struct FormRef(Weak<FormInner>);

impl FormRef {
    pub(crate) fn upgrade(&self) -> Option<Form> {
        self.0.upgrade().map(|inner| Form { inner })
    }
}

/// One build of the form: fields plus their aggregates.
pub(crate) struct Group {
    fields: Rc<IndexMap<String, FieldState>>,
    errors: Memo<Vec<FieldError>>,
    dirty: Memo<bool>,
    invalid: Memo<bool>,
}

impl Group {
    fn new(fields: IndexMap<String, FieldState>) -> Self {
        let fields = Rc::new(fields);

        let errors = Memo::new({
            let fields = Rc::clone(&fields);
            move || fields.values().flat_map(FieldState::errors).collect()
        });
        let dirty = Memo::new({
            let fields = Rc::clone(&fields);
            move || fields.values().any(FieldState::is_dirty)
        });
        let invalid = Memo::new({
            let fields = Rc::clone(&fields);
            move || fields.values().any(FieldState::is_invalid)
        });

        Self {
            fields,
            errors,
            dirty,
            invalid,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Build every field of `schema` against `store`, in declaration order.
///
/// Fails on the first schema field that has no entry in the store.
pub(crate) fn build_group(
    schema: &Schema,
    store: &Store,
    form: &FormRef,
    overlay: &ServerOverlay,
    config: &ValidationConfig,
) -> Result<Group, FormError> {
    let mut fields = IndexMap::with_capacity(schema.len());
    for (name, rules) in schema.iter() {
        let value = store
            .state(name)
            .ok_or_else(|| FormError::missing_value(name))?;
        let field = build_field(name, value, rules, form, overlay, config);
        fields.insert(name.to_string(), field);
    }
    Ok(Group::new(fields))
}

impl Form {
    /// An empty form not attached to any [`Validation`](super::Validation).
    /// Handy as context when checking a rule on its own.
    pub fn detached() -> Self {
        Self::with_parts(ServerOverlay::default(), Rc::new(ValidationConfig::default()))
    }

    pub(crate) fn with_parts(overlay: ServerOverlay, config: Rc<ValidationConfig>) -> Self {
        Self {
            inner: Rc::new(FormInner {
                group: State::new(Rc::new(Group::new(IndexMap::new()))),
                overlay,
                config,
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> FormRef {
        FormRef(Rc::downgrade(&self.inner))
    }

    /// Swap in a freshly built group and notify readers.
    pub(crate) fn install(&self, group: Group) {
        self.inner.group.replace(Rc::new(group));
    }

    fn group(&self) -> Rc<Group> {
        self.inner.group.get()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<FieldState> {
        self.group().fields.get(name).cloned()
    }

    /// Every field, in declaration order.
    pub fn fields(&self) -> Vec<FieldState> {
        self.group().fields.values().cloned().collect()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.group().fields.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.group().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Any field dirty.
    pub fn is_dirty(&self) -> bool {
        self.group().dirty.get()
    }

    /// Any field invalid.
    pub fn is_invalid(&self) -> bool {
        self.group().invalid.get()
    }

    pub fn has_error(&self) -> bool {
        self.is_dirty() && self.is_invalid()
    }

    /// Every field's errors, concatenated in declaration order.
    pub fn errors(&self) -> Vec<FieldError> {
        self.group().errors.get()
    }

    /// Server errors that could not be routed to a field.
    ///
    /// Empty when the fallback bucket is itself a declared field; its
    /// errors are then part of that field.
    pub fn general_errors(&self) -> Vec<FieldError> {
        let config = &self.inner.config;
        if self.group().fields.contains_key(&config.fallback_field) {
            return Vec::new();
        }
        self.inner
            .overlay
            .slot(&config.fallback_field)
            .get()
            .map(|message| {
                FieldError::new(&config.fallback_field, &config.server_rule, message)
            })
            .into_iter()
            .collect()
    }

    /// Mark every field dirty, e.g. on submit.
    pub fn touch(&self) {
        for field in self.group().fields.values() {
            field.touch();
        }
    }

    /// Snapshot of the current errors.
    pub fn result(&self) -> ValidationResult {
        ValidationResult::from(self.errors())
    }

    /// Whether both handles refer to the same form.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Validatable for Form {
    fn is_dirty(&self) -> bool {
        Form::is_dirty(self)
    }

    fn is_invalid(&self) -> bool {
        Form::is_invalid(self)
    }

    fn errors(&self) -> Vec<FieldError> {
        Form::errors(self)
    }

    fn touch(&self) {
        Form::touch(self)
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.inner.group.get_untracked();
        f.debug_struct("Form")
            .field("fields", &group.fields.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
