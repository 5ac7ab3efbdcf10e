//! Entry point tying a schema to live values.

use std::cell::RefCell;
use std::rc::Rc;

use super::config::ServerErrorPolicy;
use super::form::build_group;
use super::server::{ApiError, ErrorDocument, ServerOverlay, pointer_head};
use super::{CombinedSchema, Form, Schema, ValidationConfig};
use crate::error::FormError;
use crate::reactive::{IntoStore, Store, untrack};

/// A schema bound to a value store, exposing the live [`Form`].
///
/// # Example
///
/// ```
/// use formstate::validation::{Rules, Schema, Validation, rules};
/// use serde_json::json;
///
/// let schema = Schema::new().field("username", Rules::new().rule("required", rules::required()));
/// let validation = Validation::with_values(schema, json!({ "username": "" })).unwrap();
/// let form = validation.form();
/// let username = form.field("username").unwrap();
///
/// assert!(!username.has_error());
/// username.set_model("");
/// assert!(username.has_error());
/// assert_eq!(form.errors()[0].message, "Value is required");
/// ```
pub struct Validation {
    schema: Schema,
    config: Rc<ValidationConfig>,
    overlay: ServerOverlay,
    form: Form,
    store: RefCell<Option<Store>>,
}

impl Validation {
    /// Bind a schema without values yet; the form has no fields until
    /// [`set_values`](Self::set_values) is called.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, ValidationConfig::default())
    }

    pub fn with_config(schema: Schema, config: ValidationConfig) -> Self {
        let config = Rc::new(config);
        let overlay = ServerOverlay::default();
        let form = Form::with_parts(overlay.clone(), Rc::clone(&config));
        Self {
            schema,
            config,
            overlay,
            form,
            store: RefCell::new(None),
        }
    }

    /// Bind a schema and build the form from `values` right away.
    pub fn with_values(schema: Schema, values: impl IntoStore) -> Result<Self, FormError> {
        let validation = Self::new(schema);
        validation.set_values(values)?;
        Ok(validation)
    }

    /// Build from a schema that carries its own initial values.
    pub fn from_combined(combined: CombinedSchema) -> Result<Self, FormError> {
        let (schema, store) = combined.into_parts();
        Self::with_values(schema, store)
    }

    /// The stable form handle.
    pub fn form(&self) -> Form {
        self.form.clone()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// The store currently backing the form, if values were set.
    pub fn values(&self) -> Option<Store> {
        self.store.borrow().clone()
    }

    /// Adopt `values` as the live store and rebuild every field.
    ///
    /// All dirty flags start over. Pending server errors survive the
    /// rebuild. On error the previous fields stay in place.
    pub fn set_values(&self, values: impl IntoStore) -> Result<Store, FormError> {
        let store = values.into_store()?;
        let group = build_group(
            &self.schema,
            &store,
            &self.form.downgrade(),
            &self.overlay,
            &self.config,
        )?;
        log::debug!("rebuilt form with {} fields", group.len());

        self.form.install(group);
        *self.store.borrow_mut() = Some(store.clone());
        Ok(store)
    }

    /// Inject server-side errors into the form.
    ///
    /// Each error is routed to the field named by its pointer, or to the
    /// fallback bucket when the pointer is missing, unreadable or names an
    /// undeclared field. The message stays on the field until its model is
    /// next written. The field's dirty flag is then set according to
    /// [`ValidationConfig::on_server_error`]. Other fields are untouched.
    pub fn set_errors<'a, I>(&self, errors: I) -> Form
    where
        I: IntoIterator<Item = &'a ApiError>,
    {
        let mut injected = 0usize;
        for error in errors {
            let field = self.route(error);
            self.overlay.inject(&field, error.message());
            injected += 1;

            if let Some(state) = untrack(|| self.form.field(&field)) {
                match self.config.on_server_error {
                    ServerErrorPolicy::ResetDirty => state.set_dirty(false),
                    ServerErrorPolicy::MarkDirty => state.set_dirty(true),
                }
            }
        }
        log::debug!("injected {} server errors", injected);

        self.form()
    }

    /// [`set_errors`](Self::set_errors) for a parsed error document.
    pub fn set_error_document(&self, document: &ErrorDocument) -> Form {
        self.set_errors(&document.errors)
    }

    /// Drop every pending server error.
    pub fn clear_errors(&self) {
        self.overlay.clear_all();
    }

    fn route(&self, error: &ApiError) -> String {
        let target = match error.pointer().and_then(pointer_head) {
            Some(head) if self.schema.contains(&head) => Some(head),
            _ => error.target_field(),
        };
        match target {
            Some(field) if self.schema.contains(&field) => field,
            target => {
                log::warn!(
                    "server error for {:?} (pointer {:?}) routed to '{}'",
                    target,
                    error.pointer(),
                    self.config.fallback_field
                );
                self.config.fallback_field.clone()
            }
        }
    }
}
