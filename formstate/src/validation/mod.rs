//! Reactive form validation.
//!
//! A [`Schema`] declares named [`Rule`]s per field. Binding it to a value
//! [`Store`](crate::reactive::Store) through [`Validation`] yields a live
//! [`Form`]: each field reports whether it is dirty, invalid and in error,
//! plus the list of failing rules, and the form aggregates all of it.
//! Everything is recomputed lazily when values change.
//!
//! Fields only validate once they have been written (validate-on-touch).
//! Server-side errors in JSON:API format can be injected with
//! [`Validation::set_errors`].
//!
//! # Example
//!
//! ```
//! use formstate::validation::{Rules, Schema, Validation, rules};
//! use serde_json::json;
//!
//! let schema = Schema::new()
//!     .field("password", Rules::new().rule("required", rules::required()))
//!     .field(
//!         "samePassword",
//!         Rules::new()
//!             .rule("required", rules::required())
//!             .rule("matches", rules::same_as("password")),
//!     );
//!
//! let validation = Validation::with_values(
//!     schema,
//!     json!({ "password": "xxxx", "samePassword": "xxxx" }),
//! )
//! .unwrap();
//! let form = validation.form();
//!
//! form.field("samePassword").unwrap().set_model("yyyy");
//! assert!(form.is_invalid());
//! assert_eq!(form.errors()[0].rule, "matches");
//! ```

mod config;
mod engine;
mod field;
mod form;
mod result;
mod rule;
pub mod rules;
mod schema;
pub mod server;
mod validatable;

pub use config::{ServerErrorPolicy, ValidationConfig};
pub use engine::Validation;
pub use field::FieldState;
pub use form::Form;
pub use result::{FieldError, ValidationResult};
pub use rule::{Message, MessageFn, Predicate, Rule};
pub use schema::{CombinedSchema, Rules, Schema};
pub use server::{ApiError, ErrorDocument, ErrorSource};
pub use validatable::Validatable;
