pub mod error;
pub mod reactive;
pub mod validation;

pub use error::FormError;
pub use validation::Validation;

pub mod prelude {
    pub use crate::error::FormError;
    pub use crate::reactive::{IntoStore, Memo, Signal, State, Store, untrack};
    pub use crate::validation::rules;
    pub use crate::validation::{
        ApiError, CombinedSchema, ErrorDocument, FieldError, FieldState, Form, Rule, Rules,
        Schema, ServerErrorPolicy, Validatable, Validation, ValidationConfig, ValidationResult,
    };
}
