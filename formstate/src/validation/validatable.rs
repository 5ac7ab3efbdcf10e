//! Validatable trait shared by fields and forms.

use super::FieldError;

/// Common read interface over a single field and a whole form.
pub trait Validatable {
    /// Whether the user has written to it.
    fn is_dirty(&self) -> bool;

    /// Whether any rule currently fails.
    fn is_invalid(&self) -> bool;

    /// Whether it is both dirty and invalid.
    fn has_error(&self) -> bool {
        self.is_dirty() && self.is_invalid()
    }

    /// Every currently failing rule, in declaration order.
    fn errors(&self) -> Vec<FieldError>;

    /// Mark as dirty without changing any value.
    fn touch(&self);
}
