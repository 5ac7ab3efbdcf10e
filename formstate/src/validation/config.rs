//! Engine configuration.

/// Behavior of the targeted field's dirty flag after a server error is
/// injected with [`Validation::set_errors`](super::Validation::set_errors).
///
/// Either way the server message is listed in the field's `errors` and the
/// field is `invalid` until its model is written again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerErrorPolicy {
    /// Reset `dirty` to false. `error` stays false, so UIs that key off
    /// `error` keep quiet while ones that list `errors` show the message.
    #[default]
    ResetDirty,
    /// Force `dirty` to true so `error` turns on as well. Static rules of
    /// the field start validating too.
    MarkDirty,
}

/// Per-form configuration.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Rule name used for injected server errors.
    pub server_rule: String,

    /// Bucket for server errors whose pointer does not name a field.
    pub fallback_field: String,

    /// What happens to `dirty` when a server error is injected.
    pub on_server_error: ServerErrorPolicy,

    /// If true, rules run on untouched fields too. Off by default: fields
    /// only validate once written (validate-on-touch).
    pub validate_untouched: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            server_rule: "server".to_string(),
            fallback_field: "form".to_string(),
            on_server_error: ServerErrorPolicy::default(),
            validate_untouched: false,
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule name used for server errors.
    pub fn server_rule(mut self, name: impl Into<String>) -> Self {
        self.server_rule = name.into();
        self
    }

    /// Set the bucket for unroutable server errors.
    pub fn fallback_field(mut self, name: impl Into<String>) -> Self {
        self.fallback_field = name.into();
        self
    }

    /// Set the dirty policy for injected server errors.
    pub fn on_server_error(mut self, policy: ServerErrorPolicy) -> Self {
        self.on_server_error = policy;
        self
    }

    /// Validate fields even before they are touched.
    pub fn eager(mut self) -> Self {
        self.validate_untouched = true;
        self
    }
}
