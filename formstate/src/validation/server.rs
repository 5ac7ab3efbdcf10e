//! Server-side errors in JSON:API error-object format.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::reactive::State;

/// One JSON:API error object.
///
/// ```json
/// { "status": "422", "source": { "pointer": "/quantity" },
///   "title": "Invalid", "detail": "There is insufficient quantity." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Where in the request document an error originated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl ApiError {
    /// Create an error with the given detail message.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source.get_or_insert_with(ErrorSource::default).pointer = Some(pointer.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn pointer(&self) -> Option<&str> {
        self.source.as_ref()?.pointer.as_deref()
    }

    /// Field targeted by this error's pointer, if one can be read from it.
    pub fn target_field(&self) -> Option<String> {
        self.pointer().and_then(pointer_field)
    }

    /// Message to display: `detail`, else `title`, else empty.
    pub fn message(&self) -> String {
        self.detail
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// A JSON:API error document (`{ "errors": [...] }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl ErrorDocument {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Field name from a slash-delimited pointer.
///
/// The first path segment names the field (`/quantity` → `quantity`),
/// except for the `/data/attributes/<field>` form, which names the segment
/// after `attributes`. JSON pointer escapes (`~1`, `~0`) are decoded.
/// Returns `None` when no usable segment exists.
///
/// `Validation` routes on [`pointer_head`] first, so a form that declares
/// a `data` field still receives `/data/...` pointers.
pub fn pointer_field(pointer: &str) -> Option<String> {
    let first = pointer_head(pointer)?;
    if first == "data" {
        let mut rest = pointer.split('/').skip(2).map(unescape);
        if rest.next().as_deref() == Some("attributes") {
            if let Some(field) = rest.next().filter(|f| !f.is_empty()) {
                return Some(field);
            }
        }
    }
    Some(first)
}

/// First path segment of a pointer, unescaped.
pub fn pointer_head(pointer: &str) -> Option<String> {
    pointer
        .split('/')
        .nth(1)
        .map(unescape)
        .filter(|segment| !segment.is_empty())
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Server messages keyed by field name, kept apart from the caller's
/// schema.
///
/// Each field gets one persistent slot, so fields rebuilt by
/// `set_values` pick up messages injected before the rebuild.
#[derive(Debug, Clone, Default)]
pub(crate) struct ServerOverlay {
    slots: Rc<RefCell<IndexMap<String, State<Option<String>>>>>,
}

impl ServerOverlay {
    /// The slot for one field, created empty on first use.
    pub(crate) fn slot(&self, field: &str) -> State<Option<String>> {
        self.slots
            .borrow_mut()
            .entry(field.to_string())
            .or_insert_with(|| State::new(None))
            .clone()
    }

    /// Last write wins per field.
    pub(crate) fn inject(&self, field: &str, message: String) {
        self.slot(field).set(Some(message));
    }

    pub(crate) fn clear_all(&self) {
        let slots: Vec<_> = self.slots.borrow().values().cloned().collect();
        for slot in slots {
            slot.set(None);
        }
    }
}
