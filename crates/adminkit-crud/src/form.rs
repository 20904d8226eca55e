//! Form binding between request input and entities.
//!
//! A module supplies one form DTO per entity type. The DTO deserializes
//! from the submitted request body, carries its `validator` rules, and
//! knows how to populate itself from an entity and how to apply itself
//! back onto one.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// A form data transfer object bound to entity type `E`.
pub trait EntityForm<E>: DeserializeOwned + Serialize + Validate + Send + Sync + 'static {
    /// Build the form values shown for an existing entity.
    fn from_entity(entity: &E) -> Self;

    /// Apply the validated form values onto the entity.
    fn apply(self, entity: &mut E);
}

/// Free-form options passed through to form construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormOptions(pub BTreeMap<String, serde_json::Value>);

impl FormOptions {
    /// Set an option value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldError {
    /// The field the message belongs to; `_form` for form-level errors.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// The renderable state of a form: its type, current values, and errors.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    /// Named form type from the controller configuration.
    pub form_type: String,
    /// Field values as a JSON object.
    pub values: serde_json::Value,
    /// Validation messages; empty when the form is clean.
    pub errors: Vec<FieldError>,
    /// Whether this state results from a submission.
    pub submitted: bool,
}

impl FormView {
    /// A pristine form populated with the given values.
    pub fn pristine(form_type: &str, values: serde_json::Value) -> Self {
        Self {
            form_type: form_type.to_string(),
            values,
            errors: Vec::new(),
            submitted: false,
        }
    }

    /// A submitted form that failed validation.
    pub fn invalid(form_type: &str, values: serde_json::Value, errors: Vec<FieldError>) -> Self {
        Self {
            form_type: form_type.to_string(),
            values,
            errors,
            submitted: true,
        }
    }
}

/// Flatten `validator` output into renderable field errors.
pub fn collect_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected = Vec::new();
    for (field, messages) in errors.field_errors() {
        for error in messages {
            let message = error
                .message
                .clone()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            collected.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    collected.sort();
    collected
}
