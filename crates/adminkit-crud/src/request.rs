//! Framework-neutral request inputs for the CRUD actions.

use std::collections::HashMap;

use adminkit_core::types::sorting::SortDirection;

/// Query string parameters, as delivered by the web layer.
pub type QueryParams = HashMap<String, String>;

/// Inputs to the list action.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Requested sort field, if any.
    pub sort_by: Option<String>,
    /// Requested sort direction, if any.
    pub sort_order: Option<SortDirection>,
    /// Requested page number (1-based), if any.
    pub page: Option<u64>,
    /// Remaining query parameters, available to module hooks.
    pub query: QueryParams,
}

impl ListRequest {
    /// A list request with no parameters set.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The state of a form submission as seen by the orchestrator.
#[derive(Debug, Clone)]
pub enum FormSubmission<F> {
    /// No submission — render the form.
    NotSubmitted,
    /// The body was submitted but could not be bound to the form type.
    Malformed(String),
    /// The body was bound to the form type; validation still pending.
    Submitted(F),
}

/// Inputs to the add and edit actions.
#[derive(Debug, Clone)]
pub struct FormRequest<F> {
    /// The submission state.
    pub submission: FormSubmission<F>,
    /// Query parameters, available to module hooks.
    pub query: QueryParams,
}

impl<F> FormRequest<F> {
    /// A GET request rendering the form.
    pub fn unsubmitted() -> Self {
        Self {
            submission: FormSubmission::NotSubmitted,
            query: QueryParams::new(),
        }
    }

    /// A POST request carrying a bound form.
    pub fn submitted(form: F) -> Self {
        Self {
            submission: FormSubmission::Submitted(form),
            query: QueryParams::new(),
        }
    }

    /// A POST request whose body failed to bind.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            submission: FormSubmission::Malformed(reason.into()),
            query: QueryParams::new(),
        }
    }
}
