//! Turns action outcomes into HTTP responses.

use axum::response::{Html, IntoResponse, Redirect, Response};

use adminkit_core::result::AppResult;
use adminkit_crud::controller::{ActionOutcome, CrudController};
use adminkit_crud::module::CrudModule;

/// Render an [`ActionOutcome`] through the controller's view engine.
///
/// Redirects after form submissions use `303 See Other` so the browser
/// re-fetches the index page with GET.
pub fn render_outcome<M: CrudModule>(
    controller: &CrudController<M>,
    outcome: ActionOutcome,
) -> AppResult<Response> {
    match outcome {
        ActionOutcome::Render { template, context } => {
            let html = controller.views().render(&template, &context)?;
            Ok(Html(html).into_response())
        }
        ActionOutcome::Redirect { location } => Ok(Redirect::to(&location).into_response()),
    }
}
