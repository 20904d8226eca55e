//! Route mounting for CRUD controllers.
//!
//! [`crud_routes`] builds the router for one controller:
//!
//! | Route                 | Action |
//! |-----------------------|--------|
//! | `GET /`               | list   |
//! | `GET/POST /add`       | add    |
//! | `GET/POST /edit/{id}` | edit   |
//! | `POST /delete/{id}`   | delete |
//!
//! The application nests the returned router under the module's route
//! prefix.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::CookieJar;

use adminkit_core::error::AppError;
use adminkit_crud::controller::CrudController;
use adminkit_crud::entity::Entity;
use adminkit_crud::module::CrudModule;
use adminkit_crud::request::{FormRequest, FormSubmission};

use crate::error::HttpError;
use crate::extractors::{ListParams, ensure_session};
use crate::flash::{SessionFlash, SessionFlashStore};
use crate::render::render_outcome;

/// Shared state for one controller's routes.
pub struct CrudState<M: CrudModule> {
    controller: Arc<CrudController<M>>,
    flash: Arc<SessionFlashStore>,
}

impl<M: CrudModule> Clone for CrudState<M> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            flash: Arc::clone(&self.flash),
        }
    }
}

impl<M: CrudModule> CrudState<M> {
    fn session(&self, jar: CookieJar) -> (CookieJar, SessionFlash) {
        let (jar, session) = ensure_session(jar);
        (jar, self.flash.scoped(session))
    }
}

/// Build the router for one CRUD controller.
pub fn crud_routes<M>(
    controller: Arc<CrudController<M>>,
    flash: Arc<SessionFlashStore>,
) -> Router
where
    M: CrudModule,
    <M::Entity as Entity>::Id: FromStr,
{
    Router::new()
        .route("/", get(index::<M>))
        .route("/add", get(add_form::<M>).post(add_submit::<M>))
        .route("/edit/{id}", get(edit_form::<M>).post(edit_submit::<M>))
        .route("/delete/{id}", post(delete::<M>))
        .with_state(CrudState { controller, flash })
}

async fn index<M: CrudModule>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let (jar, flash) = state.session(jar);

    let request = ListParams(params).into_list_request();
    let outcome = state.controller.index(request, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

async fn add_form<M: CrudModule>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let (jar, flash) = state.session(jar);

    let request = FormRequest {
        submission: FormSubmission::NotSubmitted,
        query,
    };
    let outcome = state.controller.add(request, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

async fn add_submit<M: CrudModule>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Query(query): Query<HashMap<String, String>>,
    form: Result<Form<M::Form>, FormRejection>,
) -> Result<Response, HttpError> {
    let (jar, flash) = state.session(jar);

    let request = FormRequest {
        submission: bind_submission(form),
        query,
    };
    let outcome = state.controller.add(request, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

async fn edit_form<M>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, HttpError>
where
    M: CrudModule,
    <M::Entity as Entity>::Id: FromStr,
{
    let (jar, flash) = state.session(jar);
    let id = parse_id::<M>(&id)?;

    let request = FormRequest {
        submission: FormSubmission::NotSubmitted,
        query,
    };
    let outcome = state.controller.edit(request, &id, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

async fn edit_submit<M>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    form: Result<Form<M::Form>, FormRejection>,
) -> Result<Response, HttpError>
where
    M: CrudModule,
    <M::Entity as Entity>::Id: FromStr,
{
    let (jar, flash) = state.session(jar);
    let id = parse_id::<M>(&id)?;

    let request = FormRequest {
        submission: bind_submission(form),
        query,
    };
    let outcome = state.controller.edit(request, &id, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

async fn delete<M>(
    State(state): State<CrudState<M>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, HttpError>
where
    M: CrudModule,
    <M::Entity as Entity>::Id: FromStr,
{
    let (jar, flash) = state.session(jar);
    let id = parse_id::<M>(&id)?;

    let outcome = state.controller.delete(&id, &flash).await?;

    Ok((jar, render_outcome(&state.controller, outcome)?).into_response())
}

/// Translate the body extraction result into a form submission.
fn bind_submission<F>(form: Result<Form<F>, FormRejection>) -> FormSubmission<F> {
    match form {
        Ok(Form(form)) => FormSubmission::Submitted(form),
        Err(rejection) => FormSubmission::Malformed(rejection.body_text()),
    }
}

/// Parse a path id; an unparseable id cannot name an existing entity.
fn parse_id<M>(raw: &str) -> Result<<M::Entity as Entity>::Id, HttpError>
where
    M: CrudModule,
    <M::Entity as Entity>::Id: FromStr,
{
    raw.parse()
        .map_err(|_| HttpError(AppError::not_found(format!("Object id '{raw}' is not valid"))))
}
