//! The generic CRUD controller.
//!
//! Composes a [`CrudModule`] with its collaborators — entity store, grid
//! factory, view engine — and provides the four actions. Actions return
//! an [`ActionOutcome`]; turning that into an HTTP response is the web
//! layer's concern.

use std::sync::{Arc, OnceLock};

use adminkit_core::error::AppError;
use adminkit_core::result::AppResult;
use adminkit_core::types::pagination::PageRequest;
use adminkit_core::types::sorting::SortField;
use tracing::{info, warn};
use validator::Validate;

use crate::config::CrudConfig;
use crate::entity::Entity;
use crate::flash::{FlashLevel, FlashSink, flash_key};
use crate::form::{self, EntityForm, FieldError, FormView};
use crate::grid::GridFactory;
use crate::module::CrudModule;
use crate::request::{FormRequest, FormSubmission, ListRequest};
use crate::store::{EntityStore, ListQuery, UnitOfWork};
use crate::view::{ViewContext, ViewEngine, resolve_template};

/// What an action decided to do.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Render a template with the given context.
    Render {
        /// Resolved template identifier.
        template: String,
        /// Render context.
        context: ViewContext,
    },
    /// Redirect the client.
    Redirect {
        /// Target URL.
        location: String,
    },
}

impl ActionOutcome {
    /// The redirect target, if this outcome is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location } => Some(location),
            Self::Render { .. } => None,
        }
    }
}

/// Generic CRUD controller for one entity type.
///
/// All collaborators are injected at construction; the controller holds
/// no ambient service lookups. The configuration is built lazily on
/// first access and cached for the controller's lifetime.
pub struct CrudController<M: CrudModule> {
    module: M,
    store: Arc<dyn EntityStore<M::Entity>>,
    grids: Arc<dyn GridFactory>,
    views: Arc<dyn ViewEngine>,
    config: OnceLock<AppResult<CrudConfig>>,
}

impl<M: CrudModule> CrudController<M> {
    /// Create a controller from a module and its collaborators.
    pub fn new(
        module: M,
        store: Arc<dyn EntityStore<M::Entity>>,
        grids: Arc<dyn GridFactory>,
        views: Arc<dyn ViewEngine>,
    ) -> Self {
        Self {
            module,
            store,
            grids,
            views,
            config: OnceLock::new(),
        }
    }

    /// The validated controller configuration.
    ///
    /// Built on first call: the module's `configure` hook populates an
    /// empty configuration, which is then validated. The result — or the
    /// validation failure — is cached; later calls return the same
    /// instance.
    pub fn configuration(&self) -> AppResult<&CrudConfig> {
        let slot = self.config.get_or_init(|| {
            let mut config = CrudConfig::new();
            self.module.configure(&mut config);
            config.validate(self.module.name()).map(|()| config)
        });

        match slot {
            Ok(config) => Ok(config),
            Err(err) => Err(err.clone()),
        }
    }

    /// The entity store this controller persists through.
    pub fn store(&self) -> &Arc<dyn EntityStore<M::Entity>> {
        &self.store
    }

    /// The view engine used for template resolution and rendering.
    pub fn views(&self) -> &dyn ViewEngine {
        &*self.views
    }

    /// List entities: resolve sort, apply module criteria, paginate,
    /// build the grid, and render the index template.
    pub async fn index(
        &self,
        request: ListRequest,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let config = self.configuration()?;
        let default_sort = config.default_sort();

        // Resolve the effective sort so the rendered view always reflects
        // what was actually applied.
        let sort = SortField::new(
            request.sort_by.clone().unwrap_or(default_sort.field),
            request.sort_order.unwrap_or(default_sort.direction),
        );

        let page = PageRequest::new(request.page.unwrap_or(1), config.page_size());
        let mut query = ListQuery::new(sort.clone(), page);
        self.module.list_criteria(&request, &mut query);

        let page = self.store.list(&query).await?;
        let grid = self
            .grids
            .create_grid(config.grid_type(), &config.grid_options)?;

        let mut context = ViewContext::new();
        context.insert("config".into(), serde_json::to_value(config)?);
        context.insert("grid".into(), serde_json::to_value(&grid)?);
        context.insert("pager".into(), serde_json::to_value(&page)?);
        context.insert("sort_by".into(), sort.field.clone().into());
        context.insert("sort_order".into(), sort.direction.to_string().into());
        context.insert("flashes".into(), serde_json::to_value(flash.drain())?);

        Ok(ActionOutcome::Render {
            template: resolve_template(&*self.views, config.entity_name(), "index"),
            context,
        })
    }

    /// Add a new entity.
    pub async fn add(
        &self,
        request: FormRequest<M::Form>,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let entity = self.module.new_instance(&request.query);
        self.handle_form(request, entity, "add", flash).await
    }

    /// Edit an existing entity; fails with NotFound for an unknown id.
    pub async fn edit(
        &self,
        request: FormRequest<M::Form>,
        id: &<M::Entity as Entity>::Id,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let entity = self.find_object(id).await?;
        self.handle_form(request, entity, "edit", flash).await
    }

    /// Delete an entity; fails with NotFound for an unknown id. The
    /// removal and the commit go through the same unit of work.
    pub async fn delete(
        &self,
        id: &<M::Entity as Entity>::Id,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let entity = self.find_object(id).await?;

        let mut uow = self.store.begin();
        uow.remove(entity);

        self.finish_commit(uow, "delete", flash).await
    }

    /// Find an entity by id, failing with NotFound when absent.
    pub async fn find_object(
        &self,
        id: &<M::Entity as Entity>::Id,
    ) -> AppResult<M::Entity> {
        let config = self.configuration()?;

        self.store.find(id).await?.ok_or_else(|| {
            AppError::not_found(format!(
                "Object {}({}) not found",
                config.entity_name(),
                id
            ))
        })
    }

    /// Shared add/edit flow: bind, validate, persist, redirect.
    async fn handle_form(
        &self,
        request: FormRequest<M::Form>,
        mut entity: M::Entity,
        action: &'static str,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let config = self.configuration()?;

        let form_view = match request.submission {
            FormSubmission::NotSubmitted => FormView::pristine(
                config.form_type(),
                serde_json::to_value(M::Form::from_entity(&entity))?,
            ),
            FormSubmission::Malformed(reason) => FormView::invalid(
                config.form_type(),
                serde_json::Value::Object(Default::default()),
                vec![FieldError {
                    field: "_form".into(),
                    message: reason,
                }],
            ),
            FormSubmission::Submitted(form) => match form.validate() {
                Err(errors) => FormView::invalid(
                    config.form_type(),
                    serde_json::to_value(&form)?,
                    form::collect_errors(&errors),
                ),
                Ok(()) => {
                    form.apply(&mut entity);

                    let mut uow = self.store.begin();
                    uow.persist(entity);

                    return self.finish_commit(uow, action, flash).await;
                }
            },
        };

        let mut context = ViewContext::new();
        context.insert("config".into(), serde_json::to_value(config)?);
        context.insert("form".into(), serde_json::to_value(&form_view)?);

        Ok(ActionOutcome::Render {
            template: resolve_template(&*self.views, config.entity_name(), action),
            context,
        })
    }

    /// Commit a unit of work, record the outcome flash, and redirect to
    /// the index page. Commit failures never propagate past this point.
    async fn finish_commit(
        &self,
        uow: Box<dyn UnitOfWork<M::Entity>>,
        action: &'static str,
        flash: &dyn FlashSink,
    ) -> AppResult<ActionOutcome> {
        let config = self.configuration()?;
        let name = config.entity_name();

        match uow.commit().await {
            Ok(()) => {
                info!(entity = name, action, "Crud commit succeeded");
                flash.add(FlashLevel::Success, flash_key(name, action, "success"));
            }
            Err(err) => {
                warn!(entity = name, action, error = %err, "Crud commit failed");
                flash.add(FlashLevel::Error, flash_key(name, action, "error"));
            }
        }

        Ok(ActionOutcome::Redirect {
            location: config.index_url(),
        })
    }
}
