//! Template resolution and the view engine seam.
//!
//! Template names are guessed by convention from the entity name and the
//! action; existence checking is delegated to the injected
//! [`ViewEngine`], so resolution stays unit-testable without a real
//! template engine.

use adminkit_core::result::AppResult;

/// Render context handed to the view engine: a flat JSON object.
pub type ViewContext = serde_json::Map<String, serde_json::Value>;

/// The rendering collaborator.
pub trait ViewEngine: Send + Sync {
    /// Whether a template with this identifier exists.
    fn exists(&self, template: &str) -> bool;

    /// Render a template with the given context.
    fn render(&self, template: &str, context: &ViewContext) -> AppResult<String>;
}

/// Ordered template candidates for an action, most specific first.
pub fn template_candidates(entity_name: &str, action: &str) -> Vec<String> {
    vec![
        format!("admin/{entity_name}/{action}.html"),
        format!("{entity_name}/{action}.html"),
        format!("crud/{action}.html"),
    ]
}

/// Resolve the template to render for an action.
///
/// Returns the first candidate the view engine knows. When none exists,
/// the most specific candidate is returned unchanged so the resulting
/// missing-template error names the path the developer is expected to
/// create.
pub fn resolve_template(views: &dyn ViewEngine, entity_name: &str, action: &str) -> String {
    let candidates = template_candidates(entity_name, action);

    candidates
        .iter()
        .find(|candidate| views.exists(candidate))
        .unwrap_or(&candidates[0])
        .clone()
}
