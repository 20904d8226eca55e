//! Request extractors for CRUD routes.

pub mod list_params;
pub mod session;

pub use list_params::ListParams;
pub use session::ensure_session;
