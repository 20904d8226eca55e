//! # adminkit-core
//!
//! Core crate for AdminKit. Contains configuration schemas, the shared
//! pagination/sorting/filter types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AdminKit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
