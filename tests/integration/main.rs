//! Integration tests for the CRUD web stack.

mod helpers;

mod crud_test;
mod list_test;
