//! Service layer: backend orchestration for the console.
//!
//! [`ConsoleService`] turns each console operation into one backend call
//! through [`crate::backend::BackendClient`] and maps the answer with the
//! pure functions in [`crate::domain`].

pub mod console_service;

pub use console_service::ConsoleService;
