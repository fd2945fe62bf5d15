//! Data Transfer Objects for the BFF's own request/response bodies.
//!
//! View models returned by the console endpoints live in
//! [`crate::domain`]; this module only holds query strings, request
//! bodies, and small acknowledgements.

pub mod auth_dto;
pub mod common_dto;
pub mod console_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use console_dto::*;
