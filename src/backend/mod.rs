//! Backend access: the REST client and the wire shapes it returns.

pub mod client;
pub mod dto;

pub use client::BackendClient;
