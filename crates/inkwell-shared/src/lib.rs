//! # Inkwell Shared
//!
//! Types shared between the server and its clients: request/response DTOs,
//! form validation, and the standard error body.

pub mod dto;
pub mod response;
pub mod validate;

pub use response::{ApiResponse, ErrorResponse};
pub use validate::FieldError;
