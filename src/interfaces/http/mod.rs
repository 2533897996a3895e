//! HTTP REST API interfaces
//!
//! - `common`: response envelope and validated JSON extractor
//! - `error`: domain error to status code mapping
//! - `modules`: request handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod error;
pub mod modules;
pub mod router;

pub use router::create_api_router;
