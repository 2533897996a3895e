//! # Zip Drive Booking Engine
//!
//! Booking conflict-resolution and lifecycle engine for a car-rental
//! marketplace: cross-mode overlap checking, atomic booking aggregate
//! creation, time-windowed pickup/drop OTPs and the background sweep
//! that dispatches them.
//!
//! ## Architecture
//!
//! - **domain**: entities, state machine, repository and collaborator traits
//! - **application**: services and the OTP dispatch background task
//! - **infrastructure**: SeaORM persistence, SMTP notifier, payment gateway
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::AppConfig;

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;

// Re-export API router
pub use interfaces::http::router::create_api_router;
