//! Infrastructure layer: database access and outbound adapters

pub mod database;
pub mod email;
pub mod gateway;
