//! User/Car directory port
//!
//! The marketplace CRUD around users and cars is an external
//! collaborator; the core only needs these two lookups. `Ok(None)` is a
//! definite not-found, `Err` a transient storage failure; callers must
//! be able to tell them apart.

use async_trait::async_trait;

use crate::domain::DomainResult;

#[derive(Debug, Clone)]
pub struct UserRef {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct CarRef {
    pub id: i32,
    pub host_id: i32,
    /// Current listed rate, snapshotted onto the detail at booking time.
    pub price_per_hour: i64,
}

#[async_trait]
pub trait Directory: Send + Sync {
    async fn get_user(&self, id: i32) -> DomainResult<Option<UserRef>>;
    async fn get_car(&self, id: i32) -> DomainResult<Option<CarRef>>;
}
