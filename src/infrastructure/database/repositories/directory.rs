//! Directory lookups backed by the shared marketplace tables.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::convert::db_err;
use crate::domain::directory::{CarRef, Directory, UserRef};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{car, user};

pub struct SeaOrmDirectory {
    db: DatabaseConnection,
}

impl SeaOrmDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Directory for SeaOrmDirectory {
    async fn get_user(&self, id: i32) -> DomainResult<Option<UserRef>> {
        Ok(user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|m| UserRef {
                id: m.id,
                email: m.email,
                first_name: m.first_name,
                role: m.role,
            }))
    }

    async fn get_car(&self, id: i32) -> DomainResult<Option<CarRef>> {
        // Delisted cars are invisible to the booking flow.
        Ok(car::Entity::find_by_id(id)
            .filter(car::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|m| CarRef {
                id: m.id,
                host_id: m.host_id,
                price_per_hour: m.price_per_hour,
            }))
    }
}
