//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_cars;
mod m20250301_000003_create_bookings;
mod m20250301_000004_create_self_drive_bookings;
mod m20250301_000005_create_intercity_bookings;
mod m20250301_000006_create_payments;
mod m20250301_000007_create_booking_otps;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_cars::Migration),
            Box::new(m20250301_000003_create_bookings::Migration),
            Box::new(m20250301_000004_create_self_drive_bookings::Migration),
            Box::new(m20250301_000005_create_intercity_bookings::Migration),
            Box::new(m20250301_000006_create_payments::Migration),
            Box::new(m20250301_000007_create_booking_otps::Migration),
        ]
    }
}
