//! Create self_drive_bookings detail table
//!
//! One row per SELF_DRIVE booking: rental window, handover locations
//! and the pricing snapshot. The CHECK keeps the window well-formed at
//! the schema level too.

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SelfDriveBookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SelfDriveBookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::BookingId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::StartDatetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::EndDatetime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .check(
                                Expr::col(SelfDriveBookings::EndDatetime)
                                    .gt(Expr::col(SelfDriveBookings::StartDatetime)),
                            ),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::PickupAddress)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::PickupLat)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::PickupLong)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::DropAddress)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SelfDriveBookings::DropLat).double().not_null())
                    .col(
                        ColumnDef::new(SelfDriveBookings::DropLong)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::HourlyRateSnapshot)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::BaseAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::InsureAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::DriverAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::DropCharge)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::GstAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::TotalAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SelfDriveBookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_self_drive_bookings_booking")
                            .from(SelfDriveBookings::Table, SelfDriveBookings::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_self_drive_bookings_window")
                    .table(SelfDriveBookings::Table)
                    .col(SelfDriveBookings::StartDatetime)
                    .col(SelfDriveBookings::EndDatetime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SelfDriveBookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SelfDriveBookings {
    Table,
    Id,
    BookingId,
    StartDatetime,
    EndDatetime,
    PickupAddress,
    PickupLat,
    PickupLong,
    DropAddress,
    DropLat,
    DropLong,
    HourlyRateSnapshot,
    BaseAmount,
    InsureAmount,
    DriverAmount,
    DropCharge,
    GstAmount,
    TotalAmount,
    CreatedAt,
}
