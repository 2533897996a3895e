//! Create intercity_bookings detail table

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
                    .table(IntercityBookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IntercityBookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::BookingId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::PickupDatetime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::DropDatetime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .check(
                                Expr::col(IntercityBookings::DropDatetime)
                                    .gt(Expr::col(IntercityBookings::PickupDatetime)),
                            ),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::PickupAddress)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::PickupLat)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::PickupLong)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::DropAddress)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IntercityBookings::DropLat).double().not_null())
                    .col(
                        ColumnDef::new(IntercityBookings::DropLong)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IntercityBookings::Pax).integer().not_null())
                    .col(ColumnDef::new(IntercityBookings::Luggage).integer().not_null())
                    .col(
                        ColumnDef::new(IntercityBookings::DistanceKm)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::DriverAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IntercityBookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_intercity_bookings_booking")
                            .from(IntercityBookings::Table, IntercityBookings::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_intercity_bookings_window")
                    .table(IntercityBookings::Table)
                    .col(IntercityBookings::PickupDatetime)
                    .col(IntercityBookings::DropDatetime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IntercityBookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum IntercityBookings {
    Table,
    Id,
    BookingId,
    PickupDatetime,
    DropDatetime,
    PickupAddress,
    PickupLat,
    PickupLong,
    DropAddress,
    DropLat,
    DropLong,
    Pax,
    Luggage,
    DistanceKm,
    DriverAmount,
    CreatedAt,
}
