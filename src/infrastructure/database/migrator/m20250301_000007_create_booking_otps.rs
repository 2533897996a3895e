//! Create booking_otps table
//!
//! The unique index on (booking_id, otp_type) backs the upsert-based
//! re-issuance: at most one row per booking and purpose, ever.

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
                    .table(BookingOtps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingOtps::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookingOtps::BookingId).integer().not_null())
                    .col(ColumnDef::new(BookingOtps::OtpType).string().not_null())
                    .col(ColumnDef::new(BookingOtps::OtpCode).string().not_null())
                    .col(
                        ColumnDef::new(BookingOtps::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingOtps::VerifiedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(BookingOtps::VerifiedBy).string())
                    .col(
                        ColumnDef::new(BookingOtps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookingOtps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_otps_booking")
                            .from(BookingOtps::Table, BookingOtps::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_booking_otps_booking_type")
                    .table(BookingOtps::Table)
                    .col(BookingOtps::BookingId)
                    .col(BookingOtps::OtpType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingOtps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookingOtps {
    Table,
    Id,
    BookingId,
    OtpType,
    OtpCode,
    ExpiresAt,
    VerifiedAt,
    VerifiedBy,
    CreatedAt,
    UpdatedAt,
}
