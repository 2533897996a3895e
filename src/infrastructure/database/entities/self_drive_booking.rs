//! Self-drive booking detail entity
//!
//! Carries the rental window and the pricing snapshot frozen at
//! booking time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "self_drive_bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub booking_id: i32,

    pub start_datetime: DateTimeUtc,
    pub end_datetime: DateTimeUtc,

    pub pickup_address: String,
    #[sea_orm(column_type = "Double")]
    pub pickup_lat: f64,
    #[sea_orm(column_type = "Double")]
    pub pickup_long: f64,

    pub drop_address: String,
    #[sea_orm(column_type = "Double")]
    pub drop_lat: f64,
    #[sea_orm(column_type = "Double")]
    pub drop_long: f64,

    // Pricing snapshot
    pub hourly_rate_snapshot: i64,
    pub base_amount: i64,
    pub insure_amount: i64,
    pub driver_amount: i64,
    pub drop_charge: i64,
    pub gst_amount: i64,
    pub total_amount: i64,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
