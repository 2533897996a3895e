//! Intercity booking detail entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "intercity_bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub booking_id: i32,

    pub pickup_datetime: DateTimeUtc,
    pub drop_datetime: DateTimeUtc,

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

    pub pax: i32,
    pub luggage: i32,

    #[sea_orm(column_type = "Double")]
    pub distance_km: f64,

    pub driver_amount: i64,

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
