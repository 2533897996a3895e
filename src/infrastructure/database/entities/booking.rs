//! Booking header entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub guest_id: i32,
    pub car_id: i32,

    /// Booking mode: SELF_DRIVE, INTERCITY
    pub booking_type: String,

    /// Lifecycle status: CONFIRMED, ACTIVE, COMPLETED, CANCELLED
    pub status: String,

    pub total_amount: i64,
    pub paid_amount: i64,

    /// PAID, REFUNDED
    pub payment_status: String,

    #[sea_orm(nullable)]
    pub cancelled_reason: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::GuestId",
        to = "super::user::Column::Id"
    )]
    Guest,

    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,

    #[sea_orm(has_one = "super::self_drive_booking::Entity")]
    SelfDriveDetail,

    #[sea_orm(has_one = "super::intercity_booking::Entity")]
    IntercityDetail,

    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,

    #[sea_orm(has_many = "super::booking_otp::Entity")]
    Otps,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::self_drive_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelfDriveDetail.def()
    }
}

impl Related<super::intercity_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IntercityDetail.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::booking_otp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Otps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
