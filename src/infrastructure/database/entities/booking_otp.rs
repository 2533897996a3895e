//! Booking OTP entity
//!
//! Unique on (booking_id, otp_type); re-issuance upserts in place.
//! Rows are never deleted, they are the handover audit trail.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_otps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub booking_id: i32,

    /// PICKUP, DROP
    pub otp_type: String,

    pub otp_code: String,

    pub expires_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub verified_at: Option<DateTimeUtc>,

    /// GUEST, HOST, DRIVER
    #[sea_orm(nullable)]
    pub verified_by: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
