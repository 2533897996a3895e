pub mod model;
pub mod repository;

pub use model::{
    Booking, BookingDetail, BookingStatus, BookingType, DueBooking, IntercityDetail,
    NewIntercityBooking, NewSelfDriveBooking, PaymentStatus, PricingQuote, SelfDriveDetail,
    TimeWindow,
};
pub use repository::BookingRepository;
