pub mod model;
pub mod repository;

pub use model::{Payment, PaymentMethod, PaymentOutcome};
pub use repository::PaymentRepository;
