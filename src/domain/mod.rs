//! Core business entities, types and traits

pub mod booking;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod notifier;
pub mod otp;
pub mod payment;
pub mod repositories;

pub use directory::{CarRef, Directory, UserRef};
pub use error::{DomainError, DomainResult};
pub use gateway::{OrderRef, PaymentGateway};
pub use notifier::{Notifier, NotifyError, NotifyPayload, TemplateKind};
pub use repositories::RepositoryProvider;
