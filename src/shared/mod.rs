pub mod shutdown;

pub use shutdown::{ShutdownNotified, ShutdownSignal};
