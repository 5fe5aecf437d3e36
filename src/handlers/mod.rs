//! Protocol handlers for processor registration and unregistration.

mod register;
mod unregister;

pub use register::{RegisterHandler, DEFAULT_MAX_OCCUPANCY, SDK_PROTOCOL_VERSION};
pub use unregister::UnregisterHandler;
