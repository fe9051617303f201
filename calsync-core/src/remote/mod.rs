//! The remote events API.

pub mod protocol;
mod store;

pub use store::EventStore;
