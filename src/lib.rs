pub mod achievements;
pub mod catalog;
pub mod config;
pub mod error;
pub mod profile_register;
pub mod profile_store;
pub mod snapshot;
pub mod sqlite_persistence;
pub mod stats;

pub use error::CoreError;
