pub mod env;
pub mod error;
pub mod secret_store;
pub mod telemetry;
