// src/config/mod.rs

pub mod error;
pub mod parameters;
pub mod scenario;

pub use error::ConfigError;
pub use parameters::{FilterParameters, InterceptorParameters, TargetParameters, TimeParameters};
pub use scenario::Scenario;
