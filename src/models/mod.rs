// src/models/mod.rs

pub mod interceptor;
pub mod missile;
pub mod radar;

pub use interceptor::Interceptor;
pub use missile::BallisticTrajectory;
pub use radar::Radar;
