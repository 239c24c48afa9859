// src/math/mod.rs

pub mod error;
pub mod gaussian;
pub mod kalman;

pub use error::MathError;
pub use gaussian::MultivariateNormal;
pub use kalman::{CovarianceUpdate, KalmanConfig, KalmanFilter};
