// src/lib.rs

//! 弾道目標をカルマンフィルタで追尾し、追跡誘導で迎撃するシミュレータ

pub mod config;
pub mod math;
pub mod models;
pub mod simulation;

pub use config::Scenario;
pub use simulation::framework::{run_simulation, run_tracking};
pub use simulation::{SimulationError, SimulationOutcome, StepRecord, Termination};
