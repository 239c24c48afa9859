// src/simulation/mod.rs

pub mod csv;
pub mod error;
pub mod framework;
pub mod load_parameters;

use nalgebra::Vector2;

use crate::math::KalmanFilter;
use crate::models::interceptor::{miss_distance, Interceptor};

pub use error::SimulationError;

/// シミュレーション全体の状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 発射待ち。迎撃ミサイルは静止している
    Warmup,
    /// 推定と誘導を実行中
    Tracking,
    /// 迎撃成功（終端）
    Intercepted { step: usize },
    /// 最大ステップ数に到達（終端）
    Exhausted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Intercepted { .. } | Phase::Exhausted)
    }
}

/// シミュレーションの全体状態
///
/// フィルタと迎撃ミサイルはこの構造体が所有し、
/// `framework::execute_simulation_step` だけが次の状態を作る。
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    step: usize,
    phase: Phase,
    filter: KalmanFilter,
    interceptor: Interceptor,
}

impl SimulationState {
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> &KalmanFilter {
        &self.filter
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }
}

/// 1ステップ分の出力
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step_index: usize,
    pub time: f64,
    pub true_position: Vector2<f64>,
    pub observation: Option<Vector2<f64>>, // 発射待ち中は None
    pub estimated_position: Vector2<f64>,
    pub interceptor_position: Vector2<f64>,
    pub intercepted: bool,
}

impl StepRecord {
    pub fn miss_distance(&self) -> f64 {
        miss_distance(&self.true_position, &self.interceptor_position)
    }
}

/// 終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Intercepted { step: usize },
    Exhausted { steps: usize },
}

/// 迎撃シミュレーションの結果
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub records: Vec<StepRecord>,
    pub termination: Termination,
}

impl SimulationOutcome {
    pub fn intercepted(&self) -> bool {
        matches!(self.termination, Termination::Intercepted { .. })
    }

    pub fn interception_step(&self) -> Option<usize> {
        match self.termination {
            Termination::Intercepted { step } => Some(step),
            Termination::Exhausted { .. } => None,
        }
    }

    /// 最終ステップでの目標と迎撃ミサイルの距離
    pub fn final_miss_distance(&self) -> Option<f64> {
        self.records.last().map(StepRecord::miss_distance)
    }
}

/// 追尾のみの実行における1ステップ分の出力
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub step_index: usize,
    pub time: f64,
    pub true_position: Vector2<f64>,
    pub observation: Vector2<f64>,
    pub estimated_position: Vector2<f64>,
}

/// 追尾のみの実行結果
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingOutcome {
    pub records: Vec<TrackRecord>,
}

fn rmse(errors: impl Iterator<Item = Vector2<f64>>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    (errors.map(|e| e.norm_squared()).sum::<f64>() / n as f64).sqrt()
}

impl TrackingOutcome {
    /// 観測値の位置誤差 RMSE
    pub fn observation_rmse(&self) -> f64 {
        rmse(
            self.records.iter().map(|r| r.observation - r.true_position),
            self.records.len(),
        )
    }

    /// 推定値の位置誤差 RMSE
    pub fn estimate_rmse(&self) -> f64 {
        rmse(
            self.records.iter().map(|r| r.estimated_position - r.true_position),
            self.records.len(),
        )
    }
}
