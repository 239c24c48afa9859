// src/config/scenario.rs

use nalgebra::{Vector2, Vector4};
use serde::Deserialize;

use crate::config::error::ConfigError;
use crate::config::parameters::{
    FilterParameters, InterceptorParameters, TargetParameters, TimeParameters,
};
use crate::math::error::MathError;
use crate::math::kalman::{gravity_control, KalmanConfig};
use crate::models::interceptor::Interceptor;
use crate::models::missile::BallisticTrajectory;
use crate::models::radar::Radar;

/// 1回のシミュレーション実行に必要な設定一式
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub time: TimeParameters,
    pub target: TargetParameters,
    pub interceptor: InterceptorParameters,
    pub filter: FilterParameters,
    pub fuse_radius: f64, // 近接信管の半径 (m)
    pub seed: u64,        // 乱数シード
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            time: TimeParameters::default(),
            target: TargetParameters::default(),
            interceptor: InterceptorParameters::default(),
            filter: FilterParameters::default(),
            fuse_radius: 100.0,
            seed: 0,
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

impl Scenario {
    /// 設定値の検証。シミュレーション開始前に必ず呼ぶ。
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("target.launch_speed", self.target.launch_speed)?;
        require_positive("target.gravity", self.target.gravity)?;
        require_non_negative("interceptor.speed", self.interceptor.speed)?;
        require_positive("fuse_radius", self.fuse_radius)?;
        require_positive("filter.measurement_noise", self.filter.measurement_noise)?;
        require_non_negative("filter.process_noise", self.filter.process_noise)?;
        require_non_negative("filter.initial_covariance", self.filter.initial_covariance)?;

        // dt を導出する場合は両端を含めて 2 点以上必要
        let minimum = if self.time.dt.is_some() { 1 } else { 2 };
        if self.time.steps < minimum {
            return Err(ConfigError::TooFewSteps {
                steps: self.time.steps,
                minimum,
            });
        }

        let dt = self.dt();
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ConfigError::InvalidTimeStep(dt));
        }

        if self.interceptor.launch_delay > self.time.steps {
            return Err(ConfigError::DelayExceedsSteps {
                delay: self.interceptor.launch_delay,
                steps: self.time.steps,
            });
        }
        Ok(())
    }

    pub fn trajectory(&self) -> BallisticTrajectory {
        BallisticTrajectory::from_launch(
            self.target.launch_speed,
            self.target.launch_angle_deg,
            self.target.gravity,
        )
    }

    /// 時間刻み。未指定なら飛翔時間を `steps - 1` 等分する。
    pub fn dt(&self) -> f64 {
        match self.time.dt {
            Some(dt) => dt,
            None => self.trajectory().flight_time() / (self.time.steps as f64 - 1.0),
        }
    }

    pub fn steps(&self) -> usize {
        self.time.steps
    }

    pub fn interceptor(&self) -> Interceptor {
        let [x, y] = self.interceptor.initial_position;
        Interceptor::new(Vector2::new(x, y), self.interceptor.speed)
    }

    pub fn radar(&self) -> Result<Radar, MathError> {
        Radar::isotropic(self.filter.measurement_noise)
    }

    /// 迎撃シミュレーション用のフィルタ設定
    ///
    /// 初期推定が未指定なら、迎撃ミサイルの発射位置と
    /// 目標方向へ折り返した発射速度を初期値とする。
    pub fn intercept_filter_config(&self) -> KalmanConfig {
        let [x, y] = self.interceptor.initial_position;
        let angle = self.target.launch_angle_deg.to_radians();
        let v = self.interceptor.speed;
        self.filter_config(Vector4::new(x, y, -v * angle.cos(), v * angle.sin()))
    }

    /// 追尾のみの実行用のフィルタ設定。初期推定の既定値は発射地点・速度ゼロ。
    pub fn tracking_filter_config(&self) -> KalmanConfig {
        self.filter_config(Vector4::zeros())
    }

    fn filter_config(&self, default_state: Vector4<f64>) -> KalmanConfig {
        let dt = self.dt();
        let control = if self.filter.gravity_control {
            gravity_control(self.target.gravity, dt)
        } else {
            Vector4::zeros()
        };
        KalmanConfig {
            dt,
            process_noise: self.filter.process_noise,
            measurement_noise: self.filter.measurement_noise,
            initial_state: self
                .filter
                .initial_state
                .map(Vector4::from)
                .unwrap_or(default_state),
            initial_covariance: self.filter.initial_covariance,
            control,
            covariance_update: self.filter.covariance_update,
        }
    }
}
