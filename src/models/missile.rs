// src/models/missile.rs

use nalgebra::Vector2;

/// 弾道ミサイル（目標）の軌道
///
/// 平坦な地表から高度 0 で発射され、一定の重力加速度のみを受ける。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticTrajectory {
    pub v0x: f64, // 初速の水平成分 (m/s)
    pub v0y: f64, // 初速の鉛直成分 (m/s)
    pub g: f64,   // 重力加速度 (m/s²)
}

impl BallisticTrajectory {
    /// 初速と発射角から軌道を生成する
    ///
    /// # 引数
    /// - `speed`: 初速 (m/s)
    /// - `angle_deg`: 発射角（度）
    /// - `g`: 重力加速度 (m/s²)
    pub fn from_launch(speed: f64, angle_deg: f64, g: f64) -> Self {
        let angle = angle_deg.to_radians();
        BallisticTrajectory {
            v0x: speed * angle.cos(),
            v0y: speed * angle.sin(),
            g,
        }
    }

    /// 地表に戻るまでの飛翔時間 2 v0y / g
    pub fn flight_time(&self) -> f64 {
        2.0 * self.v0y / self.g
    }

    /// 時刻 `t` における真の位置
    ///
    /// 高度は 0 未満にならないよう切り上げる。着弾後も水平位置は増え続ける。
    pub fn position_at(&self, t: f64) -> Vector2<f64> {
        let x = self.v0x * t;
        let y = self.v0y * t - 0.5 * self.g * t * t;
        Vector2::new(x, y.max(0.0))
    }

    /// ステップ番号 `step` の真の位置
    pub fn position_at_step(&self, step: usize, dt: f64) -> Vector2<f64> {
        self.position_at(step as f64 * dt)
    }

    /// 0 から `steps - 1` までの全ステップの真の位置
    pub fn sample(&self, dt: f64, steps: usize) -> Vec<Vector2<f64>> {
        (0..steps).map(|i| self.position_at_step(i, dt)).collect()
    }
}
