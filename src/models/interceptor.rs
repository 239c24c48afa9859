// src/models/interceptor.rs

use nalgebra::Vector2;

/// 方向ベクトルの長さがこれ以下なら誘導方向を定義できないとみなす
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// 迎撃ミサイルの構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interceptor {
    pub position: Vector2<f64>,         // 現在位置 [x, y]
    pub initial_position: Vector2<f64>, // 発射位置
    pub speed: f64,                     // 速さ (m/s)
}

/// 1ステップ分の誘導結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuidanceStep {
    /// 推定位置に向かって前進した
    Advanced(Vector2<f64>),
    /// 方向が定義できず、その場にとどまった
    Held(Vector2<f64>),
}

impl GuidanceStep {
    pub fn position(&self) -> Vector2<f64> {
        match *self {
            GuidanceStep::Advanced(p) | GuidanceStep::Held(p) => p,
        }
    }
}

impl Interceptor {
    pub fn new(initial_position: Vector2<f64>, speed: f64) -> Self {
        Interceptor {
            position: initial_position,
            initial_position,
            speed,
        }
    }
}

/// 迎撃ミサイルから推定位置へ向かう単位ベクトル
///
/// # 戻り値
/// - 2点が一致する（長さが `DIRECTION_EPSILON` 以下）場合は `None`
pub fn pursuit_direction(from: &Vector2<f64>, to: &Vector2<f64>) -> Option<Vector2<f64>> {
    let rel = to - from;
    let distance = rel.norm();
    if distance <= DIRECTION_EPSILON {
        return None;
    }
    Some(rel / distance)
}

/// 追跡誘導による迎撃ミサイルの位置更新
///
/// # 引数
/// - `interceptor`: 現在の迎撃ミサイル
/// - `estimated_position`: フィルタが推定した目標位置
/// - `dt`: 時間ステップ
///
/// # 戻り値
/// - 更新後の迎撃ミサイルと誘導結果
pub fn update_interceptor(
    interceptor: &Interceptor,
    estimated_position: &Vector2<f64>,
    dt: f64,
) -> (Interceptor, GuidanceStep) {
    match pursuit_direction(&interceptor.position, estimated_position) {
        Some(direction) => {
            let new_position = interceptor.position + direction * (interceptor.speed * dt);
            (
                Interceptor {
                    position: new_position,
                    ..*interceptor
                },
                GuidanceStep::Advanced(new_position),
            )
        }
        None => (*interceptor, GuidanceStep::Held(interceptor.position)),
    }
}

/// 目標と迎撃ミサイルの距離
pub fn miss_distance(target: &Vector2<f64>, interceptor: &Vector2<f64>) -> f64 {
    (target - interceptor).norm()
}

/// 迎撃判定 (距離が近接信管の半径未満なら迎撃成功)
pub fn check_interception(target: &Vector2<f64>, interceptor: &Vector2<f64>, fuse_radius: f64) -> bool {
    miss_distance(target, interceptor) < fuse_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pursuit_direction_is_unit() {
        let dir = pursuit_direction(&Vector2::new(0.0, 0.0), &Vector2::new(3.0, 4.0)).unwrap();
        assert_relative_eq!(dir, Vector2::new(0.6, 0.8), epsilon = 1e-12);
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_update_interceptor_moves_speed_times_dt() {
        let interceptor = Interceptor::new(Vector2::new(200_000.0, 0.0), 1600.0);
        let target = Vector2::new(0.0, 0.0);

        let (updated, step) = update_interceptor(&interceptor, &target, 0.5);

        assert_relative_eq!(updated.position, Vector2::new(199_200.0, 0.0), epsilon = 1e-9);
        assert_eq!(step, GuidanceStep::Advanced(updated.position));
        assert_eq!(updated.initial_position, interceptor.initial_position);
        assert_eq!(updated.speed, 1600.0);
    }

    #[test]
    fn test_update_interceptor_coincident_positions_hold() {
        let interceptor = Interceptor::new(Vector2::new(10.0, 20.0), 1600.0);
        let estimate = Vector2::new(10.0, 20.0);

        let (updated, step) = update_interceptor(&interceptor, &estimate, 0.5);

        assert_eq!(updated.position, interceptor.position);
        assert_eq!(step, GuidanceStep::Held(interceptor.position));
        assert!(updated.position.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_speed_never_moves() {
        let interceptor = Interceptor::new(Vector2::new(1.0, 1.0), 0.0);
        let (updated, _) = update_interceptor(&interceptor, &Vector2::new(100.0, 100.0), 1.0);
        assert_eq!(updated.position, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn test_check_interception_threshold_is_strict() {
        let target = Vector2::new(0.0, 0.0);
        assert!(check_interception(&target, &Vector2::new(99.9, 0.0), 100.0));
        assert!(!check_interception(&target, &Vector2::new(100.0, 0.0), 100.0));
        assert!(!check_interception(&target, &Vector2::new(60.0, 80.1), 100.0));
        assert_relative_eq!(miss_distance(&target, &Vector2::new(60.0, 80.0)), 100.0);
    }
}
