// src/simulation/framework.rs

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Scenario;
use crate::math::KalmanFilter;
use crate::models::interceptor::{check_interception, update_interceptor, GuidanceStep};
use crate::models::missile::BallisticTrajectory;
use crate::models::radar::Radar;
use crate::simulation::{
    Phase, SimulationError, SimulationOutcome, SimulationState, StepRecord, Termination,
    TrackRecord, TrackingOutcome,
};

/// 実行中に変化しない値
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationContext {
    pub dt: f64,
    pub steps: usize,
    pub launch_delay: usize,
    pub fuse_radius: f64,
    pub trajectory: BallisticTrajectory,
    pub radar: Radar,
}

impl SimulationContext {
    /// 設定を検証してから実行用の定数を組み立てる
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, SimulationError> {
        scenario.validate()?;
        Ok(SimulationContext {
            dt: scenario.dt(),
            steps: scenario.steps(),
            launch_delay: scenario.interceptor.launch_delay,
            fuse_radius: scenario.fuse_radius,
            trajectory: scenario.trajectory(),
            radar: scenario.radar()?,
        })
    }

    fn phase_after(&self, step: usize) -> Phase {
        let next = step + 1;
        if next >= self.steps {
            Phase::Exhausted
        } else if next < self.launch_delay {
            Phase::Warmup
        } else {
            Phase::Tracking
        }
    }
}

/// シミュレーションステートの初期化
pub fn initialize_simulation_state(
    scenario: &Scenario,
) -> Result<(SimulationContext, SimulationState), SimulationError> {
    let context = SimulationContext::from_scenario(scenario)?;
    let phase = if context.launch_delay == 0 {
        Phase::Tracking
    } else {
        Phase::Warmup
    };
    let state = SimulationState {
        step: 0,
        phase,
        filter: KalmanFilter::new(&scenario.intercept_filter_config()),
        interceptor: scenario.interceptor(),
    };
    Ok((context, state))
}

/// シミュレーションステップの実行
///
/// 現在の状態から次の状態とこのステップの出力を作る。
/// 終端状態に対して呼ぶと `SimulationError::Finished` を返す。
pub fn execute_simulation_step<R: Rng + ?Sized>(
    state: &SimulationState,
    context: &SimulationContext,
    rng: &mut R,
) -> Result<(SimulationState, StepRecord), SimulationError> {
    let step = state.step;
    let time = step as f64 * context.dt;
    let true_position = context.trajectory.position_at(time);

    match state.phase {
        Phase::Intercepted { .. } | Phase::Exhausted => Err(SimulationError::Finished(state.phase)),
        Phase::Warmup => {
            // 発射前: 推定値として自身の位置を記録する
            let position = state.interceptor.position;
            let record = StepRecord {
                step_index: step,
                time,
                true_position,
                observation: None,
                estimated_position: position,
                interceptor_position: position,
                intercepted: false,
            };
            let phase = context.phase_after(step);
            if phase == Phase::Tracking {
                info!(step = step + 1, "interceptor launched, tracking started");
            }
            let next = SimulationState {
                step: step + 1,
                phase,
                ..state.clone()
            };
            Ok((next, record))
        }
        Phase::Tracking => {
            let observation = context.radar.measure(&true_position, rng);

            let mut filter = state.filter.clone();
            filter.predict();
            filter.update(&observation)?;
            let estimated_position = filter.position();

            let (interceptor, guidance) = update_interceptor(&state.interceptor, &estimated_position, context.dt);
            if let GuidanceStep::Held(position) = guidance {
                warn!(step, x = position[0], y = position[1], "pursuit direction undefined, interceptor holds position");
            }

            let intercepted = check_interception(&true_position, &interceptor.position, context.fuse_radius);
            let record = StepRecord {
                step_index: step,
                time,
                true_position,
                observation: Some(observation),
                estimated_position,
                interceptor_position: interceptor.position,
                intercepted,
            };
            debug!(
                step,
                est_x = estimated_position[0],
                est_y = estimated_position[1],
                miss = record.miss_distance(),
                "tracking step"
            );

            let phase = if intercepted {
                Phase::Intercepted { step }
            } else {
                context.phase_after(step)
            };
            let next = SimulationState {
                step: step + 1,
                phase,
                filter,
                interceptor,
            };
            Ok((next, record))
        }
    }
}

/// 迎撃シミュレーション全体の実行
///
/// # 引数
/// - `scenario`: 設定
/// - `rng`: 観測雑音の乱数生成器
///
/// # 戻り値
/// - 各ステップの出力と終了理由
pub fn run_simulation<R: Rng + ?Sized>(
    scenario: &Scenario,
    rng: &mut R,
) -> Result<SimulationOutcome, SimulationError> {
    let (context, mut state) = initialize_simulation_state(scenario)?;
    info!(
        steps = context.steps,
        dt = context.dt,
        delay = context.launch_delay,
        "starting interception run"
    );

    let mut records = Vec::with_capacity(context.steps);
    while !state.phase.is_terminal() {
        let (next, record) = execute_simulation_step(&state, &context, rng)?;
        records.push(record);
        state = next;
    }

    let termination = match state.phase {
        Phase::Intercepted { step } => {
            info!(step, time = step as f64 * context.dt, "target intercepted");
            Termination::Intercepted { step }
        }
        _ => {
            info!(steps = records.len(), "no interception before step limit");
            Termination::Exhausted { steps: records.len() }
        }
    };

    Ok(SimulationOutcome {
        records,
        termination,
    })
}

/// 迎撃ミサイルなしで目標の追尾だけを行う
pub fn run_tracking<R: Rng + ?Sized>(
    scenario: &Scenario,
    rng: &mut R,
) -> Result<TrackingOutcome, SimulationError> {
    let context = SimulationContext::from_scenario(scenario)?;
    let mut filter = KalmanFilter::new(&scenario.tracking_filter_config());
    info!(steps = context.steps, dt = context.dt, "starting tracking run");

    let mut records = Vec::with_capacity(context.steps);
    for step in 0..context.steps {
        let time = step as f64 * context.dt;
        let true_position = context.trajectory.position_at(time);
        let observation = context.radar.measure(&true_position, rng);

        filter.predict();
        filter.update(&observation)?;

        records.push(TrackRecord {
            step_index: step,
            time,
            true_position,
            observation,
            estimated_position: filter.position(),
        });
    }

    let outcome = TrackingOutcome { records };
    info!(
        observation_rmse = outcome.observation_rmse(),
        estimate_rmse = outcome.estimate_rmse(),
        "tracking finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_scenario() -> Scenario {
        Scenario::default()
    }

    #[test]
    fn test_reference_scenario_terminates() {
        let scenario = reference_scenario();
        let mut rng = StdRng::seed_from_u64(scenario.seed);
        let outcome = run_simulation(&scenario, &mut rng).unwrap();

        match outcome.termination {
            Termination::Intercepted { step } => {
                assert!(step < scenario.steps());
                assert_eq!(outcome.records.len(), step + 1);
                let last = outcome.records.last().unwrap();
                assert!(last.intercepted);
                assert!(last.miss_distance() < scenario.fuse_radius);
            }
            Termination::Exhausted { steps } => {
                assert_eq!(steps, scenario.steps());
                assert_eq!(outcome.records.len(), scenario.steps());
                assert!(outcome.records.iter().all(|r| !r.intercepted));
            }
        }
        assert!(outcome.records.iter().all(|r| r.true_position[1] >= 0.0));
        // 迎撃フラグが立つのは最後の1ステップのみ
        let flagged = outcome.records.iter().filter(|r| r.intercepted).count();
        assert_eq!(flagged, usize::from(outcome.intercepted()));
    }

    #[test]
    fn test_warmup_keeps_interceptor_at_initial_position() {
        let scenario = reference_scenario();
        let initial = Vector2::new(200_000.0, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = run_simulation(&scenario, &mut rng).unwrap();

        for record in outcome.records.iter().take(scenario.interceptor.launch_delay) {
            assert_eq!(record.interceptor_position, initial);
            assert_eq!(record.estimated_position, initial);
            assert_eq!(record.observation, None);
            assert!(!record.intercepted);
        }
        // 発射直後のステップでは観測が記録される
        let first_tracking = &outcome.records[scenario.interceptor.launch_delay];
        assert!(first_tracking.observation.is_some());
        assert_ne!(first_tracking.interceptor_position, initial);
    }

    #[test]
    fn test_zero_speed_interceptor_exhausts() {
        let mut scenario = reference_scenario();
        scenario.interceptor.speed = 0.0;
        scenario.time.steps = 120;
        scenario.interceptor.launch_delay = 10;
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = run_simulation(&scenario, &mut rng).unwrap();

        assert_eq!(outcome.termination, Termination::Exhausted { steps: 120 });
        assert!(!outcome.intercepted());
        assert_eq!(outcome.interception_step(), None);
        assert_eq!(outcome.records.len(), 120);
        assert_eq!(outcome.records.last().unwrap().step_index, 119);
        assert!(outcome
            .records
            .iter()
            .all(|r| r.interceptor_position == Vector2::new(200_000.0, 0.0)));
    }

    #[test]
    fn test_phase_transitions_once_at_delay() {
        let mut scenario = reference_scenario();
        scenario.time.steps = 20;
        scenario.interceptor.launch_delay = 5;
        let (context, mut state) = initialize_simulation_state(&scenario).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let mut phases = vec![state.phase()];
        while !state.phase().is_terminal() {
            let (next, _) = execute_simulation_step(&state, &context, &mut rng).unwrap();
            phases.push(next.phase());
            state = next;
        }

        assert!(phases[..5].iter().all(|p| *p == Phase::Warmup));
        assert_eq!(phases[5], Phase::Tracking);
        let switches = phases
            .windows(2)
            .filter(|w| w[0] == Phase::Warmup && w[1] == Phase::Tracking)
            .count();
        assert_eq!(switches, 1);
        assert!(phases.last().unwrap().is_terminal());
    }

    #[test]
    fn test_zero_delay_starts_tracking() {
        let mut scenario = reference_scenario();
        scenario.interceptor.launch_delay = 0;
        let (_, state) = initialize_simulation_state(&scenario).unwrap();
        assert_eq!(state.phase(), Phase::Tracking);
    }

    #[test]
    fn test_delay_equal_to_steps_is_all_warmup() {
        let mut scenario = reference_scenario();
        scenario.time.steps = 8;
        scenario.interceptor.launch_delay = 8;
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = run_simulation(&scenario, &mut rng).unwrap();
        assert_eq!(outcome.termination, Termination::Exhausted { steps: 8 });
        assert!(outcome.records.iter().all(|r| r.observation.is_none()));
    }

    #[test]
    fn test_interception_is_terminal() {
        // 迎撃ミサイルを目標の発射地点付近に置き、すぐに迎撃させる
        let mut scenario = reference_scenario();
        scenario.interceptor.initial_position = [0.0, 0.0];
        scenario.interceptor.launch_delay = 0;
        scenario.interceptor.speed = 1.0;
        scenario.fuse_radius = 5_000.0;
        let (context, state) = initialize_simulation_state(&scenario).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let (next, record) = execute_simulation_step(&state, &context, &mut rng).unwrap();
        assert!(record.intercepted);
        assert_eq!(next.phase(), Phase::Intercepted { step: 0 });

        // 終端状態からはこれ以上進まない
        let again = execute_simulation_step(&next, &context, &mut rng);
        assert!(matches!(
            again,
            Err(SimulationError::Finished(Phase::Intercepted { step: 0 }))
        ));
        assert_eq!(next.phase(), Phase::Intercepted { step: 0 });

        let mut rng = StdRng::seed_from_u64(4);
        let outcome = run_simulation(&scenario, &mut rng).unwrap();
        assert_eq!(outcome.termination, Termination::Intercepted { step: 0 });
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.interception_step(), Some(0));
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let scenario = reference_scenario();
        let a = run_simulation(&scenario, &mut StdRng::seed_from_u64(77)).unwrap();
        let b = run_simulation(&scenario, &mut StdRng::seed_from_u64(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_scenario_fails_before_running() {
        let mut scenario = reference_scenario();
        scenario.time.dt = Some(-0.1);
        let result = run_simulation(&scenario, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_covariance_stays_symmetric_through_run() {
        let mut scenario = reference_scenario();
        scenario.interceptor.launch_delay = 0;
        let (context, mut state) = initialize_simulation_state(&scenario).unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        while !state.phase().is_terminal() {
            let (next, _) = execute_simulation_step(&state, &context, &mut rng).unwrap();
            let p = next.filter().covariance();
            for i in 0..4 {
                assert!(p[(i, i)] >= 0.0);
                for j in 0..4 {
                    assert_eq!(p[(i, j)], p[(j, i)]);
                }
            }
            state = next;
        }
    }

    #[test]
    fn test_tracking_run_beats_raw_observations() {
        let mut scenario = reference_scenario();
        // 初期推定（発射地点・速度ゼロ）は大きな不確かさで始める
        scenario.filter.initial_covariance = 1e6;
        let mut rng = StdRng::seed_from_u64(13);

        let outcome = run_tracking(&scenario, &mut rng).unwrap();

        assert_eq!(outcome.records.len(), scenario.steps());
        assert!(outcome.estimate_rmse() < outcome.observation_rmse());
        assert!(outcome.records.iter().all(|r| r.true_position[1] >= 0.0));
    }
}
