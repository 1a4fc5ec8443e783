use osprey_arm::application::MotionService;
use osprey_arm::common::{DomainError, DomainResult};
use osprey_arm::config::PlanningConfig;
use osprey_arm::domains::motion::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

fn test_config(point_n_step: u32) -> PlanningConfig {
    PlanningConfig {
        point_n_step,
        eef_step: 0.01,
        jump_threshold: 1.2,
        planner_id: "RRTConnectkConfigDefault".to_string(),
    }
}

/// Trajectory with `n` waypoints spaced `dt` seconds apart. Distinct `dt`
/// values let tests tell scripted trajectories apart.
fn trajectory_of(n: usize, dt: f64) -> Trajectory {
    let waypoints = (0..n)
        .map(|i| Waypoint::new(JointVector::zeros(), i as f64 * dt))
        .collect();
    Trajectory::new(waypoints)
}

fn some_pose() -> Pose {
    Pose {
        position: Position3D {
            x: 0.4,
            y: -0.2,
            z: 0.6,
        },
        orientation: Orientation::identity(),
    }
}

#[derive(Default)]
struct BackendLog {
    calls: Vec<String>,
    cartesian_requests: Vec<Vec<Pose>>,
    executed: Vec<Trajectory>,
}

/// Backend whose plan results are scripted ahead of time and whose calls
/// are recorded for inspection.
struct ScriptedBackend {
    log: Arc<Mutex<BackendLog>>,
    plans: VecDeque<DomainResult<Trajectory>>,
    cartesian_plans: VecDeque<CartesianPlan>,
    execute_result: bool,
    sample_counter: f64,
}

impl ScriptedBackend {
    fn new(log: Arc<Mutex<BackendLog>>) -> Self {
        Self {
            log,
            plans: VecDeque::new(),
            cartesian_plans: VecDeque::new(),
            execute_result: true,
            sample_counter: 0.0,
        }
    }

    fn with_plans(log: Arc<Mutex<BackendLog>>, plans: Vec<Trajectory>) -> Self {
        let mut backend = Self::new(log);
        backend.plans = plans.into_iter().map(Ok).collect();
        backend
    }

    fn push_plan_error(&mut self, message: &str) {
        self.plans
            .push_back(Err(DomainError::Backend(message.to_string())));
    }

    fn with_cartesian(log: Arc<Mutex<BackendLog>>, plans: Vec<CartesianPlan>) -> Self {
        let mut backend = Self::new(log);
        backend.cartesian_plans = plans.into();
        backend
    }

    fn record(&self, call: &str) {
        self.log.lock().unwrap().calls.push(call.to_string());
    }

    /// Orientation reported by `current_pose`, deliberately not identity so
    /// tests can verify it is held fixed for random paths.
    fn reference_orientation() -> Orientation {
        Orientation {
            x: 0.1,
            y: 0.2,
            z: 0.3,
            w: 0.9,
        }
    }
}

#[async_trait]
impl PlanningBackend for ScriptedBackend {
    async fn ready(&mut self) -> DomainResult<()> {
        self.record("ready");
        Ok(())
    }

    async fn select_planner(&mut self, _planner_id: &str) -> DomainResult<()> {
        self.record("select_planner");
        Ok(())
    }

    async fn set_joint_goal(&mut self, _target: &JointVector) -> DomainResult<()> {
        self.record("set_joint_goal");
        Ok(())
    }

    async fn set_pose_goal(&mut self, _target: &Pose) -> DomainResult<()> {
        self.record("set_pose_goal");
        Ok(())
    }

    async fn clear_pose_goals(&mut self) -> DomainResult<()> {
        self.record("clear_pose_goals");
        Ok(())
    }

    async fn plan(&mut self) -> DomainResult<Trajectory> {
        self.record("plan");
        self.plans
            .pop_front()
            .unwrap_or_else(|| Ok(trajectory_of(1, 0.1)))
    }

    async fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        _eef_step: f64,
        _jump_threshold: f64,
    ) -> DomainResult<CartesianPlan> {
        self.record("compute_cartesian_path");
        self.log
            .lock()
            .unwrap()
            .cartesian_requests
            .push(waypoints.to_vec());
        Ok(self.cartesian_plans.pop_front().unwrap_or(CartesianPlan {
            trajectory: trajectory_of(3, 0.1),
            fraction: 1.0,
        }))
    }

    async fn execute(&mut self, trajectory: &Trajectory) -> DomainResult<bool> {
        self.record("execute");
        self.log.lock().unwrap().executed.push(trajectory.clone());
        Ok(self.execute_result)
    }

    async fn random_pose(&mut self) -> DomainResult<Pose> {
        self.record("random_pose");
        self.sample_counter += 1.0;
        Ok(Pose {
            position: Position3D {
                x: self.sample_counter,
                y: -self.sample_counter,
                z: 0.5,
            },
            // Sampled orientations differ from the reference on purpose.
            orientation: Orientation::identity(),
        })
    }

    async fn random_joint_values(&mut self) -> DomainResult<JointVector> {
        self.record("random_joint_values");
        Ok(JointVector::new([0.5; 7]))
    }

    async fn current_pose(&mut self) -> DomainResult<Pose> {
        self.record("current_pose");
        Ok(Pose {
            position: Position3D {
                x: 0.3,
                y: 0.0,
                z: 0.8,
            },
            orientation: Self::reference_orientation(),
        })
    }
}

#[derive(Default)]
struct RecordingDisplay {
    seen: Arc<Mutex<Vec<Trajectory>>>,
}

impl TrajectoryDisplay for RecordingDisplay {
    fn display(&self, trajectory: &Trajectory) -> DomainResult<()> {
        self.seen.lock().unwrap().push(trajectory.clone());
        Ok(())
    }
}

struct Harness {
    service: MotionService,
    log: Arc<Mutex<BackendLog>>,
    displayed: Arc<Mutex<Vec<Trajectory>>>,
}

fn harness(backend: ScriptedBackend, point_n_step: u32) -> Harness {
    let log = backend.log.clone();
    let display = RecordingDisplay::default();
    let displayed = display.seen.clone();
    let service = MotionService::new(
        Box::new(backend),
        Box::new(display),
        &test_config(point_n_step),
    );
    Harness {
        service,
        log,
        displayed,
    }
}

#[tokio::test]
async fn test_malformed_joint_goal_rejected_without_backend_call() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let h = harness(ScriptedBackend::new(log), 1);

    assert!(!h.service.plan_to_joint(&[0.0; 6]).await);
    assert!(!h.service.plan_to_joint(&[0.0; 8]).await);
    assert!(h.log.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn test_successful_joint_plan_caches_viable_trajectory() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(5, 0.1)]);
    let h = harness(backend, 1);

    assert!(h.service.plan_to_joint(&[0.0; 7]).await);
    assert!(h.service.visualize_plan().await);

    let displayed = h.displayed.lock().unwrap();
    assert_eq!(displayed.len(), 1);
    assert!(displayed[0].len() > 1);
    assert_eq!(displayed[0].len(), 5);
}

#[tokio::test]
async fn test_failed_plan_clears_cache() {
    // Backend always returns a 1-waypoint trajectory: no motion found.
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(1, 0.1)]);
    let h = harness(backend, 1);

    assert!(!h.service.plan_to_joint(&[0.0; 7]).await);
    assert!(!h.service.execute_plan().await);
    assert!(h.log.lock().unwrap().executed.is_empty());
}

#[tokio::test]
async fn test_failure_overwrites_earlier_success() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(
        log.clone(),
        vec![trajectory_of(5, 0.1), trajectory_of(1, 0.1)],
    );
    let h = harness(backend, 1);

    assert!(h.service.plan_to_joint(&[0.0; 7]).await);
    assert!(h.service.execute_plan().await);

    // The second request fails and must clear the earlier plan.
    assert!(!h.service.plan_to_joint(&[0.0; 7]).await);
    assert!(!h.service.execute_plan().await);
    assert!(!h.service.visualize_plan().await);
}

#[tokio::test]
async fn test_execute_is_idempotent_replay() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(4, 0.1)]);
    let h = harness(backend, 1);

    assert!(h.service.plan_to_joint(&[0.0; 7]).await);
    assert!(h.service.execute_plan().await);
    assert!(h.service.execute_plan().await);

    let executed = &h.log.lock().unwrap().executed;
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0], executed[1]);
}

#[tokio::test]
async fn test_multi_trial_selects_first_minimum() {
    // Trial waypoint counts [5, 3, 9, 3]: the winner must be trial 1, the
    // first occurrence of the minimum, not trial 3. The per-trial waypoint
    // spacing tells the two 3-waypoint candidates apart.
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(
        log.clone(),
        vec![
            trajectory_of(5, 0.1),
            trajectory_of(3, 0.2),
            trajectory_of(9, 0.3),
            trajectory_of(3, 0.4),
        ],
    );
    let h = harness(backend, 4);

    assert!(h.service.plan_to_point(some_pose()).await);
    assert!(h.service.visualize_plan().await);

    let displayed = h.displayed.lock().unwrap();
    assert_eq!(displayed[0].len(), 3);
    assert!((displayed[0].waypoints[1].time_from_start - 0.2).abs() < 1e-12);

    // All four trials ran sequentially against the one pose goal.
    let calls = &h.log.lock().unwrap().calls;
    assert_eq!(calls.iter().filter(|c| *c == "plan").count(), 4);
    assert_eq!(calls.iter().filter(|c| *c == "set_pose_goal").count(), 1);
    assert!(calls.contains(&"clear_pose_goals".to_string()));
}

#[tokio::test]
async fn test_all_trials_failing_reports_no_plan() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(
        log.clone(),
        vec![
            trajectory_of(1, 0.1),
            trajectory_of(0, 0.1),
            trajectory_of(1, 0.1),
        ],
    );
    let h = harness(backend, 3);

    assert!(!h.service.plan_to_point(some_pose()).await);
    assert!(!h.service.execute_plan().await);
}

#[tokio::test]
async fn test_pose_goal_cleared_when_a_trial_errors() {
    // A backend fault mid-loop must not leave the pose goal set on the
    // adapter.
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let mut backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(5, 0.1)]);
    backend.push_plan_error("planner crashed");
    let h = harness(backend, 3);

    assert!(!h.service.plan_to_point(some_pose()).await);

    {
        let calls = &h.log.lock().unwrap().calls;
        assert!(calls.contains(&"clear_pose_goals".to_string()));
        // The error surfaced on the second of three trials.
        assert_eq!(calls.iter().filter(|c| *c == "plan").count(), 2);
    }

    // No stale plan was cached by the failed request.
    assert!(!h.service.execute_plan().await);
}

#[tokio::test]
async fn test_single_waypoint_path_degenerates_to_point_plan() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(6, 0.1)]);
    let h = harness(backend, 1);

    assert!(h.service.plan_to_path(&[some_pose()]).await);

    let calls = &h.log.lock().unwrap().calls;
    assert!(calls.contains(&"set_pose_goal".to_string()));
    assert!(calls.contains(&"plan".to_string()));
    assert!(!calls.contains(&"compute_cartesian_path".to_string()));
}

#[tokio::test]
async fn test_empty_path_is_malformed() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let h = harness(ScriptedBackend::new(log), 1);

    assert!(!h.service.plan_to_path(&[]).await);
    assert!(h.log.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn test_partial_cartesian_path_is_still_success() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_cartesian(
        log.clone(),
        vec![CartesianPlan {
            trajectory: trajectory_of(12, 0.1),
            fraction: 0.6,
        }],
    );
    let h = harness(backend, 1);

    assert!(h.service.plan_to_path(&[some_pose(), some_pose()]).await);
    assert!(h.service.execute_plan().await);
}

#[tokio::test]
async fn test_fraction_reported_exactly() {
    // At the component level the achieved fraction must come through
    // unrounded in the outcome metadata.
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let mut backend = ScriptedBackend::with_cartesian(
        log,
        vec![CartesianPlan {
            trajectory: trajectory_of(12, 0.1),
            fraction: 0.6,
        }],
    );

    let builder = CartesianPathBuilder::new(0.01, 1.2);
    let outcome = builder
        .plan_through(&mut backend, &[some_pose(), some_pose()])
        .await
        .unwrap();

    match outcome {
        PlanOutcome::Success { metadata, .. } => {
            assert_eq!(metadata.fraction, Some(0.6));
            assert_eq!(metadata.waypoint_count, 12);
        }
        PlanOutcome::Failure { .. } => panic!("Expected a successful outcome"),
    }
}

#[tokio::test]
async fn test_random_path_spans_requested_waypoints() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::new(log.clone());
    let h = harness(backend, 1);

    assert!(h.service.plan_random_path(3).await);

    let log = h.log.lock().unwrap();
    assert_eq!(log.cartesian_requests.len(), 1);
    let requested = &log.cartesian_requests[0];
    assert_eq!(requested.len(), 3);

    // Only the positional components were sampled; the orientation of the
    // reference pose is held fixed across all waypoints.
    for (i, pose) in requested.iter().enumerate() {
        assert_eq!(pose.orientation, ScriptedBackend::reference_orientation());
        assert_eq!(pose.position.x, (i + 1) as f64);
    }
    drop(log);

    // The cache holds one merged trajectory for the whole path.
    assert!(h.service.visualize_plan().await);
    assert_eq!(h.displayed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_positive_waypoint_count_rejected() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let h = harness(ScriptedBackend::new(log), 1);

    assert!(!h.service.plan_random_path(0).await);
    assert!(!h.service.plan_random_path(-2).await);
    assert!(h.log.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn test_random_joint_goal_is_planned_like_any_other() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let backend = ScriptedBackend::with_plans(log.clone(), vec![trajectory_of(7, 0.1)]);
    let h = harness(backend, 1);

    assert!(h.service.plan_random_joint().await);

    let calls = &h.log.lock().unwrap().calls;
    assert!(calls.contains(&"random_joint_values".to_string()));
    assert!(calls.contains(&"set_joint_goal".to_string()));
}

#[tokio::test]
async fn test_visualize_without_plan_fails() {
    let log = Arc::new(Mutex::new(BackendLog::default()));
    let h = harness(ScriptedBackend::new(log), 1);

    assert!(!h.service.visualize_plan().await);
    assert!(h.displayed.lock().unwrap().is_empty());
}
