use crate::common::{ApplicationResult, DomainError, DomainResult};
use crate::config::PlanningConfig;
use crate::domains::motion::{
    random, CartesianPathBuilder, JointVector, MultiTrialPlanner, PlanMetadata, PlanOutcome,
    PlanningBackend, PlanningSession, Pose, TrajectoryDisplay,
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Motion-planning orchestration service.
///
/// Maps each external request kind to the corresponding internal operation
/// and normalizes every result to a boolean at the boundary; richer failure
/// detail is logged, not returned. All state sits behind a single mutex so
/// exactly one request is in flight at a time: the backend and the session
/// cache are shared mutable resources that are not safe for concurrent use.
pub struct MotionService {
    planner_id: String,
    inner: Mutex<ServiceInner>,
}

struct ServiceInner {
    backend: Box<dyn PlanningBackend>,
    display: Box<dyn TrajectoryDisplay>,
    session: PlanningSession,
    trials: MultiTrialPlanner,
    cartesian: CartesianPathBuilder,
}

impl MotionService {
    pub fn new(
        backend: Box<dyn PlanningBackend>,
        display: Box<dyn TrajectoryDisplay>,
        config: &PlanningConfig,
    ) -> Self {
        Self {
            planner_id: config.planner_id.clone(),
            inner: Mutex::new(ServiceInner {
                backend,
                display,
                session: PlanningSession::new(),
                trials: MultiTrialPlanner::new(config.point_n_step),
                cartesian: CartesianPathBuilder::new(config.eef_step, config.jump_threshold),
            }),
        }
    }

    /// Probe the backend and select the configured planner. A failure here
    /// is fatal: the service must not serve requests against a partially
    /// initialized backend.
    pub async fn initialize(&self) -> ApplicationResult<()> {
        let mut inner = self.inner.lock().await;
        inner.backend.ready().await?;
        inner.backend.select_planner(&self.planner_id).await?;
        info!(planner_id = %self.planner_id, "planning backend ready");
        Ok(())
    }

    pub async fn plan_to_joint(&self, target: &[f64]) -> bool {
        let request_id = Uuid::new_v4();
        let joints = match JointVector::from_slice(target) {
            Ok(joints) => joints,
            Err(e) => {
                warn!(%request_id, error = %e, "rejected joint goal");
                return false;
            }
        };

        info!(%request_id, target = ?joints.angles(), "planning to joint goal");
        let mut inner = self.inner.lock().await;
        report(request_id, inner.plan_to_joint_goal(&joints).await)
    }

    pub async fn plan_to_point(&self, target: Pose) -> bool {
        let request_id = Uuid::new_v4();
        info!(%request_id, ?target, "planning to pose goal");
        let mut inner = self.inner.lock().await;
        report(request_id, inner.plan_to_pose_goal(&target).await)
    }

    pub async fn plan_to_path(&self, waypoints: &[Pose]) -> bool {
        let request_id = Uuid::new_v4();
        info!(%request_id, waypoints = waypoints.len(), "planning cartesian path");
        let mut inner = self.inner.lock().await;
        let outcome = match waypoints {
            [] => Err(DomainError::MalformedRequest {
                reason: "cartesian path requires at least one waypoint".to_string(),
            }),
            // A single waypoint degenerates to a direct point-to-point plan.
            [only] => inner.plan_to_pose_goal(only).await,
            _ => inner.plan_cartesian(waypoints).await,
        };
        report(request_id, outcome)
    }

    pub async fn plan_random_pose(&self) -> bool {
        let request_id = Uuid::new_v4();
        info!(%request_id, "planning to random pose goal");
        let mut inner = self.inner.lock().await;
        report(request_id, inner.plan_to_random_pose().await)
    }

    pub async fn plan_random_joint(&self) -> bool {
        let request_id = Uuid::new_v4();
        info!(%request_id, "planning to random joint goal");
        let mut inner = self.inner.lock().await;
        report(request_id, inner.plan_to_random_joints().await)
    }

    pub async fn plan_random_path(&self, n_waypoints: i32) -> bool {
        let request_id = Uuid::new_v4();
        if n_waypoints <= 0 {
            warn!(%request_id, n_waypoints, "rejected random path request");
            return false;
        }

        info!(%request_id, n_waypoints, "planning random cartesian path");
        let mut inner = self.inner.lock().await;
        report(
            request_id,
            inner.plan_random_cartesian(n_waypoints as usize).await,
        )
    }

    /// Dispatch the cached trajectory for execution. The cache is retained
    /// afterwards, so repeated calls replay the same trajectory.
    pub async fn execute_plan(&self) -> bool {
        let request_id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        match inner.execute_current().await {
            Ok(true) => {
                info!(%request_id, "plan execution was successful");
                true
            }
            Ok(false) => {
                warn!(%request_id, "plan execution was unsuccessful");
                false
            }
            Err(DomainError::NoPlanAvailable) => {
                warn!(%request_id, "no plan available for execution");
                false
            }
            Err(e) => {
                error!(%request_id, error = %e, "plan execution failed");
                false
            }
        }
    }

    /// Send the cached trajectory to the display sink. Read-only.
    pub async fn visualize_plan(&self) -> bool {
        let request_id = Uuid::new_v4();
        let inner = self.inner.lock().await;
        match inner.visualize_current() {
            Ok(()) => true,
            Err(DomainError::NoPlanAvailable) => {
                warn!(%request_id, "no plan available, run a planning service first");
                false
            }
            Err(e) => {
                error!(%request_id, error = %e, "visualization failed");
                false
            }
        }
    }
}

impl ServiceInner {
    async fn plan_to_joint_goal(&mut self, target: &JointVector) -> DomainResult<PlanOutcome> {
        let outcome = self.trials.plan_to_joints(&mut *self.backend, target).await?;
        self.commit(outcome)
    }

    async fn plan_to_pose_goal(&mut self, target: &Pose) -> DomainResult<PlanOutcome> {
        let outcome = self.trials.plan_to_pose(&mut *self.backend, target).await?;
        self.commit(outcome)
    }

    async fn plan_cartesian(&mut self, waypoints: &[Pose]) -> DomainResult<PlanOutcome> {
        let outcome = self
            .cartesian
            .plan_through(&mut *self.backend, waypoints)
            .await?;
        self.commit(outcome)
    }

    async fn plan_to_random_pose(&mut self) -> DomainResult<PlanOutcome> {
        let goal = random::random_pose_goal(&mut *self.backend).await?;
        self.plan_to_pose_goal(&goal).await
    }

    async fn plan_to_random_joints(&mut self) -> DomainResult<PlanOutcome> {
        let goal = random::random_joint_goal(&mut *self.backend).await?;
        self.plan_to_joint_goal(&goal).await
    }

    async fn plan_random_cartesian(&mut self, n_waypoints: usize) -> DomainResult<PlanOutcome> {
        let goals = random::random_path_goals(&mut *self.backend, n_waypoints).await?;
        self.plan_cartesian(&goals).await
    }

    /// Apply a planning outcome to the session: cache on success, clear on
    /// failure. The outcome is passed back for reporting.
    fn commit(&mut self, outcome: PlanOutcome) -> DomainResult<PlanOutcome> {
        match &outcome {
            PlanOutcome::Success { trajectory, .. } => {
                self.session.store_plan(trajectory.clone())?
            }
            PlanOutcome::Failure { .. } => self.session.clear_plan()?,
        }
        Ok(outcome)
    }

    async fn execute_current(&mut self) -> DomainResult<bool> {
        let trajectory = self.session.begin_execution()?;
        let result = self.backend.execute(&trajectory).await;
        // Leave the Executing state even if the backend errored.
        self.session.finish_execution();
        result
    }

    fn visualize_current(&self) -> DomainResult<()> {
        match self.session.current_plan() {
            Some(trajectory) => self.display.display(trajectory),
            None => Err(DomainError::NoPlanAvailable),
        }
    }
}

fn report(request_id: Uuid, outcome: DomainResult<PlanOutcome>) -> bool {
    match outcome {
        Ok(PlanOutcome::Success { metadata, .. }) => {
            log_success(request_id, &metadata);
            true
        }
        Ok(PlanOutcome::Failure { reason }) => {
            warn!(%request_id, %reason, "no plan found");
            false
        }
        Err(e) => {
            error!(%request_id, error = %e, "planning request failed");
            false
        }
    }
}

fn log_success(request_id: Uuid, metadata: &PlanMetadata) {
    match metadata.fraction {
        Some(fraction) => info!(
            %request_id,
            waypoints = metadata.waypoint_count,
            fraction,
            "plan found"
        ),
        None => info!(
            %request_id,
            waypoints = metadata.waypoint_count,
            trials = metadata.trials,
            "plan found"
        ),
    }
}
