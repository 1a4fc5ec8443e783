use crate::common::DomainResult;
use crate::domains::motion::trajectory::{CartesianPlan, Trajectory};
use crate::domains::motion::types::{JointVector, Pose};
use async_trait::async_trait;

/// Port trait for the external kinematic planning backend (hexagonal port).
/// The backend owns the robot model, the obstacle scene and the execution
/// controller; this crate only orchestrates it.
///
/// Implementations are not assumed to be thread-safe. The orchestration
/// layer serializes every call behind a single lock, so goal-setting
/// followed by `plan` is never interleaved with another request.
#[async_trait]
pub trait PlanningBackend: Send {
    /// Startup probe. The service refuses to start if this fails.
    async fn ready(&mut self) -> DomainResult<()>;

    /// Select the planning algorithm variant by identifier.
    async fn select_planner(&mut self, planner_id: &str) -> DomainResult<()>;

    async fn set_joint_goal(&mut self, target: &JointVector) -> DomainResult<()>;

    async fn set_pose_goal(&mut self, target: &Pose) -> DomainResult<()>;

    async fn clear_pose_goals(&mut self) -> DomainResult<()>;

    /// Run one planning attempt against the currently set goal. "No solution"
    /// is signalled by a trajectory with at most one waypoint, never an error.
    async fn plan(&mut self) -> DomainResult<Trajectory>;

    /// Interpolate a single trajectory through the given poses in order.
    async fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        eef_step: f64,
        jump_threshold: f64,
    ) -> DomainResult<CartesianPlan>;

    /// Dispatch a trajectory to the execution controller, blocking until it
    /// finishes. Returns the controller's success flag.
    async fn execute(&mut self, trajectory: &Trajectory) -> DomainResult<bool>;

    /// Sample a reachable pose within the kinematic model's valid ranges.
    async fn random_pose(&mut self) -> DomainResult<Pose>;

    /// Sample a joint configuration within the per-joint limits.
    async fn random_joint_values(&mut self) -> DomainResult<JointVector>;

    async fn current_pose(&mut self) -> DomainResult<Pose>;
}

/// Port for visualization sinks that accept a planned trajectory.
pub trait TrajectoryDisplay: Send {
    fn display(&self, trajectory: &Trajectory) -> DomainResult<()>;
}
