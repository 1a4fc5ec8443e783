//! Random goal generation.
//!
//! Sampling is delegated entirely to the kinematic model behind the backend;
//! these helpers only wire the sampled values into the planners as if they
//! were externally supplied goals.

use crate::common::DomainResult;
use crate::domains::motion::ports::PlanningBackend;
use crate::domains::motion::types::{JointVector, Pose};

pub async fn random_pose_goal(backend: &mut dyn PlanningBackend) -> DomainResult<Pose> {
    backend.random_pose().await
}

pub async fn random_joint_goal(backend: &mut dyn PlanningBackend) -> DomainResult<JointVector> {
    backend.random_joint_values().await
}

/// Sample `n_waypoints` poses for a randomized Cartesian path. Only the
/// positional components are perturbed; the orientation of the current pose
/// is held fixed across all samples.
pub async fn random_path_goals(
    backend: &mut dyn PlanningBackend,
    n_waypoints: usize,
) -> DomainResult<Vec<Pose>> {
    let reference = backend.current_pose().await?;

    let mut goals = Vec::with_capacity(n_waypoints);
    for _ in 0..n_waypoints {
        let sampled = backend.random_pose().await?;
        let mut goal = reference;
        goal.position = sampled.position;
        goals.push(goal);
    }
    Ok(goals)
}
