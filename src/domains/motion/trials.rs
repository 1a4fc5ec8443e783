use crate::common::DomainResult;
use crate::domains::motion::ports::PlanningBackend;
use crate::domains::motion::trajectory::{PlanMetadata, PlanOutcome, Trajectory};
use crate::domains::motion::types::{JointVector, Pose};
use tracing::debug;

/// Best-of-N planner for single point goals.
///
/// The waypoint count of each candidate trajectory is used as a cheap proxy
/// for plan simplicity: the viable candidate with the fewest waypoints wins,
/// ties broken by the first trial that produced the minimum.
pub struct MultiTrialPlanner {
    attempts: u32,
}

impl MultiTrialPlanner {
    /// `attempts` must be positive; config validation enforces this before
    /// the planner is constructed.
    pub fn new(attempts: u32) -> Self {
        Self { attempts }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `attempts` sequential trials against a pose goal and keep the
    /// best viable trajectory. Pose targets are cleared before returning,
    /// whether the trials succeeded, found nothing, or errored.
    pub async fn plan_to_pose(
        &self,
        backend: &mut dyn PlanningBackend,
        target: &Pose,
    ) -> DomainResult<PlanOutcome> {
        backend.set_pose_goal(target).await?;

        let trials_result = self.run_trials(backend).await;
        let clear_result = backend.clear_pose_goals().await;
        let best = trials_result?;
        clear_result?;

        match best {
            Some(trajectory) => {
                debug!(waypoints = trajectory.len(), "chosen plan");
                Ok(PlanOutcome::Success {
                    metadata: PlanMetadata {
                        trials: self.attempts,
                        waypoint_count: trajectory.len(),
                        fraction: None,
                    },
                    trajectory,
                })
            }
            None => Ok(PlanOutcome::no_plan_found()),
        }
    }

    async fn run_trials(
        &self,
        backend: &mut dyn PlanningBackend,
    ) -> DomainResult<Option<Trajectory>> {
        let mut best: Option<Trajectory> = None;
        for trial in 0..self.attempts {
            let candidate = backend.plan().await?;
            debug!(trial, waypoints = candidate.len(), "planning trial finished");
            if !candidate.is_viable() {
                continue;
            }
            // Strict comparison keeps the first occurrence of the minimum.
            let better = best.as_ref().map_or(true, |b| candidate.len() < b.len());
            if better {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    /// Plan to a joint-space goal. Joint goals are deterministic enough for
    /// the backend that a single attempt is made.
    pub async fn plan_to_joints(
        &self,
        backend: &mut dyn PlanningBackend,
        target: &JointVector,
    ) -> DomainResult<PlanOutcome> {
        backend.set_joint_goal(target).await?;
        let trajectory = backend.plan().await?;
        debug!(waypoints = trajectory.len(), "joint goal plan finished");

        if trajectory.is_viable() {
            Ok(PlanOutcome::Success {
                metadata: PlanMetadata {
                    trials: 1,
                    waypoint_count: trajectory.len(),
                    fraction: None,
                },
                trajectory,
            })
        } else {
            Ok(PlanOutcome::no_plan_found())
        }
    }
}
