use crate::common::{DomainError, DomainResult};
use crate::domains::motion::ports::PlanningBackend;
use crate::domains::motion::trajectory::{PlanMetadata, PlanOutcome};
use crate::domains::motion::types::Pose;
use tracing::{debug, info};

/// Turns an ordered sequence of pose waypoints into one interpolated
/// trajectory via the backend's Cartesian interpolator.
pub struct CartesianPathBuilder {
    eef_step: f64,
    jump_threshold: f64,
}

impl CartesianPathBuilder {
    pub fn new(eef_step: f64, jump_threshold: f64) -> Self {
        Self {
            eef_step,
            jump_threshold,
        }
    }

    /// Request a single trajectory through `waypoints` in order.
    ///
    /// A partial path (achieved fraction < 1.0) is still a success as long
    /// as the trajectory is viable; the fraction is carried in the metadata
    /// exactly as the backend reported it.
    pub async fn plan_through(
        &self,
        backend: &mut dyn PlanningBackend,
        waypoints: &[Pose],
    ) -> DomainResult<PlanOutcome> {
        if waypoints.is_empty() {
            return Err(DomainError::MalformedRequest {
                reason: "cartesian path requires at least one waypoint".to_string(),
            });
        }

        let plan = backend
            .compute_cartesian_path(waypoints, self.eef_step, self.jump_threshold)
            .await?;
        debug!(
            requested = waypoints.len(),
            interpolated = plan.trajectory.len(),
            "cartesian interpolation finished"
        );

        if plan.trajectory.is_viable() {
            info!(
                "{:.1}% of the requested path can be executed",
                plan.fraction * 100.0
            );
            Ok(PlanOutcome::Success {
                metadata: PlanMetadata {
                    trials: 1,
                    waypoint_count: plan.trajectory.len(),
                    fraction: Some(plan.fraction),
                },
                trajectory: plan.trajectory,
            })
        } else {
            Ok(PlanOutcome::no_plan_found())
        }
    }
}
