use crate::common::DomainResult;
use crate::domains::motion::{Trajectory, TrajectoryDisplay};
use tracing::{debug, info};

/// Display sink that renders a planned trajectory into the service log.
pub struct ConsoleTrajectoryDisplay;

impl TrajectoryDisplay for ConsoleTrajectoryDisplay {
    fn display(&self, trajectory: &Trajectory) -> DomainResult<()> {
        info!(
            waypoints = trajectory.len(),
            duration_s = trajectory.duration(),
            "displaying planned trajectory"
        );
        for (i, waypoint) in trajectory.waypoints.iter().enumerate() {
            debug!(
                "  {:>3}. t={:>6.2}s {:?}",
                i + 1,
                waypoint.time_from_start,
                waypoint.positions.angles()
            );
        }
        Ok(())
    }
}
