use super::types::Waypoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered sequence of timestamped joint configurations produced by a
/// successful plan. Insertion order is execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub waypoints: Vec<Waypoint>,
    pub created_at: DateTime<Utc>,
}

impl Trajectory {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Backend convention: a trajectory with at most one waypoint means no
    /// motion was found and must be treated as a planning failure.
    pub fn is_viable(&self) -> bool {
        self.waypoints.len() > 1
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.waypoints
            .last()
            .map(|w| w.time_from_start)
            .unwrap_or(0.0)
    }
}

/// Raw backend reply for a Cartesian path request: the interpolated
/// trajectory plus the fraction of the requested path actually covered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartesianPlan {
    pub trajectory: Trajectory,
    pub fraction: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMetadata {
    /// Number of planning attempts that produced this result.
    pub trials: u32,
    pub waypoint_count: usize,
    /// Achieved fraction of a Cartesian path, 0.0-1.0. None for point goals.
    pub fraction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanOutcome {
    Success {
        trajectory: Trajectory,
        metadata: PlanMetadata,
    },
    Failure {
        reason: String,
    },
}

impl PlanOutcome {
    pub fn no_plan_found() -> Self {
        PlanOutcome::Failure {
            reason: "no plan found".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PlanOutcome::Success { .. })
    }
}
