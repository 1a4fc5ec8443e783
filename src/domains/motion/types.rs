use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Degrees of freedom of the manipulator arm.
pub const ARM_DOF: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Unit quaternion describing an end-effector orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position3D,
    pub orientation: Orientation,
}

/// Joint configuration of the arm. The length is a hard invariant:
/// construction fails for anything other than 7 values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointVector([f64; ARM_DOF]);

impl JointVector {
    pub fn new(angles: [f64; ARM_DOF]) -> Self {
        Self(angles)
    }

    pub fn from_slice(values: &[f64]) -> DomainResult<Self> {
        if values.len() != ARM_DOF {
            return Err(DomainError::MalformedRequest {
                reason: format!(
                    "joint target must have {} values, got {}",
                    ARM_DOF,
                    values.len()
                ),
            });
        }
        let mut angles = [0.0; ARM_DOF];
        angles.copy_from_slice(values);
        Ok(Self(angles))
    }

    pub fn zeros() -> Self {
        Self([0.0; ARM_DOF])
    }

    pub fn angles(&self) -> &[f64; ARM_DOF] {
        &self.0
    }
}

/// One timestamped joint configuration within a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub positions: JointVector,
    /// Seconds from trajectory start.
    pub time_from_start: f64,
}

impl Waypoint {
    pub fn new(positions: JointVector, time_from_start: f64) -> Self {
        Self {
            positions,
            time_from_start,
        }
    }
}
