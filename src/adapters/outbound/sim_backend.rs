//! Simulated kinematic backend.
//!
//! Stands in for a real planning stack so the service can run a full
//! plan/execute cycle without hardware. Inverse kinematics is faked by
//! sampling a joint solution within the arm's limits and interpolating
//! towards it in joint space.

use crate::common::{DomainError, DomainResult};
use crate::domains::motion::{
    CartesianPlan, JointVector, PlanningBackend, Pose, Position3D, Orientation, Trajectory,
    Waypoint, ARM_DOF,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Per-joint limits in radians, matching a 7-DOF research arm.
static JOINT_LIMITS: Lazy<[(f64, f64); ARM_DOF]> = Lazy::new(|| {
    [
        (-2.8973, 2.8973),
        (-1.7628, 1.7628),
        (-2.8973, 2.8973),
        (-3.0718, -0.0698),
        (-2.8973, 2.8973),
        (-0.0175, 3.7525),
        (-2.8973, 2.8973),
    ]
});

/// Largest joint move covered by one interpolation step, in radians.
const STEP_RAD: f64 = 0.2;
/// Seconds between consecutive waypoints.
const STEP_DT: f64 = 0.1;

enum PendingGoal {
    Joints(JointVector),
    Pose(Pose),
}

pub struct SimKinematicBackend {
    rng: StdRng,
    current_joints: JointVector,
    pending_goal: Option<PendingGoal>,
    planner_id: Option<String>,
}

impl SimKinematicBackend {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            current_joints: JointVector::zeros(),
            pending_goal: None,
            planner_id: None,
        }
    }

    pub fn current_joints(&self) -> &JointVector {
        &self.current_joints
    }

    pub fn planner_id(&self) -> Option<&str> {
        self.planner_id.as_deref()
    }

    fn sample_joints(&mut self) -> JointVector {
        let mut angles = [0.0; ARM_DOF];
        for (angle, (lo, hi)) in angles.iter_mut().zip(JOINT_LIMITS.iter()) {
            *angle = self.rng.gen_range(*lo..*hi);
        }
        JointVector::new(angles)
    }

    /// Fake inverse kinematics: any pose resolves to some sampled joint
    /// solution within the limits.
    fn solve_pose(&mut self, _target: &Pose) -> JointVector {
        self.sample_joints()
    }

    /// Linear joint-space interpolation from `from` to `to`, appending onto
    /// `waypoints` starting at time `t0`. Returns the timestamp of the last
    /// appended waypoint.
    fn interpolate(
        from: &JointVector,
        to: &JointVector,
        t0: f64,
        waypoints: &mut Vec<Waypoint>,
    ) -> f64 {
        let max_delta = from
            .angles()
            .iter()
            .zip(to.angles().iter())
            .map(|(a, b)| (b - a).abs())
            .fold(0.0, f64::max);
        let steps = (max_delta / STEP_RAD).ceil() as usize;

        let mut t = t0;
        for step in 1..=steps {
            t += STEP_DT;
            // The last step lands exactly on the goal.
            if step == steps {
                waypoints.push(Waypoint::new(to.clone(), t));
                break;
            }
            let progress = step as f64 / steps as f64;
            let mut angles = [0.0; ARM_DOF];
            for (i, angle) in angles.iter_mut().enumerate() {
                let a = from.angles()[i];
                let b = to.angles()[i];
                *angle = a + progress * (b - a);
            }
            waypoints.push(Waypoint::new(JointVector::new(angles), t));
        }
        t
    }

    fn plan_to(&mut self, goal: &JointVector) -> Trajectory {
        let mut waypoints = vec![Waypoint::new(self.current_joints.clone(), 0.0)];
        Self::interpolate(&self.current_joints, goal, 0.0, &mut waypoints);
        Trajectory::new(waypoints)
    }

    /// Pseudo forward kinematics, good enough for a reference pose.
    fn forward_pose(&self) -> Pose {
        let j = self.current_joints.angles();
        Pose {
            position: Position3D {
                x: 0.4 * j[0].cos() + 0.3 * (j[1] + j[3]).cos(),
                y: 0.4 * j[0].sin() + 0.3 * (j[1] + j[3]).sin(),
                z: 0.6 + 0.3 * j[1].cos(),
            },
            orientation: Orientation::identity(),
        }
    }
}

impl Default for SimKinematicBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanningBackend for SimKinematicBackend {
    async fn ready(&mut self) -> DomainResult<()> {
        Ok(())
    }

    async fn select_planner(&mut self, planner_id: &str) -> DomainResult<()> {
        debug!(planner_id, "simulated backend selected planner");
        self.planner_id = Some(planner_id.to_string());
        Ok(())
    }

    async fn set_joint_goal(&mut self, target: &JointVector) -> DomainResult<()> {
        self.pending_goal = Some(PendingGoal::Joints(target.clone()));
        Ok(())
    }

    async fn set_pose_goal(&mut self, target: &Pose) -> DomainResult<()> {
        self.pending_goal = Some(PendingGoal::Pose(*target));
        Ok(())
    }

    async fn clear_pose_goals(&mut self) -> DomainResult<()> {
        self.pending_goal = None;
        Ok(())
    }

    async fn plan(&mut self) -> DomainResult<Trajectory> {
        let goal = match &self.pending_goal {
            Some(PendingGoal::Joints(joints)) => joints.clone(),
            Some(PendingGoal::Pose(pose)) => {
                let pose = *pose;
                self.solve_pose(&pose)
            }
            None => {
                return Err(DomainError::Backend(
                    "no goal set before plan".to_string(),
                ))
            }
        };
        Ok(self.plan_to(&goal))
    }

    async fn compute_cartesian_path(
        &mut self,
        waypoints: &[Pose],
        _eef_step: f64,
        _jump_threshold: f64,
    ) -> DomainResult<CartesianPlan> {
        let mut points = vec![Waypoint::new(self.current_joints.clone(), 0.0)];
        let mut from = self.current_joints.clone();
        let mut t = 0.0;
        for pose in waypoints {
            let solution = self.solve_pose(pose);
            t = Self::interpolate(&from, &solution, t, &mut points);
            from = solution;
        }
        Ok(CartesianPlan {
            trajectory: Trajectory::new(points),
            fraction: 1.0,
        })
    }

    async fn execute(&mut self, trajectory: &Trajectory) -> DomainResult<bool> {
        match trajectory.waypoints.last() {
            Some(last) => {
                self.current_joints = last.positions.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn random_pose(&mut self) -> DomainResult<Pose> {
        Ok(Pose {
            position: Position3D {
                x: self.rng.gen_range(-0.8..0.8),
                y: self.rng.gen_range(-0.8..0.8),
                z: self.rng.gen_range(0.05..1.2),
            },
            orientation: Orientation::identity(),
        })
    }

    async fn random_joint_values(&mut self) -> DomainResult<JointVector> {
        Ok(self.sample_joints())
    }

    async fn current_pose(&mut self) -> DomainResult<Pose> {
        Ok(self.forward_pose())
    }
}
