use crate::common::{DomainError, DomainResult};
use crate::domains::motion::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No cached plan.
    Idle,
    /// A plan is cached and may be executed or visualized.
    PlanReady,
    /// The cached plan has been dispatched and execution has not finished.
    Executing,
}

/// Single-slot cache of the most recently planned trajectory.
///
/// Invariant: `current_plan` is Some exactly when the state is not `Idle`.
/// The session exclusively owns the cached trajectory; `begin_execution`
/// hands out a clone so a later plan request can never corrupt a trajectory
/// mid-execution.
#[derive(Debug)]
pub struct PlanningSession {
    state: SessionState,
    current_plan: Option<Trajectory>,
}

impl PlanningSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            current_plan: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_plan(&self) -> Option<&Trajectory> {
        self.current_plan.as_ref()
    }

    /// Cache a freshly planned trajectory, overwriting any previous one.
    /// Rejected while an execution is in flight.
    pub fn store_plan(&mut self, trajectory: Trajectory) -> DomainResult<()> {
        if self.state == SessionState::Executing {
            return Err(DomainError::ExecutionInProgress);
        }
        self.current_plan = Some(trajectory);
        self.state = SessionState::PlanReady;
        Ok(())
    }

    /// Drop the cached plan after a failed planning attempt.
    pub fn clear_plan(&mut self) -> DomainResult<()> {
        if self.state == SessionState::Executing {
            return Err(DomainError::ExecutionInProgress);
        }
        self.current_plan = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Transition to `Executing` and return a copy of the cached trajectory
    /// for dispatch.
    pub fn begin_execution(&mut self) -> DomainResult<Trajectory> {
        match self.state {
            SessionState::Idle => Err(DomainError::NoPlanAvailable),
            SessionState::Executing => Err(DomainError::ExecutionInProgress),
            SessionState::PlanReady => {
                // Invariant: PlanReady implies a cached plan.
                let plan = self
                    .current_plan
                    .clone()
                    .ok_or(DomainError::NoPlanAvailable)?;
                self.state = SessionState::Executing;
                Ok(plan)
            }
        }
    }

    /// Execution finished. The cache is retained so repeated execute calls
    /// replay the same trajectory until a new plan overwrites it.
    pub fn finish_execution(&mut self) {
        if self.state == SessionState::Executing {
            self.state = SessionState::PlanReady;
        }
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new()
    }
}
