//! Solver error types.

use crate::SolverStatus;

/// Error type for solver operations.
///
/// Infeasibility is NOT an error at the trait boundary — it is a
/// first-class [`crate::OptimizationResult`] arm. `SolveFailure` with an
/// infeasible status only appears when a caller tries to extract a
/// solution from an infeasible outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to produce a usable solution.
    SolveFailure {
        /// The solver status that caused the failure.
        status: SolverStatus,
    },
    /// Internal solver error.
    InternalError(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                _ => "SOLVER_FAILURE",
            },
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] {}", self.code(), status_message(*status))
            }
            SolverError::InternalError(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
        }
    }
}

fn status_message(status: SolverStatus) -> &'static str {
    match status {
        SolverStatus::Infeasible => "Problem is infeasible",
        SolverStatus::Unbounded => "Problem is unbounded",
        SolverStatus::Unknown => "Solver status unknown",
        SolverStatus::Optimal => "Solver returned optimal",
    }
}

impl std::error::Error for SolverError {}
