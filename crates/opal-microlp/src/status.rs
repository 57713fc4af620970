//! Mapping from microlp outcomes to solver-agnostic statuses.

use opal_solver::SolverStatus;

/// Status corresponding to a microlp solve error.
pub fn error_status(err: &microlp::Error) -> SolverStatus {
    match err {
        microlp::Error::Infeasible => SolverStatus::Infeasible,
        microlp::Error::Unbounded => SolverStatus::Unbounded,
        microlp::Error::InternalError(_) => SolverStatus::Unknown,
    }
}
