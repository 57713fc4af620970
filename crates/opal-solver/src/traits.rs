//! The trait every LP backend implements.

use crate::{OptimizationResult, SolverConfig, SolverError};
use opal_core::Program;

/// A backend that minimizes a flat linear program.
///
/// `minimize` is blocking, synchronous, and a pure function of its input
/// program: solving the same program twice yields the same result within
/// the backend's numerical tolerance. The modeling layer never inspects
/// backend internals beyond this contract.
pub trait LinearOptimizer {
    /// Minimize the program's objective subject to its rows and bounds.
    ///
    /// # Errors
    ///
    /// Returns an error for unbounded programs and backend failures.
    /// Infeasibility is NOT an error: it is reported as
    /// [`OptimizationResult::Infeasible`].
    fn minimize(
        &mut self,
        program: &Program,
        config: &SolverConfig,
    ) -> Result<OptimizationResult, SolverError>;
}
