//! microlp solver implementation.

use std::time::Instant;

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use opal_core::{ComparisonSense, Program};
use opal_solver::{LinearOptimizer, OptimizationResult, Solution, SolverConfig, SolverError};
use opal_tools::MemorySnapshot;
use tracing::{debug, trace, warn};

use crate::status::error_status;

/// LP backend over the pure-Rust `microlp` simplex solver.
///
/// Holds no state between solves; each call maps the program onto a fresh
/// `microlp::Problem`, so solving the same program twice is a pure
/// re-computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpOptimizer;

impl MicrolpOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl LinearOptimizer for MicrolpOptimizer {
    fn minimize(
        &mut self,
        program: &Program,
        config: &SolverConfig,
    ) -> Result<OptimizationResult, SolverError> {
        solve_program(program, config)
    }
}

/// microlp exposes no tuning knobs; requested options are logged and skipped.
fn warn_unsupported_options(config: &SolverConfig) {
    if config.is_empty() {
        return;
    }
    for (option, requested) in [
        ("time_limit", config.time_limit.is_some()),
        ("tolerance", config.tolerance.is_some()),
        ("verbosity", config.verbosity.is_some()),
        ("log_to_console", config.log_to_console.is_some()),
    ] {
        if requested {
            warn!(
                component = "solver",
                operation = "configure",
                status = "warn",
                solver = "microlp",
                option,
                "Option is not supported by microlp; ignoring"
            );
        }
    }
}

fn comparison_op(sense: ComparisonSense) -> ComparisonOp {
    match sense {
        ComparisonSense::LessEqual => ComparisonOp::Le,
        ComparisonSense::GreaterEqual => ComparisonOp::Ge,
        ComparisonSense::Equal => ComparisonOp::Eq,
    }
}

fn solve_program(
    program: &Program,
    config: &SolverConfig,
) -> Result<OptimizationResult, SolverError> {
    warn_unsupported_options(config);

    let rss_before = capture_rss("solve_start");
    let started = Instant::now();
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "microlp",
        label = %program.label(),
        columns = program.num_raw_variables(),
        rows = program.num_rows(),
        rss_bytes = ?rss_before,
        "Starting solve"
    );

    let mut objective = vec![0.0; program.num_raw_variables()];
    for (raw, coeff) in program.objective_terms() {
        objective[raw.inner() as usize] = *coeff;
    }

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let mut columns: Vec<Variable> = Vec::with_capacity(program.num_raw_variables());
    for (index, bounds) in program.raw_bounds().iter().enumerate() {
        let column = problem.add_var(objective[index], (bounds.lower, bounds.upper));
        trace!(
            component = "solver",
            operation = "add_variable",
            status = "success",
            column = index,
            lower = bounds.lower,
            upper = bounds.upper,
            objective_coefficient = objective[index],
            "Added column"
        );
        columns.push(column);
    }

    for row in program.rows() {
        let terms: Vec<(Variable, f64)> = row
            .terms()
            .iter()
            .map(|(raw, coeff)| (columns[raw.inner() as usize], *coeff))
            .collect();
        problem.add_constraint(terms, comparison_op(row.sense()), row.rhs());
        trace!(
            component = "solver",
            operation = "add_row",
            status = "success",
            label = row.label(),
            sense = row.sense().as_str(),
            rhs = row.rhs(),
            coefficients = row.terms().len(),
            "Added row"
        );
    }

    let outcome = problem.solve();
    let solve_seconds = started.elapsed().as_secs_f64();
    let rss_after = capture_rss("solve_end");
    let rss_delta = match (rss_before, rss_after) {
        (Some(before), Some(after)) => Some(after as i64 - before as i64),
        _ => None,
    };

    match outcome {
        Ok(solved) => {
            let primal_values: Vec<f64> = columns.iter().map(|column| solved[*column]).collect();
            let objective_value = solved.objective() + program.objective_constant();
            debug!(
                component = "solver",
                operation = "solve",
                status = "success",
                solver = "microlp",
                label = %program.label(),
                objective_value,
                duration_ms = solve_seconds * 1000.0,
                rss_bytes = ?rss_after,
                rss_delta_bytes = ?rss_delta,
                "Solve completed"
            );
            Ok(OptimizationResult::Feasible(Solution {
                primal_values,
                objective_value,
                solve_time_seconds: solve_seconds,
            }))
        }
        Err(microlp::Error::Infeasible) => {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = "microlp",
                label = %program.label(),
                duration_ms = solve_seconds * 1000.0,
                "Program is infeasible"
            );
            Ok(OptimizationResult::Infeasible)
        }
        Err(microlp::Error::InternalError(message)) => {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = "microlp",
                label = %program.label(),
                message = %message,
                "Solver internal error"
            );
            Err(SolverError::InternalError(message))
        }
        Err(err) => {
            warn!(
                component = "solver",
                operation = "solve",
                status = "warn",
                solver = "microlp",
                label = %program.label(),
                solver_status = error_status(&err).as_str(),
                "Solver did not produce a solution"
            );
            Err(SolverError::SolveFailure {
                status: error_status(&err),
            })
        }
    }
}

fn capture_rss(stage: &str) -> Option<u64> {
    MemorySnapshot::capture(stage)
        .ok()
        .map(|snapshot| snapshot.rss_bytes)
}
