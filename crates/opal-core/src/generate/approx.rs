//! Piecewise-linear approximation of a scalar function.
//!
//! Each sub-interval of a partitioned domain gets one segment column
//! bounded to the interval width. The linear part reconstructs the domain
//! value as `lo + sum(segments)`; the approximated part applies each
//! segment's secant slope, so it is exact at every breakpoint and linearly
//! interpolated in between.
//!
//! The encoding assumes segments fill in domain order: a later segment is
//! never used while an earlier one has room left. That holds whenever the
//! function is convex and the program minimizes something non-decreasing
//! in the approximated value (earlier segments have smaller slopes, so
//! they are always the cheaper choice). It is not guaranteed when several
//! independently approximated variables are coupled through a shared
//! constraint.

use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::generate::partition::{geometric_partition, PartitionSpec};
use crate::generate::{Generated, PendingConstraint};
use crate::pool::VariablePool;
use crate::types::Bounds;
use crate::vars::HighLevelVar;
use opal_expr::ids::VarId;
use opal_expr::LinearExpr;

/// The scalar function being approximated.
#[derive(Clone)]
pub enum ApproximatedFunction {
    /// x^2, the common case.
    Square,
    /// Any scalar function of the domain value.
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl ApproximatedFunction {
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        ApproximatedFunction::Custom(Arc::new(f))
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            ApproximatedFunction::Square => x * x,
            ApproximatedFunction::Custom(f) => f(x),
        }
    }
}

impl fmt::Debug for ApproximatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproximatedFunction::Square => f.write_str("Square"),
            ApproximatedFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Whether the generator owns the domain variable or ties to an existing one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApproximationTarget {
    /// The linear part itself is the domain variable; no extra constraint
    /// is needed since it is the segment sum by construction.
    NewVariable,
    /// Tie an already-registered variable to the segment sum with an
    /// explicit equality constraint.
    ExistingVariable(VarId),
}

/// The variables of one piecewise-linear approximation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearApproximationVars {
    /// Reconstruction of the domain value: `lo + sum(segments)`.
    pub linear_part: VarId,
    /// Reconstruction of `f(domain value)` via secant slopes.
    pub approximated_part: VarId,
    /// Per-segment variables, in domain order.
    pub segments: Vec<VarId>,
}

/// Approximate `function` over `range` with a geometrically partitioned
/// piecewise-linear encoding.
pub fn generate_linear_approximation(
    pool: &mut VariablePool,
    name: &str,
    range: Bounds,
    function: &ApproximatedFunction,
    partition: &PartitionSpec,
    target: ApproximationTarget,
) -> Result<Generated<LinearApproximationVars>, ModelError> {
    let intervals = geometric_partition(range, partition)?;
    if let ApproximationTarget::ExistingVariable(existing) = target {
        pool.get(existing)?;
    }

    let value_at = |x: f64| -> Result<f64, ModelError> {
        let value = function.eval(x);
        if !value.is_finite() {
            return Err(ModelError::NonFiniteValue { value });
        }
        Ok(value)
    };

    let mut segments = Vec::with_capacity(intervals.len());
    let mut linear_terms = Vec::with_capacity(intervals.len());
    let mut approx_terms = Vec::with_capacity(intervals.len());
    let mut f_lower = value_at(range.lower)?;
    let f_start = f_lower;
    for (index, interval) in intervals.iter().enumerate() {
        let f_upper = value_at(interval.upper)?;
        let slope = (f_upper - f_lower) / interval.width();
        if !slope.is_finite() {
            return Err(ModelError::NonFiniteValue { value: slope });
        }

        let segment = pool.add_segment_variable(format!("{name}:seg{index}"), *interval);
        linear_terms.push((segment, 1.0));
        approx_terms.push((segment, slope));
        segments.push(segment);
        f_lower = f_upper;
    }

    let linear_expr = LinearExpr::new(linear_terms, range.lower);
    let linear_part = pool.add_super_var(
        format!("{name}:linear"),
        HighLevelVar::General {
            expr: linear_expr.clone(),
        },
    )?;
    let approximated_part = pool.add_super_var(
        format!("{name}:approx"),
        HighLevelVar::General {
            expr: LinearExpr::new(approx_terms, f_start),
        },
    )?;

    let constraints = match target {
        ApproximationTarget::NewVariable => Vec::new(),
        ApproximationTarget::ExistingVariable(existing) => vec![PendingConstraint::new(
            format!("{name}:tie"),
            LinearExpr::var(existing).eq_expr(&linear_expr),
        )],
    };

    tracing::debug!(
        component = "generate",
        operation = "linear_approximation",
        status = "success",
        name = %name,
        segments = segments.len(),
        lower = range.lower,
        upper = range.upper,
        "Generated piecewise-linear approximation"
    );

    Ok(Generated {
        vars: LinearApproximationVars {
            linear_part,
            approximated_part,
            segments,
        },
        constraints,
        objective_terms: Vec::new(),
    })
}
