//! Super-variable generators.
//!
//! Each generator allocates its variables in the pool, then hands back the
//! constraints and artificial objective terms it needs as an explicit
//! [`Generated`] value. Nothing is appended to the program behind the
//! caller's back; `ProgramBuilder::register` is the single place where
//! generator output enters the program.
//!
//! - `absolute`  — signed/positive/negative/absolute-value decomposition
//! - `minmax`    — epigraph min/max variables
//! - `partition` — geometric sub-interval partitions
//! - `approx`    — piecewise-linear function approximation

pub mod absolute;
pub mod approx;
pub mod minmax;
pub mod partition;

use crate::error::ModelError;
use crate::types::ObjectiveTerm;
use opal_expr::{ConstraintExpr, LinearExpr};

pub use absolute::{generate_absolute_value, AbsPolicy, AbsoluteValueVars};
pub use approx::{
    generate_linear_approximation, ApproximatedFunction, ApproximationTarget,
    LinearApproximationVars,
};
pub use minmax::{generate_max, generate_min, ArtificialTermPolicy};
pub use partition::{geometric_partition, PartitionSpec};

/// A labeled constraint awaiting registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConstraint {
    pub label: String,
    pub constraint: ConstraintExpr,
}

impl PendingConstraint {
    pub fn new(label: impl Into<String>, constraint: ConstraintExpr) -> Self {
        Self {
            label: label.into(),
            constraint,
        }
    }
}

/// Output of a generator: the variables it built, plus the constraints and
/// artificial objective terms the caller must register for them to mean
/// anything.
#[derive(Debug, Clone)]
pub struct Generated<T> {
    pub vars: T,
    pub constraints: Vec<PendingConstraint>,
    pub objective_terms: Vec<ObjectiveTerm>,
}

impl<T> Generated<T> {
    /// Output with no attached constraints or objective terms.
    pub fn plain(vars: T) -> Self {
        Self {
            vars,
            constraints: Vec::new(),
            objective_terms: Vec::new(),
        }
    }
}

pub(crate) fn ensure_finite_expr(expr: &LinearExpr) -> Result<(), ModelError> {
    for (_, coeff) in expr.terms() {
        if !coeff.is_finite() {
            return Err(ModelError::NonFiniteValue { value: *coeff });
        }
    }
    if !expr.constant().is_finite() {
        return Err(ModelError::NonFiniteValue {
            value: expr.constant(),
        });
    }
    Ok(())
}
