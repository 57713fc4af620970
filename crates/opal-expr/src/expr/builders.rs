//! Builder functions for constructing linear expressions.

use crate::expr::core::LinearExpr;
use crate::expr::error::ExprError;
use crate::ids::VarId;

/// Build a validated weighted sum over variables.
///
/// Rejects non-finite coefficients up front so that invalid data fails at
/// construction time rather than inside a later build or solve.
pub fn weighted_sum(terms: Vec<(VarId, f64)>) -> Result<LinearExpr, ExprError> {
    for (_, coeff) in &terms {
        if !coeff.is_finite() {
            return Err(ExprError::NonFiniteCoefficient {
                coefficient: *coeff,
            });
        }
    }
    Ok(LinearExpr::new(terms, 0.0))
}

/// Combine multiple expressions into one, merging shared variables.
pub fn sum(exprs: Vec<LinearExpr>) -> LinearExpr {
    let mut combined = LinearExpr::empty();
    for expr in &exprs {
        combined = combined.add(expr);
    }
    combined
}
