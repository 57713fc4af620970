//! Epigraph min/max variables.
//!
//! `generate_max` creates a fresh variable `m` with `m >= left` and
//! `m >= right` (reversed for `generate_min`). One-sided constraints only
//! pin `m` to the true max/min when the objective pushes it tight; the
//! artificial-term policy lets the generator supply that pressure itself
//! when nothing else in the objective references `m`.
//!
//! The artificial term is a nudge, not a guarantee: it reliably tightens
//! values the objective is otherwise indifferent to, but it cannot win
//! against real objective cost pulling the other way.

use crate::error::ModelError;
use crate::generate::{ensure_finite_expr, Generated, PendingConstraint};
use crate::pool::VariablePool;
use crate::types::ObjectiveTerm;
use crate::vars::MinMaxKind;
use opal_expr::ids::VarId;
use opal_expr::LinearExpr;

/// Whether the generator adds its own objective pressure on the variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtificialTermPolicy {
    /// The surrounding objective already forces the variable tight
    /// (e.g. the max variable is itself minimized).
    None,
    /// Add a small weighted objective term pushing the variable toward
    /// tightness, with the given positive weight.
    Weighted(f64),
}

/// Variable bounding two expressions from above: `m >= left, m >= right`.
pub fn generate_max(
    pool: &mut VariablePool,
    name: &str,
    left: LinearExpr,
    right: LinearExpr,
    policy: ArtificialTermPolicy,
) -> Result<Generated<VarId>, ModelError> {
    generate(pool, name, MinMaxKind::Max, left, right, policy)
}

/// Variable bounding two expressions from below: `m <= left, m <= right`.
pub fn generate_min(
    pool: &mut VariablePool,
    name: &str,
    left: LinearExpr,
    right: LinearExpr,
    policy: ArtificialTermPolicy,
) -> Result<Generated<VarId>, ModelError> {
    generate(pool, name, MinMaxKind::Min, left, right, policy)
}

fn generate(
    pool: &mut VariablePool,
    name: &str,
    kind: MinMaxKind,
    left: LinearExpr,
    right: LinearExpr,
    policy: ArtificialTermPolicy,
) -> Result<Generated<VarId>, ModelError> {
    ensure_finite_expr(&left)?;
    ensure_finite_expr(&right)?;
    pool.ensure_expr_registered(&left)?;
    pool.ensure_expr_registered(&right)?;
    if let ArtificialTermPolicy::Weighted(weight) = policy {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ModelError::InvalidWeight { weight });
        }
    }

    let m = pool.add_minmax_variable(name, kind);
    let m_expr = LinearExpr::var(m);

    let (against_left, against_right) = match kind {
        MinMaxKind::Max => (m_expr.ge_expr(&left), m_expr.ge_expr(&right)),
        MinMaxKind::Min => (m_expr.le_expr(&left), m_expr.le_expr(&right)),
    };
    let constraints = vec![
        PendingConstraint::new(format!("{name}:left"), against_left),
        PendingConstraint::new(format!("{name}:right"), against_right),
    ];

    // Minimizing +w*m squeezes a max variable down onto the larger
    // argument; -w*m squeezes a min variable up onto the smaller one.
    let objective_terms = match policy {
        ArtificialTermPolicy::None => Vec::new(),
        ArtificialTermPolicy::Weighted(weight) => {
            let signed = match kind {
                MinMaxKind::Max => weight,
                MinMaxKind::Min => -weight,
            };
            vec![ObjectiveTerm {
                var: m,
                weight: signed,
            }]
        }
    };

    tracing::trace!(
        component = "generate",
        operation = "min_max",
        status = "success",
        kind = kind.as_str(),
        name = %name,
        artificial = !objective_terms.is_empty(),
        "Generated epigraph variable"
    );

    Ok(Generated {
        vars: m,
        constraints,
        objective_terms,
    })
}
