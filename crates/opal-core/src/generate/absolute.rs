//! Absolute-value decomposition.
//!
//! Splits an expression `E` into `signed = positive_part - negative_part`
//! and `absolute_value = positive_part + negative_part`, tied to `E` by an
//! equality constraint. The decomposition is exact at the optimum of any
//! objective that is non-decreasing in the absolute value: minimization
//! always drives at least one of the two parts to zero. It is NOT exact
//! under maximization, where the parts can both inflate.

use crate::error::ModelError;
use crate::generate::{ensure_finite_expr, Generated, PendingConstraint};
use crate::pool::VariablePool;
use crate::types::Bounds;
use crate::vars::{AbsRole, HighLevelVar};
use opal_expr::ids::VarId;
use opal_expr::LinearExpr;

/// Allocation strategy for the positive/negative parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbsPolicy {
    /// Always allocate both parts as fresh non-negative columns,
    /// regardless of what is known about the expression's sign.
    AlwaysAllocate,
    /// Use a declared range for the expression to fold a sign-definite
    /// part to the constant zero, and a single-point range to constants
    /// throughout. Purely a declutter optimization: solved values are
    /// identical to `AlwaysAllocate`.
    FoldSignDefinite(Bounds),
}

/// The four variables of one absolute-value decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteValueVars {
    pub signed: VarId,
    pub positive_part: VarId,
    pub negative_part: VarId,
    pub absolute_value: VarId,
}

/// Decompose `expr` into signed/positive/negative/absolute-value variables.
pub fn generate_absolute_value(
    pool: &mut VariablePool,
    name: &str,
    expr: LinearExpr,
    policy: AbsPolicy,
) -> Result<Generated<AbsoluteValueVars>, ModelError> {
    ensure_finite_expr(&expr)?;
    pool.ensure_expr_registered(&expr)?;

    if let AbsPolicy::FoldSignDefinite(range) = policy {
        if !range.is_valid() {
            return Err(ModelError::InvalidRange {
                lower: range.lower,
                upper: range.upper,
            });
        }
        if range.is_point() {
            return generate_constant(pool, name, range.lower);
        }
        if range.is_non_negative() {
            return generate_one_sided(pool, name, expr, false);
        }
        if range.is_non_positive() {
            return generate_one_sided(pool, name, expr, true);
        }
        // Sign-indefinite range: nothing to fold.
    }

    let positive_part =
        pool.add_constrained_raw_variable(format!("{name}:pos"), Bounds::non_negative())?;
    let negative_part =
        pool.add_constrained_raw_variable(format!("{name}:neg"), Bounds::non_negative())?;
    let signed_expr = LinearExpr::var(positive_part).sub(&LinearExpr::var(negative_part));
    let signed = pool.add_super_var(
        format!("{name}:signed"),
        HighLevelVar::AbsComponent {
            role: AbsRole::Signed,
            expr: signed_expr,
        },
    )?;
    let abs_expr = LinearExpr::var(positive_part).add(&LinearExpr::var(negative_part));
    let absolute_value = pool.add_super_var(
        format!("{name}:abs"),
        HighLevelVar::AbsComponent {
            role: AbsRole::AbsoluteValue,
            expr: abs_expr,
        },
    )?;

    Ok(Generated {
        vars: AbsoluteValueVars {
            signed,
            positive_part,
            negative_part,
            absolute_value,
        },
        constraints: vec![tie(name, signed, &expr)],
        objective_terms: Vec::new(),
    })
}

/// One part is known to be zero; allocate a single column for the other.
fn generate_one_sided(
    pool: &mut VariablePool,
    name: &str,
    expr: LinearExpr,
    negative: bool,
) -> Result<Generated<AbsoluteValueVars>, ModelError> {
    let (live_suffix, zero_suffix, zero_role) = if negative {
        ("neg", "pos", AbsRole::PositivePart)
    } else {
        ("pos", "neg", AbsRole::NegativePart)
    };

    let live = pool.add_constrained_raw_variable(
        format!("{name}:{live_suffix}"),
        Bounds::non_negative(),
    )?;
    let zero = pool.add_super_var(
        format!("{name}:{zero_suffix}"),
        HighLevelVar::AbsComponent {
            role: zero_role,
            expr: LinearExpr::from_constant(0.0),
        },
    )?;
    let signed_expr = if negative {
        -LinearExpr::var(live)
    } else {
        LinearExpr::var(live)
    };
    let signed = pool.add_super_var(
        format!("{name}:signed"),
        HighLevelVar::AbsComponent {
            role: AbsRole::Signed,
            expr: signed_expr,
        },
    )?;
    let absolute_value = pool.add_super_var(
        format!("{name}:abs"),
        HighLevelVar::AbsComponent {
            role: AbsRole::AbsoluteValue,
            expr: LinearExpr::var(live),
        },
    )?;

    let (positive_part, negative_part) = if negative { (zero, live) } else { (live, zero) };

    Ok(Generated {
        vars: AbsoluteValueVars {
            signed,
            positive_part,
            negative_part,
            absolute_value,
        },
        constraints: vec![tie(name, signed, &expr)],
        objective_terms: Vec::new(),
    })
}

/// The expression is fixed; everything folds to constants and no columns
/// or constraints are emitted at all.
fn generate_constant(
    pool: &mut VariablePool,
    name: &str,
    value: f64,
) -> Result<Generated<AbsoluteValueVars>, ModelError> {
    let component = |role: AbsRole, v: f64| HighLevelVar::AbsComponent {
        role,
        expr: LinearExpr::from_constant(v),
    };
    let positive_part = pool.add_super_var(
        format!("{name}:pos"),
        component(AbsRole::PositivePart, value.max(0.0)),
    )?;
    let negative_part = pool.add_super_var(
        format!("{name}:neg"),
        component(AbsRole::NegativePart, (-value).max(0.0)),
    )?;
    let signed = pool.add_super_var(format!("{name}:signed"), component(AbsRole::Signed, value))?;
    let absolute_value = pool.add_super_var(
        format!("{name}:abs"),
        component(AbsRole::AbsoluteValue, value.abs()),
    )?;

    Ok(Generated::plain(AbsoluteValueVars {
        signed,
        positive_part,
        negative_part,
        absolute_value,
    }))
}

fn tie(name: &str, signed: VarId, expr: &LinearExpr) -> PendingConstraint {
    PendingConstraint::new(
        format!("{name}:tie"),
        LinearExpr::var(signed).eq_expr(expr),
    )
}
