//! Core expression type: weighted variable terms plus a constant.
//!
//! Terms are merged on every construction path: a variable appears at most
//! once, zero coefficients are dropped, and terms are ordered by ascending
//! variable id. Downstream code (flattening, evaluation) relies on this.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VarId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    constant: f64,
    terms: Vec<(VarId, f64)>,
}

fn merge_terms(terms: Vec<(VarId, f64)>) -> Vec<(VarId, f64)> {
    let mut merged: BTreeMap<VarId, f64> = BTreeMap::new();
    for (var_id, coeff) in terms {
        if coeff == 0.0 {
            continue;
        }
        *merged.entry(var_id).or_insert(0.0) += coeff;
    }
    merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
}

impl LinearExpr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (constant zero, no terms).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expression from terms and a constant. Duplicate variables are merged.
    pub fn new(terms: Vec<(VarId, f64)>, constant: f64) -> Self {
        Self {
            constant,
            terms: merge_terms(terms),
        }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single term: coeff * var.
    pub fn term(var_id: VarId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            terms: vec![(var_id, coeff)],
            ..Default::default()
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VarId) -> Self {
        Self {
            terms: vec![(var_id, 1.0)],
            ..Default::default()
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Consume and return (terms, constant).
    pub fn into_parts(self) -> (Vec<(VarId, f64)>, f64) {
        (self.terms, self.constant)
    }

    /// True when the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when every coefficient and the constant are finite.
    pub fn is_finite(&self) -> bool {
        self.constant.is_finite() && self.terms.iter().all(|(_, c)| c.is_finite())
    }

    // ── Operations ──────────────────────────────────────────

    /// Scale all terms and the constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            terms: merge_terms(self.terms.iter().map(|(v, c)| (*v, *c * by)).collect()),
        }
    }

    /// Add another expression, merging shared variables.
    pub fn add(&self, other: &LinearExpr) -> Self {
        let mut terms = Vec::with_capacity(self.terms.len() + other.terms.len());
        terms.extend_from_slice(&self.terms);
        terms.extend_from_slice(&other.terms);
        Self {
            constant: self.constant + other.constant,
            terms: merge_terms(terms),
        }
    }

    /// Subtract another expression.
    pub fn sub(&self, other: &LinearExpr) -> Self {
        self.add(&other.scale(-1.0))
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            terms: self.terms.clone(),
        }
    }

    /// Copy with the constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            terms: self.terms.clone(),
        }
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    pub fn compare_expr(&self, other: &LinearExpr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.sub(other);
        ConstraintExpr::new(combined.without_constant(), sense, -combined.constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for LinearExpr {
    type Output = LinearExpr;

    fn add(self, rhs: LinearExpr) -> Self::Output {
        LinearExpr::add(&self, &rhs)
    }
}

impl std::ops::Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> Self::Output {
        LinearExpr::sub(&self, &rhs)
    }
}

impl std::ops::Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}
