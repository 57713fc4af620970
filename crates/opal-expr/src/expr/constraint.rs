//! Constraint expressions: linear expression with comparison sense and RHS.

use crate::expr::core::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    expr: LinearExpr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: LinearExpr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (LinearExpr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{ComparisonSense, ConstraintExpr};
    use crate::VarId;
    use crate::expr::LinearExpr;

    #[test]
    fn constraint_expr_exposes_parts() {
        let expr = LinearExpr::term(VarId::new(1), 1.0);
        let constraint = ConstraintExpr::new(expr.clone(), ComparisonSense::LessEqual, 10.0);

        assert_eq!(constraint.sense(), ComparisonSense::LessEqual);
        assert_eq!(constraint.rhs(), 10.0);
        assert_eq!(constraint.expr().terms().len(), 1);

        let (inner, sense, rhs) = constraint.into_parts();
        assert_eq!(sense, ComparisonSense::LessEqual);
        assert_eq!(rhs, 10.0);
        assert_eq!(inner.terms().len(), 1);
    }

    #[test]
    fn sense_strings_are_stable() {
        assert_eq!(ComparisonSense::LessEqual.as_str(), "le");
        assert_eq!(ComparisonSense::GreaterEqual.as_str(), "ge");
        assert_eq!(ComparisonSense::Equal.as_str(), "eq");
    }
}
