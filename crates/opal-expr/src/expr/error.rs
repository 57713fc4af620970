//! Expression construction errors.

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    NonFiniteCoefficient { coefficient: f64 },
    NonFiniteConstant { constant: f64 },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE_COEFFICIENT",
            ExprError::NonFiniteConstant { .. } => "EXPR_NON_FINITE_CONSTANT",
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::NonFiniteCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
            ExprError::NonFiniteConstant { constant } => write!(
                f,
                "[{}] Constant must be finite (got {})",
                self.code(),
                constant
            ),
        }
    }
}

impl std::error::Error for ExprError {}
