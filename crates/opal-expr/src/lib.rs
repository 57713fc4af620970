pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, ExprError, LinearExpr};
pub use ids::{ConstraintId, RawVarId, VarId};
