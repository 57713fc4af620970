//! Solver configuration types.

/// Configuration options for solver behavior.
///
/// Backends honor what they support and log a warning for the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Feasibility tolerance. `None` uses the solver default.
    pub tolerance: Option<f64>,
    /// Verbosity level. `None` uses the solver default.
    pub verbosity: Option<u32>,
    /// Log solver output to console. `None` uses the solver default.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the feasibility tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    /// Set the verbosity level.
    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.tolerance.is_none()
            && self.verbosity.is_none()
            && self.log_to_console.is_none()
    }
}
