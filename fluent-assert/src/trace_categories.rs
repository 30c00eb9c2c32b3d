//! Trace utilities

/// Trace category for reported assertion failures.
pub const ASSERTIONS: &str = "assertions";
/// Trace category for the comparison engine.
pub const COMPARE: &str = "compare";
/// Trace category for configuration loading.
pub const CONFIG: &str = "config";
