use thiserror::Error;

/// Errors raised by cost-code master data operations.
#[derive(Error, Debug)]
pub enum CostCodeError {
    #[error("Division '{0}' not found")]
    DivisionNotFound(String),

    #[error("Cost code '{0}' not found")]
    CostCodeNotFound(String),

    #[error("GL account '{0}' not found")]
    GlAccountNotFound(String),

    #[error("Division '{division_id}' is referenced by {count} cost code(s)")]
    DivisionInUse { division_id: String, count: usize },

    #[error("Cost code '{cost_code_id}' has {count} child cost code(s)")]
    HasChildren { cost_code_id: String, count: usize },

    #[error("Invalid cost code hierarchy: {0}")]
    InvalidHierarchy(String),
}
