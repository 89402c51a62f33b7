//! Result enum for analytics entry points that can fail outright (as opposed
//! to simply returning `None`/`null` at individual indices).

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum AnalyticsError {
    #[error("fewer than {required} observations (have {have})")]
    InsufficientData { required: usize, have: usize },

    #[error("design matrix has zero variance")]
    SingularDesign,

    #[error("underlying numerical solve unavailable (singular or ill-conditioned design)")]
    DependencyUnavailable,
}
