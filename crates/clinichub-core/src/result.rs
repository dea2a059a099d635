//! Convenience result type alias for ClinicHub.

use crate::error::AppError;

/// A specialized `Result` type for ClinicHub operations.
pub type AppResult<T> = Result<T, AppError>;
