//! Core type definitions used across the ClinicHub workspace.

pub mod pagination;
pub mod response;
pub mod sorting;

pub use pagination::{Page, PageRequest};
pub use response::ApiErrorResponse;
pub use sorting::{SortDirection, SortField};
