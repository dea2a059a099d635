//! Patient records, their documents and advanced search.

pub mod search;
pub mod service;

pub use search::{AdvancedSearchRequest, SearchResult, SearchService};
pub use service::PatientService;
