//! Patient document uploads.

pub mod service;

pub use service::{DocumentService, DocumentUpload, UploadedFile};
