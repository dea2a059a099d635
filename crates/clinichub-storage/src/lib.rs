//! # clinichub-storage
//!
//! Binary storage for uploaded patient documents and backup archives.
//! Metadata lives in the database; this crate only moves bytes.

pub mod local;
pub mod naming;

use async_trait::async_trait;
use bytes::Bytes;

use clinichub_core::result::AppResult;

pub use local::LocalFileStore;

/// A flat namespace of stored files.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug {
    /// Write a whole buffer under `name`; returns the byte count. A failed
    /// write leaves nothing behind.
    async fn write(&self, name: &str, data: Bytes) -> AppResult<u64>;

    async fn read_bytes(&self, name: &str) -> AppResult<Bytes>;

    async fn exists(&self, name: &str) -> AppResult<bool>;

    async fn delete(&self, name: &str) -> AppResult<()>;

    /// Location of `name` as reported to operators.
    fn display_path(&self, name: &str) -> String;
}
