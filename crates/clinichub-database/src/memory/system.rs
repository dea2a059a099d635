use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use clinichub_core::error::AppError;
use clinichub_core::result::AppResult;

use crate::store::SystemStore;

/// In-memory [`SystemStore`]. Reachability can be toggled for tests.
#[derive(Debug)]
pub struct MemorySystemStore {
    available: AtomicBool,
}

impl Default for MemorySystemStore {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }
}

impl MemorySystemStore {
    /// Simulate the backend going away or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl SystemStore for MemorySystemStore {
    async fn ping(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::service_unavailable("In-memory store marked unavailable"))
        }
    }

    async fn size_bytes(&self) -> AppResult<u64> {
        Ok(0)
    }

    async fn optimize(&self) -> AppResult<Vec<String>> {
        Ok(vec!["In-memory store needs no optimization".to_string()])
    }
}
