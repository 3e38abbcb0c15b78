//! In-memory backend.
//!
//! Implements every collaborator contract without a network so the whole
//! client can run in tests and in the demo binary. Each piece supports
//! failure injection.

mod auth;
mod database;
mod storage;

pub use auth::MemoryAuth;
pub use database::{DbOp, MemoryDatabase};
pub use storage::MemoryStorage;

use std::sync::Arc;

/// The three in-memory collaborators, created together.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    pub database: Arc<MemoryDatabase>,
    pub storage: Arc<MemoryStorage>,
    pub auth: Arc<MemoryAuth>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}
