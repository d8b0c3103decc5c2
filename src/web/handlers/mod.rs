//! API handlers for the admin API.

pub mod digest;
pub mod task;
pub mod wiki;

use crate::pipeline::DigestPipeline;
use crate::publish::DoorayClient;
use crate::task::TaskStore;
use std::sync::Arc;

pub use digest::*;
pub use task::*;
pub use wiki::*;

/// Shared state for every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Digest pipeline used for runs, previews and manual sends.
    pub pipeline: Arc<DigestPipeline>,
    /// Saved task settings.
    pub store: TaskStore,
    /// Wiki client used to browse wikis and pages.
    pub dooray: DoorayClient,
}

impl AppState {
    /// Create a new application state.
    pub fn new(pipeline: Arc<DigestPipeline>, store: TaskStore, dooray: DoorayClient) -> Self {
        Self {
            pipeline,
            store,
            dooray,
        }
    }
}
