//! Admin web API for pressdigest.
//!
//! Serves the task settings form, wiki browsing, manual send and on-demand
//! digest runs as JSON endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
