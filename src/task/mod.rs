//! Saved digest tasks and the credentials they publish with.

pub mod credentials;
pub mod store;
pub mod types;

pub use credentials::{CredentialStore, UserCredential};
pub use store::{validate_task_name, TaskStore};
pub use types::TaskSetting;
