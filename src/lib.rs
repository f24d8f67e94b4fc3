// TaskStore - Client-side task state synchronized with a REST backend

pub mod client;
pub mod config;
pub mod filter;
pub mod http;
pub mod models;
pub mod record;
pub mod store;

// Re-export main types for convenience
pub use client::RestClient;
pub use config::Config;
pub use filter::Filter;
pub use http::{HttpClient, HttpError};
pub use models::{Task, TaskDraft, TaskId, TaskPatch};
pub use record::{TaskRecord, normalize};
pub use store::{StoreSnapshot, TaskStore};
