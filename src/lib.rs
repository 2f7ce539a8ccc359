// Tuiter - social graph CRUD service over a document store

// Document store, identifiers and storage backends
pub mod infrastructure;

// Document shapes for each collection
pub mod models;

// One thin service per store
pub mod services;

// HTTP layer
pub mod routes;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
