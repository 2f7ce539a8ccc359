// Core infrastructure modules
pub mod document_store;        // Document store interface, filters and updates
pub mod id_generator;          // ID generation system
pub mod memory_store;          // In-memory backend
pub mod sqlite_store;          // SQLite backend

// Re-export core infrastructure components
pub use document_store::{
    from_document, populate, to_document, Collection, DeleteResult, Document, DocumentStore,
    Filter, Update, UpdateResult, ID_FIELD,
};
pub use id_generator::{DocId, IdGenerator};
pub use memory_store::MemoryDocumentStore;
pub use sqlite_store::SqliteDocumentStore;
