pub mod backend;
pub mod memory_backend;
pub mod query_cache;

pub use backend::CatalogBackend;
pub use memory_backend::InMemoryBackend;
pub use query_cache::QueryCache;
