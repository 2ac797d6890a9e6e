//! Application services: embedding, retrieval policy, answering and the
//! [`RagService`] facade.

pub mod answerer;
pub mod embedding_service;
pub mod rag_service;
pub mod retriever;

pub use answerer::Answerer;
pub use embedding_service::Embedder;
pub use rag_service::RagService;
