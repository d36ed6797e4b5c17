pub mod chat_service;
pub mod config;
pub mod document_loader;
pub mod embedding_service;
pub mod error;
pub mod generation_service;
pub mod knowledge_base;
pub mod models;
pub mod retriever;
pub mod vector_index;

pub use chat_service::{assemble_messages, ChatService, CONTEXT_PREFIX, SYSTEM_PROMPT};
pub use config::Settings;
pub use document_loader::load_pdf;
pub use embedding_service::EmbeddingService;
pub use error::*;
pub use generation_service::{GenerationService, MAX_COMPLETION_TOKENS};
pub use knowledge_base::KnowledgeBase;
pub use models::*;
pub use retriever::{Retriever, DEFAULT_TOP_K, NO_CONTEXT_FALLBACK};
pub use vector_index::VectorIndex;
