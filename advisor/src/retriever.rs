use std::sync::Arc;

use crate::embedding_service::EmbeddingService;
use crate::error::RetrievalError;
use crate::knowledge_base::KnowledgeBase;

/// Number of pages injected as context per turn.
pub const DEFAULT_TOP_K: usize = 3;

/// Returned when the knowledge base holds no documents.
pub const NO_CONTEXT_FALLBACK: &str = "No relevant security policy information found.";

pub struct Retriever {
    embedder: Arc<EmbeddingService>,
    knowledge_base: Arc<KnowledgeBase>,
}

impl Retriever {
    pub fn new(embedder: Arc<EmbeddingService>, knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self {
            embedder,
            knowledge_base,
        }
    }

    /// The contents of the top-`k` pages nearest to `query`, in ascending
    /// distance order. An empty knowledge base short-circuits to the fixed
    /// fallback without touching the embedding service.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        let Some(index) = self.knowledge_base.index() else {
            return Ok(vec![NO_CONTEXT_FALLBACK.to_string()]);
        };

        let query_embedding = self.embedder.embed_query(query).await?;
        let hits = index.search(&query_embedding, k)?;

        let pages = self.knowledge_base.pages();
        log::info!("Retrieved {} pages for query", hits.len());

        Ok(hits
            .into_iter()
            .map(|(id, _)| pages[id].content.clone())
            .collect())
    }
}
