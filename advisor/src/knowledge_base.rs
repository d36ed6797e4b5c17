use std::path::Path;

use crate::document_loader::load_pdf;
use crate::embedding_service::EmbeddingService;
use crate::error::{IndexBuildError, InitError};
use crate::models::PageRecord;
use crate::vector_index::VectorIndex;

/// Process-wide retrieval state: the page collection plus its vector index.
/// Built once at startup by a single fallible step and shared read-only for
/// the process lifetime, so concurrent turns need no locking.
pub struct KnowledgeBase {
    pages: Vec<PageRecord>,
    index: Option<VectorIndex>,
}

impl KnowledgeBase {
    /// Load the PDF, embed every page, build the index.
    pub async fn build(
        path: impl AsRef<Path>,
        embedder: &EmbeddingService,
    ) -> Result<Self, InitError> {
        let pages = load_pdf(path)?;
        Self::from_pages(pages, embedder).await
    }

    pub async fn from_pages(
        pages: Vec<PageRecord>,
        embedder: &EmbeddingService,
    ) -> Result<Self, InitError> {
        if pages.is_empty() {
            return Err(IndexBuildError::Empty.into());
        }

        let texts: Vec<String> = pages.iter().map(|page| page.content.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        let index = VectorIndex::build(embeddings)?;

        log::info!("Vector index built over {} pages", pages.len());

        Ok(Self {
            pages,
            index: Some(index),
        })
    }

    /// A knowledge base holding no documents. Retrieval against it returns
    /// the fixed fallback notice instead of searching.
    pub fn empty() -> Self {
        Self {
            pages: Vec::new(),
            index: None,
        }
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
