use std::path::Path;

use pdf_extract::extract_text_by_pages;

use crate::error::DocumentLoadError;
use crate::models::PageRecord;

/// Extract one plain-text record per page of the PDF at `path`, in document
/// order, tagged with 1-based page numbers. Layout and formatting are
/// discarded.
pub fn load_pdf(path: impl AsRef<Path>) -> Result<Vec<PageRecord>, DocumentLoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DocumentLoadError::NotFound(path.to_path_buf()));
    }

    log::info!("Loading policy document: {}", path.display());

    let pages = extract_text_by_pages(path).map_err(|source| DocumentLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<PageRecord> = pages
        .into_iter()
        .enumerate()
        .map(|(i, content)| PageRecord {
            page_number: i + 1,
            content,
        })
        .collect();

    log::info!("Extracted {} pages", records.len());
    Ok(records)
}
