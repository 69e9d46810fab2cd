//! Document I/O for conversions

use crate::constants::PRINTABLE_EXTENSION;
use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};

/// Load a PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save the converted document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, PrintableError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Output path for `input`: same directory, `<stem>.printable.pdf`
pub fn printable_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension(PRINTABLE_EXTENSION)
}
