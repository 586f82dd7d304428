//! The host session: which document is open, and how it is backed up.

use std::path::PathBuf;

use anyhow::Context;

use crate::document::Document;
use crate::foundation::error::{KaleidoError, KaleidoResult};

/// Host session holding at most one active document.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    /// The document edits apply to.
    pub active: Option<Document>,
}

impl Workspace {
    /// A workspace with `doc` open.
    pub fn with_document(doc: Document) -> Self {
        Self { active: Some(doc) }
    }

    /// The active document.
    pub fn document(&self) -> KaleidoResult<&Document> {
        self.active
            .as_ref()
            .ok_or_else(|| KaleidoError::precondition("no document open"))
    }

    /// The active document, mutably.
    pub fn document_mut(&mut self) -> KaleidoResult<&mut Document> {
        self.active
            .as_mut()
            .ok_or_else(|| KaleidoError::precondition("no document open"))
    }

    /// Hand the active document to `sink`.
    ///
    /// Takes `&mut self` so a snapshot can never interleave with a run on the same workspace.
    pub fn snapshot(&mut self, sink: &mut dyn BackupSink) -> KaleidoResult<()> {
        let doc = self.document()?;
        sink.snapshot(doc)
    }
}

/// Receives document snapshots. Scheduling is the caller's concern.
pub trait BackupSink {
    /// Persist the current state of `doc`.
    fn snapshot(&mut self, doc: &Document) -> KaleidoResult<()>;
}

/// Writes the flattened document to `<dir>/<name>/<name>_autosave.png`, overwriting each time.
#[derive(Clone, Debug)]
pub struct PngBackup {
    dir: PathBuf,
}

impl PngBackup {
    /// Back up under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where a document named `doc_name` is written.
    pub fn path_for(&self, doc_name: &str) -> PathBuf {
        let stem = sanitize_name(doc_name);
        self.dir.join(&stem).join(format!("{stem}_autosave.png"))
    }
}

impl BackupSink for PngBackup {
    fn snapshot(&mut self, doc: &Document) -> KaleidoResult<()> {
        let path = self.path_for(doc.name());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create backup dir '{}'", parent.display()))?;
        }
        let img = doc.flatten()?.to_rgba_image()?;
        img.save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write backup '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "backup written");
        Ok(())
    }
}

/// File-system safe stem of a document name: extension dropped, reserved characters replaced.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let stem = match replaced.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => replaced.as_str(),
    };
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
#[path = "../tests/unit/workspace.rs"]
mod tests;
