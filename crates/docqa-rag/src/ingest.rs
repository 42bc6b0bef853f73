//! Store, extract, summarize, chunk and index uploaded files.

use docqa_core::chunker::Chunker;
use docqa_core::types::{DocumentKind, DocumentMeta};
use docqa_llm::Summarizer;
use docqa_text::{extract_bytes, preview};
use docqa_vector::VectorIndex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::Result;

pub const NO_TEXT_EXTRACTED: &str = "no_text_extracted";
pub const NO_FILE_FIELD: &str = "no_file_field";
pub const PREVIEW_BYTES: usize = 200;

/// Office applications leave `~$name.docx` lock files next to open documents.
const LOCK_FILE_PREFIX: &str = "~$";

/// A file as received from a caller: original name plus content.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    pub saved_as: String,
    pub bytes: usize,
    pub ftype: String,
    pub chunks: usize,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub ok: bool,
    pub files: usize,
    pub indexed_chunks: usize,
    pub files_list: Vec<String>,
    pub details: Vec<FileReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyBatchReport {
    pub ok: bool,
    pub error: String,
    pub hint: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UploadReport {
    Batch(BatchReport),
    Empty(EmptyBatchReport),
}

impl UploadReport {
    pub fn ok(&self) -> bool {
        match self {
            Self::Batch(b) => b.ok,
            Self::Empty(e) => e.ok,
        }
    }

    fn from_details(details: Vec<FileReport>) -> Self {
        Self::Batch(BatchReport {
            ok: details.iter().any(|d| d.ok),
            files: details.len(),
            indexed_chunks: details.iter().filter(|d| d.ok).map(|d| d.chunks).sum(),
            files_list: details.iter().map(|d| d.name.clone()).collect(),
            details,
        })
    }
}

#[derive(Clone)]
pub struct Ingestor {
    index: VectorIndex,
    summarizer: Summarizer,
    chunker: Chunker,
    upload_dir: PathBuf,
}

impl Ingestor {
    pub fn new(index: VectorIndex, summarizer: Summarizer, chunker: Chunker, upload_dir: PathBuf) -> Self {
        Self { index, summarizer, chunker, upload_dir }
    }

    /// Ingest files one after another; report order matches input order.
    pub async fn ingest_batch(&self, files: Vec<UploadFile>) -> UploadReport {
        if files.is_empty() {
            return UploadReport::Empty(EmptyBatchReport {
                ok: false,
                error: NO_FILE_FIELD.to_string(),
                hint: "Expected at least one file in the upload.".to_string(),
            });
        }
        let mut details = Vec::with_capacity(files.len());
        for file in files {
            details.push(self.ingest_upload(file).await);
        }
        UploadReport::from_details(details)
    }

    /// Save `file` as `<uuid><ext>` under the upload directory, then index it.
    pub async fn ingest_upload(&self, file: UploadFile) -> FileReport {
        let saved = self.upload_dir.join(stored_name(&file.name));
        if let Err(e) = self.save(&saved, &file.bytes).await {
            warn!(file = %file.name, "Could not store upload: {e}");
            let mut report = FileReport::new(&file.name, &saved, &file.bytes, DocumentKind::from_path(Path::new(&file.name)));
            report.error = Some(e.to_string());
            return report;
        }
        self.ingest_bytes(&file.name, &saved, &file.bytes).await
    }

    async fn save(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Files under `dir` a seed run would ingest, sorted by path.
    ///
    /// Entries below `dir` that cannot be read are logged and skipped; only an
    /// unreadable `dir` itself is an error.
    pub fn seed_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
                Err(e) => {
                    warn!(path = ?e.path(), "Skipping unreadable entry: {e}");
                    continue;
                }
            };
            let is_lock = entry.file_name().to_string_lossy().starts_with(LOCK_FILE_PREFIX);
            if entry.file_type().is_file() && !is_lock {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Ingest every file under `dir` in place (no copy), calling `on_file`
    /// after each one.
    pub async fn seed_folder(&self, dir: &Path, mut on_file: impl FnMut(&FileReport)) -> Result<UploadReport> {
        let mut details = Vec::new();
        for path in self.seed_files(dir)? {
            let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            let report = match tokio::fs::read(&path).await {
                Ok(bytes) => self.ingest_bytes(&name, &path, &bytes).await,
                Err(e) => {
                    let mut report = FileReport::new(&name, &path, &[], DocumentKind::from_path(&path));
                    report.error = Some(e.to_string());
                    report
                }
            };
            on_file(&report);
            details.push(report);
        }
        Ok(UploadReport::from_details(details))
    }

    /// Index a file already stored at `source`; `bytes` is its content.
    pub async fn ingest_bytes(&self, name: &str, source: &Path, bytes: &[u8]) -> FileReport {
        let kind = DocumentKind::from_path(source);
        let mut report = FileReport::new(name, source, bytes, kind);

        let extraction = extract_bytes(bytes, kind);
        if extraction.is_empty() {
            warn!(file = name, "No text extracted");
            report.error = Some(NO_TEXT_EXTRACTED.to_string());
            report.preview = Some(preview(bytes, PREVIEW_BYTES));
            return report;
        }

        let chunks: Vec<String> = self.chunker.chunk(&extraction.text).into_iter().map(|c| c.text).collect();
        report.chunks = chunks.len();
        let meta = DocumentMeta {
            file_name: name.to_string(),
            file_type: kind,
            summary: self.summarizer.summarize(&extraction.text).await,
            source: source.to_string_lossy().to_string(),
        };
        match self.index.upsert(&chunks, &meta).await {
            Ok(written) => {
                info!(file = name, ftype = %kind, chunks = written, "Indexed file");
                report.ok = true;
            }
            Err(e) => {
                warn!(file = name, "Indexing failed: {e}");
                report.error = Some(e.to_string());
            }
        }
        report
    }
}

impl FileReport {
    fn new(name: &str, saved_as: &Path, bytes: &[u8], kind: DocumentKind) -> Self {
        Self {
            name: name.to_string(),
            saved_as: saved_as.to_string_lossy().to_string(),
            bytes: bytes.len(),
            ftype: kind.to_string(),
            chunks: 0,
            ok: false,
            error: None,
            preview: None,
        }
    }
}

/// `<uuid><.ext>` keeping the original extension, lowercased.
fn stored_name(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4(), ext)
}
