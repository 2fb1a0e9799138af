use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A whole-file rewrite with verification of the text it was computed from.
///
/// The rewritten text is derived from a snapshot of the file. Applying it
/// re-reads the file and refuses to write if the file changed since the
/// snapshot, so a concurrent edit is never silently overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FileRewrite does nothing until apply() is called"]
pub struct FileRewrite {
    /// Path to the file to rewrite
    pub file: PathBuf,
    /// Full new contents
    pub new_text: String,
    /// Verification of the contents the new text was computed from
    pub expected_before: EditVerification,
}

/// Verification strategy for rewrite safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (used for large files)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => xxh3_64(text.as_bytes()) == *expected_hash,
        }
    }

    /// Create verification from text, using a hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }

    /// Get hash value regardless of variant.
    pub fn hash(&self) -> u64 {
        match self {
            EditVerification::Hash(h) => *h,
            EditVerification::ExactMatch(text) => xxh3_64(text.as_bytes()),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{file} changed since it was read (expected hash {expected:016x}, found {found:016x})")]
    BeforeTextMismatch {
        file: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 validation error in {file}: {source}")]
    Utf8 {
        file: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Result of applying a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RewriteResult should be checked for applied/unchanged"]
pub enum RewriteResult {
    /// New text was written
    Applied { file: PathBuf, bytes_written: usize },
    /// File already holds the new text
    Unchanged { file: PathBuf },
}

impl FileRewrite {
    /// Create a rewrite from the text it was computed from.
    pub fn new(
        file: impl Into<PathBuf>,
        original: &str,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(original),
        }
    }

    /// Whether the new text differs from `current`.
    pub fn changes(&self, current: &str) -> bool {
        current != self.new_text
    }

    /// Apply this rewrite to the file system atomically.
    ///
    /// Uses tempfile + fsync + rename for crash safety.
    pub fn apply(&self) -> Result<RewriteResult, EditError> {
        let bytes = fs::read(&self.file)?;
        let current = String::from_utf8(bytes).map_err(|source| EditError::Utf8 {
            file: self.file.clone(),
            source,
        })?;

        if !self.changes(&current) {
            return Ok(RewriteResult::Unchanged {
                file: self.file.clone(),
            });
        }

        if !self.expected_before.matches(&current) {
            return Err(EditError::BeforeTextMismatch {
                file: self.file.clone(),
                expected: self.expected_before.hash(),
                found: xxh3_64(current.as_bytes()),
            });
        }

        atomic_write(&self.file, self.new_text.as_bytes())?;
        tracing::debug!(file = %self.file.display(), bytes = self.new_text.len(), "rewrote file");

        Ok(RewriteResult::Applied {
            file: self.file.clone(),
            bytes_written: self.new_text.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or nothing changes.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    // Same directory keeps the rename on one filesystem.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(EditError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            )))
        }
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
