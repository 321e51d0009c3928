//! # Document Attachment List
//!
//! Supporting documents picked by the user. The list is local UI state:
//! entries are appended in pick order and removed by index. Nothing here
//! uploads bytes or blocks submission.
//!
//! The upload control advertises "PDF, JPG or PNG, up to 10 MB". Those
//! limits are surfaced as [`DocumentAdvisory`] hints through
//! [`DocumentList::advisories`]; they are never enforced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME types the upload hint mentions.
pub const ADVISED_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Size the upload hint mentions.
pub const ADVISED_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Errors from document list operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Removal index past the end of the list.
    #[error("no document at index {index} (list has {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },
}

/// Descriptor of a picked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    /// File name as picked.
    pub name: String,
    /// MIME type reported by the picker.
    #[serde(alias = "mime_type")]
    pub mime_type: String,
    /// Size in bytes, when known.
    #[serde(default, alias = "size_bytes", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl UploadedDocument {
    /// A descriptor without a known size.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: None,
        }
    }

    /// Attach a byte size.
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }
}

/// A non-blocking hint about a picked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "advisory")]
pub enum DocumentAdvisory {
    /// MIME type outside the advertised set.
    UnadvisedType {
        /// Position in the list.
        index: usize,
        /// The reported MIME type.
        mime_type: String,
    },
    /// Size above the advertised limit.
    Oversized {
        /// Position in the list.
        index: usize,
        /// The reported size.
        size_bytes: u64,
    },
}

impl std::fmt::Display for DocumentAdvisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnadvisedType { index, mime_type } => write!(
                f,
                "document {index}: type {mime_type} is not PDF, JPG or PNG"
            ),
            Self::Oversized { index, size_bytes } => write!(
                f,
                "document {index}: {size_bytes} bytes exceeds the advised 10 MB"
            ),
        }
    }
}

/// Ordered list of picked documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocumentList {
    documents: Vec<UploadedDocument>,
}

impl DocumentList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append descriptors in the order given.
    pub fn add(&mut self, files: impl IntoIterator<Item = UploadedDocument>) {
        self.documents.extend(files);
    }

    /// Remove the descriptor at `index`, keeping the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<UploadedDocument, DocumentError> {
        if index >= self.documents.len() {
            return Err(DocumentError::IndexOutOfRange {
                index,
                len: self.documents.len(),
            });
        }
        Ok(self.documents.remove(index))
    }

    /// Drop every descriptor.
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.documents.iter()
    }

    /// Descriptors as a slice.
    pub fn as_slice(&self) -> &[UploadedDocument] {
        &self.documents
    }

    /// Hints for documents outside the advertised type and size limits.
    pub fn advisories(&self) -> Vec<DocumentAdvisory> {
        let mut out = Vec::new();
        for (index, doc) in self.documents.iter().enumerate() {
            if !ADVISED_MIME_TYPES.contains(&doc.mime_type.as_str()) {
                out.push(DocumentAdvisory::UnadvisedType {
                    index,
                    mime_type: doc.mime_type.clone(),
                });
            }
            if let Some(size) = doc.size_bytes.filter(|s| *s > ADVISED_MAX_BYTES) {
                out.push(DocumentAdvisory::Oversized {
                    index,
                    size_bytes: size,
                });
            }
        }
        out
    }
}
