//! Report attachments.
//!
//! The active report receives artifacts through an [`AttachmentSink`].
//! [`ResultsDirSink`] lays them out the way Allure expects in an
//! `allure-results` directory: `<uuid>-attachment.<ext>` files, plus an
//! `attachments.json` index so a summary can be rebuilt later.

use crate::result::{FailsnapError, FailsnapResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the index written by [`ResultsDirSink`]
pub const ATTACHMENT_INDEX: &str = "attachments.json";

/// Kind of attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentType {
    /// PNG image
    Png,
}

impl AttachmentType {
    /// MIME type
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
        }
    }

    /// File extension, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
        }
    }
}

/// Metadata about an attached artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name in the report
    pub name: String,
    /// Attachment kind
    #[serde(rename = "type")]
    pub kind: AttachmentType,
    /// Size of the body in bytes
    pub size: usize,
    /// File holding the body, when persisted
    pub source: Option<String>,
}

/// Destination for report attachments
pub trait AttachmentSink {
    /// Attach `body` under `name`
    fn attach(
        &mut self,
        body: &[u8],
        name: &str,
        kind: AttachmentType,
    ) -> FailsnapResult<Attachment>;

    /// Everything attached so far
    fn attachments(&self) -> &[Attachment];
}

/// In-memory sink, keeps bodies alongside their metadata
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    attachments: Vec<Attachment>,
    bodies: Vec<Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Body of the attachment at `index`
    #[must_use]
    pub fn body(&self, index: usize) -> Option<&[u8]> {
        self.bodies.get(index).map(Vec::as_slice)
    }

    /// Number of attachments
    #[must_use]
    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    /// Check if nothing was attached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

impl AttachmentSink for MemorySink {
    fn attach(
        &mut self,
        body: &[u8],
        name: &str,
        kind: AttachmentType,
    ) -> FailsnapResult<Attachment> {
        let attachment = Attachment {
            name: name.to_string(),
            kind,
            size: body.len(),
            source: None,
        };
        self.attachments.push(attachment.clone());
        self.bodies.push(body.to_vec());
        Ok(attachment)
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

/// Sink writing attachments into an Allure-style results directory
#[derive(Debug, Clone)]
pub struct ResultsDirSink {
    dir: PathBuf,
    attachments: Vec<Attachment>,
}

impl ResultsDirSink {
    /// Open (and create) a results directory
    pub fn create(dir: impl Into<PathBuf>) -> FailsnapResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            attachments: Vec::new(),
        })
    }

    /// Results directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the index previously written to `dir`
    pub fn load_index(dir: &Path) -> FailsnapResult<Vec<Attachment>> {
        let content = std::fs::read_to_string(dir.join(ATTACHMENT_INDEX))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_index(&self) -> FailsnapResult<()> {
        let json = serde_json::to_string_pretty(&self.attachments)?;
        std::fs::write(self.dir.join(ATTACHMENT_INDEX), json)?;
        Ok(())
    }
}

impl AttachmentSink for ResultsDirSink {
    fn attach(
        &mut self,
        body: &[u8],
        name: &str,
        kind: AttachmentType,
    ) -> FailsnapResult<Attachment> {
        let file_name = format!("{}-attachment.{}", uuid::Uuid::new_v4(), kind.extension());
        std::fs::write(self.dir.join(&file_name), body).map_err(|e| {
            FailsnapError::Attachment {
                name: name.to_string(),
                message: e.to_string(),
            }
        })?;

        let attachment = Attachment {
            name: name.to_string(),
            kind,
            size: body.len(),
            source: Some(file_name),
        };
        self.attachments.push(attachment.clone());
        self.write_index()?;
        tracing::debug!(name, source = ?attachment.source, "attachment written");
        Ok(attachment)
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}
