//! Storage key layout and per-folder upload metadata.
//!
//! Every object lives under one of three fixed folders:
//!
//! - `devicezip/{filename}` for device export archives
//! - `images/{filename}` for images (stored world-readable)
//! - `surveys/{versioned_form_id}.zip` for survey archives

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::form_id::VersionedFormId;

/// Fixed logical partition of a tenant bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Devicezip,
    Images,
    Surveys,
}

impl Folder {
    pub fn as_str(self) -> &'static str {
        match self {
            Folder::Devicezip => "devicezip",
            Folder::Images => "images",
            Folder::Surveys => "surveys",
        }
    }

    /// Canned ACL applied to objects uploaded into this folder.
    pub fn canned_acl(self) -> Option<CannedAcl> {
        match self {
            Folder::Images => Some(CannedAcl::PublicRead),
            Folder::Devicezip | Folder::Surveys => None,
        }
    }
}

impl Display for Folder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CannedAcl {
    #[serde(rename = "public-read")]
    PublicRead,
}

impl CannedAcl {
    pub fn as_str(self) -> &'static str {
        match self {
            CannedAcl::PublicRead => "public-read",
        }
    }
}

/// A `{folder}/{name}` storage key. Only constructible through a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    folder: Folder,
    key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Object name must not be empty")]
pub struct EmptyObjectName;

impl ObjectKey {
    /// Key for an uploaded or requested file. The name is used verbatim after the folder prefix.
    pub fn new(folder: Folder, name: &str) -> Result<Self, EmptyObjectName> {
        if name.is_empty() {
            return Err(EmptyObjectName);
        }
        Ok(ObjectKey {
            folder,
            key: format!("{}/{}", folder.as_str(), name),
        })
    }

    /// Key of a survey archive: `surveys/{versioned_form_id}.zip`.
    pub fn survey_archive(id: &VersionedFormId) -> Self {
        ObjectKey {
            folder: Folder::Surveys,
            key: format!("{}/{}.zip", Folder::Surveys.as_str(), id.as_str()),
        }
    }

    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.key)
    }
}

/// Metadata attached to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    pub content_type: String,
    pub acl: Option<CannedAcl>,
}

impl UploadMetadata {
    /// Metadata for an upload into `folder`: the declared content type, plus the folder's ACL.
    pub fn for_folder(folder: Folder, content_type: impl Into<String>) -> Self {
        UploadMetadata {
            content_type: content_type.into(),
            acl: folder.canned_acl(),
        }
    }
}
