//! Domain models shared by the API, storage and validation crates.

pub mod form_id;
pub mod message;
pub mod object_key;
pub mod tenant;

pub use form_id::{FormId, FormIdError, VersionedFormId};
pub use message::{MessageStatus, ResultEnvelope};
pub use object_key::{CannedAcl, EmptyObjectName, Folder, ObjectKey, UploadMetadata};
pub use tenant::TenantConfig;
