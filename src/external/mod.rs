//! Collaborators outside the core pipeline: typesetting and upload

pub mod typesetter;
pub mod uploader;

pub use typesetter::{CommandTypesetter, Typesetter, TYPESETTER_ENV};
pub use uploader::{DirectoryUploader, UploadReceipt, Uploader};
