//! Publishing of generated artifacts to a fixed destination

use crate::error::{Result, ResumeTailorError};
use log::info;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub destination: PathBuf,
    /// False when an artifact of the same name was replaced.
    pub created: bool,
}

pub trait Uploader {
    /// Publish `artifact` under its file name. Publishing the same name again
    /// updates the earlier copy.
    fn upload(&self, artifact: &Path) -> Result<UploadReceipt>;
}

/// Publishes into a local or mounted directory.
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    destination: PathBuf,
}

impl DirectoryUploader {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn publish(&self, artifact: &Path, target: &Path) -> io::Result<()> {
        fs::create_dir_all(&self.destination)?;
        let mut staged = NamedTempFile::new_in(&self.destination)?;
        let mut source = fs::File::open(artifact)?;
        io::copy(&mut source, staged.as_file_mut())?;
        staged.as_file().sync_all()?;
        staged.persist(target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Uploader for DirectoryUploader {
    fn upload(&self, artifact: &Path) -> Result<UploadReceipt> {
        let file_name = artifact.file_name().ok_or_else(|| {
            ResumeTailorError::InvalidInput(format!("no file name in {}", artifact.display()))
        })?;
        let target = self.destination.join(file_name);
        let created = !target.exists();

        self.publish(artifact, &target).map_err(|e| {
            ResumeTailorError::external_tool("upload", format!("{}: {}", target.display(), e))
        })?;

        info!(
            "{} {}",
            if created { "Uploaded" } else { "Updated" },
            target.display()
        );
        Ok(UploadReceipt {
            destination: target,
            created,
        })
    }
}
