use std::path::{Path, PathBuf};

/// An upload body spooled to disk while the request is still being read.
///
/// The file is deleted when this value is dropped. Once the asset store has
/// moved it into a display directory there is nothing left to delete.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    size: u64,
}

impl StagedFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, size: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn record_written(&mut self, byte_count: usize) {
        self.size += byte_count as u64;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("[UPLOAD] failed to discard {:?}: {}", self.path, e);
            }
        }
    }
}
