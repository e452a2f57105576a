//! Staged file writes
//!
//! Data is written to a sibling `<name>.csutil-part` file and renamed over
//! the target only once every byte is on disk. An existing target is left
//! untouched until then. The part file is removed whenever a write is
//! abandoned before commit.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Suffix of in-progress files; listings skip names ending with it
pub const PART_SUFFIX: &str = ".csutil-part";

/// Path of the part file that stages writes to `target`
pub fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(PART_SUFFIX);
    target.with_file_name(name)
}

/// An open part file that replaces its target on [`commit`](Self::commit)
#[derive(Debug)]
pub struct StagedFile {
    file: Option<File>,
    part: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Create (or truncate) the part file for `target`
    pub async fn create(target: &Path) -> io::Result<Self> {
        let part = part_path(target);
        let file = File::create(&part).await?;
        Ok(Self {
            file: Some(file),
            part,
            target: target.to_path_buf(),
            committed: false,
        })
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(buf).await,
            None => Err(io::Error::other("staged file already closed")),
        }
    }

    /// Flush, sync and rename the part file over the target
    pub async fn commit(mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        tokio::fs::rename(&self.part, &self.target).await?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close the handle before removing the file
        drop(self.file.take());
        match std::fs::remove_file(&self.part) {
            Ok(()) => debug!(path = %self.part.display(), "Removed partial file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %self.part.display(), error = %e, "Could not remove partial file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/data/report.csv")),
            Path::new("/data/report.csv.csutil-part")
        );
        assert_eq!(part_path(Path::new("a")), Path::new("a.csutil-part"));
    }

    #[tokio::test]
    async fn test_commit_replaces_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "old").unwrap();

        let mut staged = StagedFile::create(&target).await.unwrap();
        staged.write_all(b"new").await.unwrap();
        // Target untouched until commit
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        staged.commit().await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert!(!part_path(&target).exists());
    }

    #[tokio::test]
    async fn test_drop_keeps_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "old").unwrap();

        let mut staged = StagedFile::create(&target).await.unwrap();
        staged.write_all(b"half").await.unwrap();
        drop(staged);

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        assert!(!part_path(&target).exists());
    }

    #[tokio::test]
    async fn test_failed_create_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        std::fs::write(&target, "old").unwrap();
        // A directory in the part file's place makes the create fail
        std::fs::create_dir(part_path(&target)).unwrap();

        assert!(StagedFile::create(&target).await.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        assert!(part_path(&target).is_dir());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_part() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner"), "x").unwrap();

        let mut staged = StagedFile::create(&target).await.unwrap();
        staged.write_all(b"data").await.unwrap();
        assert!(staged.commit().await.is_err());

        assert!(target.join("inner").exists());
        assert!(!part_path(&target).exists());
    }
}
