//! # Local File Cache
//!
//! Loads and stores the sync snapshot on local disk.
//!
//! ## Store Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  encode ──► <dir>/.<name>.tmp ──► fsync ──► rename ──► fsync <dir>      │
//! │                                                                         │
//! │  A crash at any step leaves either the old file or the new one at      │
//! │  the target path, never a partial write.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent `store` calls on the same path are not supported; the caller
//! serializes them.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::codec::{self, FileCache};
use crate::error::{CacheError, CacheResult};

/// Snapshot file at a fixed path.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing file is `Ok(None)`: nothing has been
    /// synced yet.
    pub async fn load(&self) -> CacheResult<Option<FileCache>> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache file");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        let cache = codec::decode(&data)?;

        info!(
            path = %self.path.display(),
            profiles = cache.profiles.len(),
            devices = cache.devices.len(),
            sync_time = %cache.sync_time,
            "Loaded profile cache"
        );

        Ok(Some(cache))
    }

    /// Atomically replaces the snapshot.
    pub async fn store(&self, cache: &FileCache) -> CacheResult<()> {
        let data = codec::encode(cache);
        let tmp = self.tmp_path();

        if let Err(e) = write_synced(&tmp, &data).await {
            remove_tmp(&tmp).await;
            return Err(CacheError::io(&tmp, e));
        }

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            remove_tmp(&tmp).await;
            return Err(CacheError::io(&self.path, e));
        }

        if let Some(dir) = self.dir() {
            sync_dir(dir).await.map_err(|e| CacheError::io(dir, e))?;
        }

        info!(
            path = %self.path.display(),
            bytes = data.len(),
            profiles = cache.profiles.len(),
            devices = cache.devices.len(),
            "Stored profile cache"
        );

        Ok(())
    }

    fn dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_string());

        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

async fn remove_tmp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        warn!(path = %tmp.display(), error = %e, "Failed to remove temporary cache file");
    }
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

// Directories cannot be opened for syncing here.
#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FILE_CACHE_VERSION;
    use warden_core::{Device, DeviceAuth, DeviceId, DeviceName, SyncTime};

    fn device(id: &str) -> Device {
        Device {
            id: DeviceId::new(id).unwrap(),
            name: DeviceName::new("Phone").unwrap(),
            human_id_lower: None,
            linked_ip: None,
            dedicated_ips: vec![],
            auth: DeviceAuth::default(),
            filtering_enabled: true,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("profiles.pb"));

        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("profiles.pb"));

        let first = FileCache::new(SyncTime::from_millis(1_000), vec![], vec![device("dev1")]);
        cache.store(&first).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(first));

        let second = FileCache::new(SyncTime::from_millis(2_000), vec![], vec![device("dev2")]);
        cache.store(&second).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(second));

        // No temporary file left behind.
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("profiles.pb")]);
    }

    #[tokio::test]
    async fn test_other_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("profiles.pb"));

        let mut old = FileCache::new(SyncTime::EPOCH, vec![], vec![]);
        old.version = FILE_CACHE_VERSION - 1;
        cache.store(&old).await.unwrap();

        let err = cache.load().await.unwrap_err();
        assert!(matches!(err, CacheError::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_garbage_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.pb");
        std::fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        let err = LocalCache::new(&path).load().await.unwrap_err();
        assert!(err.is_stale());
    }

    #[tokio::test]
    async fn test_store_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("nope").join("profiles.pb"));

        let err = cache
            .store(&FileCache::new(SyncTime::EPOCH, vec![], vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[tokio::test]
    async fn test_failed_rename_removes_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.pb");
        // A non-empty directory at the target makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let cache = LocalCache::new(&path);
        let err = cache
            .store(&FileCache::new(SyncTime::EPOCH, vec![], vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
        assert!(!dir.path().join(".profiles.pb.tmp").exists());
    }
}
