use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use bytes::Bytes;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::domain::{common::entities::app_errors::CoreError, storage::ports::FileStorage};

/// Stores files on the local disk as `{root}/{user_id}/{filename}`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Only paths below the upload root are ever touched.
    fn resolve(&self, path: &str) -> Result<PathBuf, CoreError> {
        let path = PathBuf::from(path);
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));

        if escapes || !path.starts_with(&self.root) {
            return Err(CoreError::FileNotFound);
        }

        Ok(path)
    }

    fn is_plain_name(filename: &str) -> bool {
        let mut components = Path::new(filename).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }
}

impl FileStorage for LocalFileStorage {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn save(&self, user_id: Uuid, filename: String, data: Bytes) -> Result<String, CoreError> {
        if !Self::is_plain_name(&filename) {
            return Err(CoreError::StorageError(format!(
                "Invalid file name: {filename}"
            )));
        }

        let directory = self.root.join(user_id.to_string());
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            error!("Failed to create upload directory: {}", e);
            CoreError::StorageError(e.to_string())
        })?;

        let path = directory.join(&filename);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write upload: {}", e);
            CoreError::StorageError(e.to_string())
        })?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn read(&self, path: String) -> Result<Bytes, CoreError> {
        let path = self.resolve(&path)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::FileNotFound),
            Err(e) => {
                error!("Failed to read stored file: {}", e);
                Err(CoreError::StorageError(e.to_string()))
            }
        }
    }

    async fn delete(&self, path: String) -> Result<(), CoreError> {
        let path = self.resolve(&path)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to delete stored file: {}", e);
                Err(CoreError::StorageError(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_read_delete() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        let user_id = Uuid::new_v4();

        let path = storage
            .save(user_id, "scan.png".to_string(), Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert!(path.ends_with("scan.png"));
        assert!(path.contains(&user_id.to_string()));
        assert_eq!(storage.read(path.clone()).await.unwrap(), Bytes::from_static(b"png"));

        storage.delete(path.clone()).await.unwrap();
        assert_eq!(storage.read(path.clone()).await, Err(CoreError::FileNotFound));
        assert_eq!(storage.delete(path).await, Ok(()));
    }

    #[tokio::test]
    async fn test_paths_outside_root_are_refused() {
        let dir = tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let outside = storage.read("/etc/hostname".to_string()).await;
        let traversal = storage
            .read(format!("{}/../secret", dir.path().display()))
            .await;
        let nested = storage
            .save(Uuid::new_v4(), "../x.png".to_string(), Bytes::new())
            .await;

        assert_eq!(outside, Err(CoreError::FileNotFound));
        assert_eq!(traversal, Err(CoreError::FileNotFound));
        assert!(matches!(nested, Err(CoreError::StorageError(_))));
    }
}
