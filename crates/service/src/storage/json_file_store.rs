use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, error};

use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// Keeps a `T` in memory and rewrites the whole file after every mutation.
/// Intended for lightweight state where a database is overkill.
pub struct JsonFileStore<T> {
    inner: RwLock<T>,
    file_path: PathBuf,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    /// Open the store at `path`. A missing file is created holding `T::default()`;
    /// a file that does not parse is an error rather than silently reset.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        common::env::ensure_parent_dir(&file_path).await.map_err(ServiceError::storage)?;

        let value = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not valid: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = T::default();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::storage(e)),
        };
        debug!(path = %file_path.display(), "json file store opened");

        Ok(Self { inner: RwLock::new(value), file_path })
    }

    /// Run `f` against the current value under the shared lock.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let value = self.inner.read().await;
        f(&*value)
    }

    /// Apply a mutation and persist it before the write lock is released.
    /// If persisting fails the in-memory value is rolled back.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut value = self.inner.write().await;
        let previous = value.clone();
        let out = f(&mut *value);
        if let Err(e) = write_atomic(&self.file_path, &*value).await {
            error!(path = %self.file_path.display(), error = %e, "persist failed; rolling back");
            *value = previous;
            return Err(e);
        }
        Ok(out)
    }
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(value).map_err(ServiceError::storage)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::storage)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn json_file_store_update_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_file_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonFileStore::<BTreeMap<String, u32>>::open(&tmp).await?;

        // created empty
        assert!(store.read(|m| m.is_empty()).await);
        assert!(tokio::fs::metadata(&tmp).await.is_ok());

        let len = store
            .update(|m| {
                m.insert("a".into(), 1);
                m.insert("b".into(), 2);
                m.len()
            })
            .await?;
        assert_eq!(len, 2);

        let reloaded = JsonFileStore::<BTreeMap<String, u32>>::open(&tmp).await?;
        assert_eq!(reloaded.read(|m| m.get("b").copied()).await, Some(2));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_file_store_bad_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonFileStore::<BTreeMap<String, u32>>::open(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_persist_rolls_back_in_memory_value() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_file_store_dir_{}", uuid::Uuid::new_v4()));
        let store = JsonFileStore::<BTreeMap<String, u32>>::open(dir.join("f.json")).await?;
        store.update(|m| m.insert("a".into(), 1)).await?;

        // the directory vanishing makes the next write fail
        tokio::fs::remove_dir_all(&dir).await?;
        let res = store
            .update(|m| {
                m.insert("b".into(), 2);
                m.remove("a");
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));

        let snapshot = store.read(|m| m.clone()).await;
        assert_eq!(snapshot, BTreeMap::from([("a".to_string(), 1)]));
        Ok(())
    }
}
