//! File-backed [`Storage`] implementation.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use common::operations::{By, Delete, Insert, Select};
use tokio::{fs, sync::Mutex};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::infra::Storage;
use crate::infra::storage::{self, Key};

/// Contents of a [`File`] storage.
type Entries = BTreeMap<String, String>;

/// [`Storage`] persisted as a JSON object in a single file.
#[derive(Clone, Debug)]
pub struct File {
    /// Path of the backing file.
    path: PathBuf,

    /// Serializes read-modify-write cycles of this process.
    lock: Arc<Mutex<()>>,
}

impl File {
    /// Creates a new [`File`] storage backed by the provided `path`.
    ///
    /// The file is created lazily on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all the entries, treating a missing file as an empty one.
    async fn load(&self) -> Result<Entries, Traced<storage::Error>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(tracerr::from_and_wrap!(=> storage::Error)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Entries::new())
            }
            Err(e) => Err(tracerr::new!(storage::Error::Io(e))),
        }
    }

    /// Overwrites all the entries.
    async fn store(&self, entries: &Entries) -> Result<(), Traced<storage::Error>> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(tracerr::from_and_wrap!(=> storage::Error))?;
        }
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(tracerr::from_and_wrap!(=> storage::Error))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> storage::Error))
    }
}

impl storage::Storage<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await.map_err(tracerr::wrap!())?;
        Ok(entries.remove(&by.into_inner().to_string()))
    }
}

impl storage::Storage<Insert<(Key, String)>> for File {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await.map_err(tracerr::wrap!())?;
        drop(entries.insert(key.to_string(), value));
        log::debug!("storing `{key}` in `{}`", self.path.display());
        self.store(&entries).await.map_err(tracerr::wrap!())
    }
}

impl storage::Storage<Delete<Key>> for File {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await.map_err(tracerr::wrap!())?;
        if entries.remove(&key.to_string()).is_none() {
            return Ok(());
        }
        log::debug!("removing `{key}` from `{}`", self.path.display());
        self.store(&entries).await.map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use common::operations::{By, Delete, Insert, Select};

    use crate::infra::storage::{Key, Storage as _};

    use super::File;

    fn temp_file(name: &str) -> File {
        let dir = env::temp_dir()
            .join(format!("aabb-storage-{}-{name}", process::id()));
        File::new(dir.join("session.json"))
    }

    #[tokio::test]
    async fn persists_across_instances() {
        let file = temp_file("persist");

        assert_eq!(
            file.execute(Select(By::new(Key::Token))).await.unwrap(),
            None,
        );

        file.execute(Insert((Key::Token, "abc".to_owned())))
            .await
            .unwrap();
        file.execute(Insert((Key::User, "{}".to_owned())))
            .await
            .unwrap();

        let reopened = File::new(file.path());
        assert_eq!(
            reopened
                .execute(Select(By::new(Key::Token)))
                .await
                .unwrap()
                .as_deref(),
            Some("abc"),
        );

        reopened.execute(Delete(Key::Token)).await.unwrap();
        reopened.execute(Delete(Key::Token)).await.unwrap();
        assert_eq!(
            file.execute(Select(By::new(Key::Token))).await.unwrap(),
            None,
        );
        assert_eq!(
            file.execute(Select(By::new(Key::User)))
                .await
                .unwrap()
                .as_deref(),
            Some("{}"),
        );

        drop(std::fs::remove_dir_all(file.path().parent().unwrap()));
    }

    #[tokio::test]
    async fn rejects_corrupted_files() {
        let file = temp_file("corrupt");
        std::fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        std::fs::write(file.path(), "not json").unwrap();

        assert!(file.execute(Select(By::new(Key::Token))).await.is_err());

        drop(std::fs::remove_dir_all(file.path().parent().unwrap()));
    }
}
