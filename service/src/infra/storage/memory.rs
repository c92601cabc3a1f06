//! In-memory [`Storage`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use tokio::sync::Mutex;
use tracerr::Traced;

#[cfg(doc)]
use crate::infra::Storage;
use crate::infra::storage::{self, Key};

/// Volatile [`Storage`] living only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<HashMap<Key, String>>>);

impl Memory {
    /// Creates a new empty [`Memory`] storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all the stored entries.
    pub async fn snapshot(&self) -> HashMap<Key, String> {
        self.0.lock().await.clone()
    }
}

impl storage::Storage<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.lock().await.get(by.inner()).cloned())
    }
}

impl storage::Storage<Insert<(Key, String)>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.lock().await.insert(key, value));
        Ok(())
    }
}

impl storage::Storage<Delete<Key>> for Memory {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.lock().await.remove(&key));
        Ok(())
    }
}
