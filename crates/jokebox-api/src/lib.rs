use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use jokebox_core::{next_joke_id, Joke, JokeDraft, JokeboxError};
use jokebox_store_json::JsonStore;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("joke store unavailable: {0}")]
    Store(#[source] anyhow::Error),
}

impl From<JokeboxError> for ApiError {
    fn from(err: JokeboxError) -> Self {
        match err {
            JokeboxError::NotFound(detail) => Self::NotFound(detail),
            JokeboxError::Validation(detail) => Self::Validation(detail),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: &'static str,
    pub jokes_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub message: String,
}

/// The six joke operations over the JSON store. Every operation re-reads the
/// full collection; mutations serialize behind one writer lock so that id
/// allocation and the collection rewrite form a single critical section.
#[derive(Debug, Clone)]
pub struct JokeboxApi {
    data_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JokeboxApi {
    #[must_use]
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path, write_lock: Arc::new(Mutex::new(())) }
    }

    fn store(&self) -> JsonStore {
        JsonStore::new(self.data_path.clone())
    }

    /// Liveness plus the current collection size.
    ///
    /// # Errors
    /// Returns [`ApiError::Store`] when the store cannot be read.
    pub fn status(&self) -> Result<StatusResponse, ApiError> {
        let jokes = self.store().load().map_err(ApiError::Store)?;
        Ok(StatusResponse { status: "running", jokes_count: jokes.len() })
    }

    /// One uniformly random joke.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] when the collection is empty, or
    /// [`ApiError::Store`] when it cannot be read.
    pub fn random_joke(&self) -> Result<Joke, ApiError> {
        let jokes = self.store().load().map_err(ApiError::Store)?;
        let picked = jokebox_core::random_joke(&jokes)?;
        Ok(picked.clone())
    }

    /// Random sample of at most `count` jokes matching `query`.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] when nothing matches, or
    /// [`ApiError::Store`] when the store cannot be read.
    pub fn search(&self, query: &str, count: usize) -> Result<Vec<Joke>, ApiError> {
        let jokes = self.store().load().map_err(ApiError::Store)?;
        let found = jokebox_core::search_jokes(&jokes, query, count)?;
        Ok(found.into_iter().cloned().collect())
    }

    /// Lookup by id.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] when no joke has that id, or
    /// [`ApiError::Store`] when the store cannot be read.
    pub fn joke_by_id(&self, id: u64) -> Result<Joke, ApiError> {
        let jokes = self.store().load().map_err(ApiError::Store)?;
        jokes
            .into_iter()
            .find(|joke| joke.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Joke with ID {id} not found")))
    }

    /// Validate the draft, allocate the next id, and persist the grown
    /// collection — all under the writer lock.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] when the draft is invalid, or
    /// [`ApiError::Store`] when the store cannot be read or rewritten.
    pub fn create_joke(&self, draft: JokeDraft) -> Result<Joke, ApiError> {
        let valid = draft.validate()?;
        let store = self.store();

        let _guard = self.lock_writer()?;
        let mut jokes = store.load().map_err(ApiError::Store)?;
        let created = valid.into_joke(next_joke_id(&jokes));
        jokes.push(created.clone());
        store.save(&jokes).map_err(ApiError::Store)?;
        Ok(created)
    }

    /// Remove one joke by id and persist the shrunk collection under the
    /// writer lock.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] when no joke has that id, or
    /// [`ApiError::Store`] when the store cannot be read or rewritten.
    pub fn delete_joke(&self, id: u64) -> Result<DeleteResponse, ApiError> {
        let store = self.store();

        let _guard = self.lock_writer()?;
        let mut jokes = store.load().map_err(ApiError::Store)?;
        let before = jokes.len();
        jokes.retain(|joke| joke.id != id);
        if jokes.len() == before {
            return Err(ApiError::NotFound(format!("Joke with ID {id} not found")));
        }
        store.save(&jokes).map_err(ApiError::Store)?;
        Ok(DeleteResponse { message: format!("Joke {id} deleted successfully") })
    }

    /// The whole collection, in stored order.
    ///
    /// # Errors
    /// Returns [`ApiError::Store`] when the store cannot be read.
    pub fn list_jokes(&self) -> Result<Vec<Joke>, ApiError> {
        self.store().load().map_err(ApiError::Store)
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, ()>, ApiError> {
        self.write_lock.lock().map_err(|_| ApiError::Store(anyhow!("writer lock poisoned")))
    }
}
