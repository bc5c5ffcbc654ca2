// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistence boundary for the `data` slice.
//!
//! The kernel hands `data` to a [`Persistence`] adapter after each dispatch that changed it and
//! asks for it once at construction. Storage media, debouncing and retries belong to the
//! adapter. Failures are logged by the kernel and never interrupt dispatch.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Persistence failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// `data` could not be encoded.
    #[error("failed to serialize state")]
    Serialize(#[source] serde_json::Error),
    /// Stored bytes could not be decoded.
    #[error("failed to deserialize state")]
    Deserialize(#[source] serde_json::Error),
    /// The storage medium failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Load/save adapter keyed by a string.
pub trait Persistence<D> {
    /// Stored data under `key`, if any.
    fn load(&mut self, key: &str) -> Result<Option<D>, PersistError>;

    /// Store `data` under `key`.
    fn save(&mut self, key: &str, data: &D) -> Result<(), PersistError>;
}

/// In-memory adapter storing JSON text.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store raw JSON under `key`, for seeding.
    pub fn insert_raw(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.entries.insert(key.into(), json.into());
    }
}

impl<D> Persistence<D> for MemoryStore
where
    D: Serialize + DeserializeOwned,
{
    fn load(&mut self, key: &str) -> Result<Option<D>, PersistError> {
        self.entries
            .get(key)
            .map(|json| serde_json::from_str(json).map_err(PersistError::Deserialize))
            .transpose()
    }

    fn save(&mut self, key: &str, data: &D) -> Result<(), PersistError> {
        let json = serde_json::to_string(data).map_err(PersistError::Serialize)?;
        self.entries.insert(key.to_owned(), json);
        Ok(())
    }
}
