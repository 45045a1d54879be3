//! The loaded set of pools.
//!
//! A [`Catalog`] is built once per process from a pools file and handed to
//! whatever needs it. Reloading is explicit: [`Catalog::clear`] then
//! [`Catalog::reload`].

use crate::{
    clock::{Clock, EasternTime},
    data::{pool::Pool, record::PoolRecord},
};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error generated while loading pools.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The pools file could not be read.
    #[error("could not read pools file `{}`", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The pools file is not a list of pools.
    #[error("pools data is not a JSON list of pools")]
    Json(#[from] serde_json::Error),

    /// [`Catalog::reload`] was called on a catalog not loaded from a file.
    #[error("catalog was not loaded from a file, so it cannot be reloaded")]
    NoSource,
}

/// Either a bare list of pools or `{ "pools": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PoolsFile {
    List(Vec<serde_json::Value>),
    Wrapped { pools: Vec<serde_json::Value> },
}

impl PoolsFile {
    fn into_records(self) -> impl Iterator<Item = PoolRecord> {
        let (PoolsFile::List(values) | PoolsFile::Wrapped { pools: values }) = self;
        values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<PoolRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping malformed pool record");
                    None
                }
            })
    }
}

/// Pools by id, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pools: Vec<Pool>,
    index: FxHashMap<String, usize>,
    source: Option<PathBuf>,
}

impl Catalog {
    /// Build a catalog from records, selecting each pool's schedule for `today`.
    ///
    /// If two records share an id, the first is kept.
    pub fn from_records(records: impl IntoIterator<Item = PoolRecord>, today: NaiveDate) -> Self {
        let mut catalog = Self::default();
        catalog.insert_all(records, today);
        catalog
    }

    /// Parse a pools document.
    ///
    /// Malformed pool records are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Json`] if `json` is not a list of objects, bare or
    /// wrapped in `{ "pools": [...] }`.
    pub fn from_json(json: &str, today: NaiveDate) -> Result<Self, CatalogError> {
        let file = serde_json::from_str::<PoolsFile>(json)?;
        Ok(Self::from_records(file.into_records(), today))
    }

    /// Read and parse a pools file, selecting schedules for today in Eastern Time.
    ///
    /// # Errors
    ///
    /// See [`CatalogError`].
    pub fn load(path: impl Into<PathBuf>, clock: &dyn Clock) -> Result<Self, CatalogError> {
        let path = path.into();
        let mut catalog = Self::from_json(&read_pools_file(&path)?, EasternTime::now(clock).date)?;
        tracing::info!(path = %path.display(), pools = catalog.len(), "loaded pools");
        catalog.source = Some(path);
        Ok(catalog)
    }

    /// Remove every pool. The source file, if any, is remembered for [`reload`](Self::reload).
    pub fn clear(&mut self) {
        self.pools.clear();
        self.index.clear();
    }

    /// Replace the pools with a fresh read of the source file.
    ///
    /// On error the catalog is left unchanged.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NoSource`] if the catalog did not come from [`load`](Self::load),
    /// otherwise as [`load`](Self::load).
    pub fn reload(&mut self, clock: &dyn Clock) -> Result<(), CatalogError> {
        let path = self.source.take().ok_or(CatalogError::NoSource)?;
        let loaded = Self::load(&path, clock);
        match loaded {
            Ok(fresh) => *self = fresh,
            Err(e) => {
                self.source = Some(path);
                return Err(e);
            }
        }
        Ok(())
    }

    fn insert_all(&mut self, records: impl IntoIterator<Item = PoolRecord>, today: NaiveDate) {
        for record in records {
            if self.index.contains_key(&record.id) {
                tracing::warn!(id = record.id.as_str(), "ignoring pool with duplicate id");
                continue;
            }
            self.index.insert(record.id.clone(), self.pools.len());
            self.pools.push(Pool::from_record(record, today));
        }
    }

    /// The pool with the given id.
    pub fn get(&self, id: &str) -> Option<&Pool> {
        self.index.get(id).map(|&i| &self.pools[i])
    }

    /// Pools matching `term` (see [`Pool::matches`]), in file order.
    pub fn search(&self, term: &str) -> Vec<&Pool> {
        self.pools.iter().filter(|pool| pool.matches(term)).collect()
    }

    /// Pools open to the public at `now`.
    pub fn open_now(&self, now: &EasternTime) -> Vec<&Pool> {
        self.pools.iter().filter(|pool| pool.is_open_now(now)).collect()
    }

    /// Every pool, in file order.
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// The file the catalog was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether there are no pools.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

fn read_pools_file(path: &Path) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}
