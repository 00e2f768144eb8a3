//!
//! fitserve catalog storage
//! ------------------------
//! Each admin-managed collection (products, memberships, videos) lives in one
//! JSON array file under the configured data directory. Reads and
//! read-modify-write cycles for a collection are serialized behind a
//! per-collection mutex so concurrent creates cannot assign duplicate ids.
//! Writes go through a temp file followed by a rename, so readers never see
//! a half-written file.
//!
//! Field-level validation stays with the route handlers; this layer only
//! guarantees id assignment and durable whole-collection replacement.

mod models;

pub use models::{Membership, Product, Video, price_from_json, opt_price_from_json};

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A record kind stored in a catalog collection.
pub trait CatalogEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// File name of the backing JSON array, e.g. `products.json`.
    const FILE_NAME: &'static str;

    fn id(&self) -> u64;
    fn assign_id(&mut self, id: u64);

    /// Collection materialized on first read when the file is absent.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

/// One JSON-file-backed collection.
pub struct FileCollection<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<T>,
}

fn io_error(op: &str, path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::internal("catalog_io", format!("{op} {}: {err}", path.display()))
}

impl<T: CatalogEntity> FileCollection<T> {
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join(T::FILE_NAME), lock: Mutex::new(()), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. An absent file is materialized with the seed
    /// collection; any other failure (malformed JSON, permissions) is fatal
    /// to the caller.
    pub fn read_all(&self) -> AppResult<Vec<T>> {
        let _g = self.lock.lock();
        self.load()
    }

    /// Replace the whole collection on disk.
    pub fn write_all(&self, rows: &[T]) -> AppResult<()> {
        let _g = self.lock.lock();
        self.store(rows)
    }

    /// Append a record, assigning id = max existing id + 1 (1 when empty).
    pub fn create(&self, mut row: T) -> AppResult<T> {
        let _g = self.lock.lock();
        let mut rows = self.load()?;
        let next_id = rows.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        row.assign_id(next_id);
        rows.push(row.clone());
        self.store(&rows)?;
        debug!(target: "fitserve::catalog", "create: file='{}' id={}", T::FILE_NAME, next_id);
        Ok(row)
    }

    /// Patch a record in place. Unknown ids leave the collection unchanged.
    pub fn update(&self, id: u64, patch: impl FnOnce(&mut T)) -> AppResult<T> {
        let _g = self.lock.lock();
        let mut rows = self.load()?;
        let Some(row) = rows.iter_mut().find(|r| r.id() == id) else {
            return Err(AppError::not_found("not_found", "Record not found"));
        };
        patch(row);
        let updated = row.clone();
        self.store(&rows)?;
        Ok(updated)
    }

    /// Remove a record by id.
    pub fn delete(&self, id: u64) -> AppResult<()> {
        let _g = self.lock.lock();
        let mut rows = self.load()?;
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(AppError::not_found("not_found", "Record not found"));
        }
        self.store(&rows)
    }

    fn load(&self) -> AppResult<Vec<T>> {
        if !self.path.exists() {
            let seed = T::seed();
            self.store(&seed)?;
            return Ok(seed);
        }
        let bytes = std::fs::read(&self.path).map_err(|e| io_error("read", &self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| io_error("parse", &self.path, e))
    }

    fn store(&self, rows: &[T]) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_error("mkdir", &self.path, e))?;
        }
        let body = serde_json::to_vec_pretty(rows).map_err(|e| io_error("encode", &self.path, e))?;
        // temp-write + rename keeps the visible file whole at all times
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| io_error("write", &tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_error("rename", &self.path, e))?;
        Ok(())
    }
}

/// The three catalog collections, rooted at the data directory.
pub struct CatalogStore {
    pub products: FileCollection<Product>,
    pub memberships: FileCollection<Membership>,
    pub videos: FileCollection<Video>,
}

impl CatalogStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            products: FileCollection::new(dir),
            memberships: FileCollection::new(dir),
            videos: FileCollection::new(dir),
        }
    }
}
