//! Flat-file persistence for the movie collection.
//!
//! Every backend reads and writes the whole file. The [`MovieStorage`]
//! operations are built on top of `load`/`save`, so each mutation is a full
//! read-modify-write cycle regardless of the encoding.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::movie::{Movie, Movies};

pub mod csv_storage;
pub mod json_storage;

pub use csv_storage::CsvStorage;
pub use json_storage::JsonStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait MovieStorage {
    /// Reads the whole backing file.
    fn load(&self) -> Result<Movies, StorageError>;

    /// Overwrites the whole backing file with `movies`.
    fn save(&self, movies: &Movies) -> Result<(), StorageError>;

    /// Location of the backing file, for messages.
    fn path(&self) -> &Path;

    /// Returns every stored movie. A missing, empty or malformed file reads
    /// as an empty collection.
    fn list_movies(&self) -> Movies {
        match self.load() {
            Ok(movies) => movies,
            Err(e) => {
                log::warn!("Could not read movies, using an empty collection: {}", e);
                Movies::new()
            }
        }
    }

    /// Inserts `title`, replacing any record stored under the exact same key.
    fn add_movie(
        &self,
        title: &str,
        year: i32,
        rating: f64,
        poster: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut movies = self.list_movies();
        movies.insert(title.to_string(), Movie::new(title, year, rating, poster));
        self.save(&movies)?;
        log::info!("Stored movie {} in {}", title, self.path().display());
        Ok(())
    }

    /// Removes `title` if present. Absent titles leave the file untouched.
    fn delete_movie(&self, title: &str) -> Result<(), StorageError> {
        let mut movies = self.list_movies();
        if movies.shift_remove(title).is_none() {
            log::debug!("Movie {} not stored, nothing to delete", title);
            return Ok(());
        }
        self.save(&movies)
    }

    /// Sets the rating of `title` if present.
    fn update_movie(&self, title: &str, rating: f64) -> Result<(), StorageError> {
        let mut movies = self.list_movies();
        match movies.get_mut(title) {
            Some(movie) => movie.rating = rating,
            None => {
                log::debug!("Movie {} not stored, nothing to update", title);
                return Ok(());
            }
        }
        self.save(&movies)
    }
}

/// Picks the backend from the file extension: `.json` files use the nested
/// object encoding, everything else is CSV.
pub fn open_storage(path: impl Into<PathBuf>) -> Box<dyn MovieStorage> {
    let path = path.into();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        log::info!("Using JSON storage at {}", path.display());
        Box::new(JsonStorage::new(path))
    } else {
        log::info!("Using CSV storage at {}", path.display());
        Box::new(CsvStorage::new(path))
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
