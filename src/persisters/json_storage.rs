use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    model::movie::{Movie, Movies},
    persisters::{ensure_parent_dir, MovieStorage, StorageError},
};

#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    rating: Value,
    #[serde(default)]
    year: Value,
    #[serde(default)]
    poster: Value,
}

#[derive(Debug, Serialize)]
struct EntryRef<'a> {
    rating: f64,
    year: i32,
    #[serde(skip_serializing_if = "str::is_empty")]
    poster: &'a str,
}

fn lenient_year(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok())
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn lenient_rating(value: &Value) -> f64 {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    rating.filter(|r| r.is_finite()).unwrap_or(0.0)
}

fn lenient_poster(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl MovieStorage for JsonStorage {
    fn load(&self) -> Result<Movies, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("Movie file {} does not exist yet", self.path.display());
                return Ok(Movies::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            log::debug!("Movie file {} is empty", self.path.display());
            return Ok(Movies::new());
        }

        let entries: IndexMap<String, StoredEntry> =
            serde_json::from_str(&content).map_err(|e| self.json_error(e))?;

        Ok(entries
            .into_iter()
            .map(|(title, entry)| {
                let movie = Movie {
                    title: title.clone(),
                    year: lenient_year(&entry.year),
                    rating: lenient_rating(&entry.rating),
                    poster: lenient_poster(&entry.poster),
                };
                (title, movie)
            })
            .collect())
    }

    fn save(&self, movies: &Movies) -> Result<(), StorageError> {
        ensure_parent_dir(&self.path)?;

        let entries: IndexMap<&str, EntryRef> = movies
            .iter()
            .map(|(title, movie)| {
                let entry = EntryRef {
                    rating: movie.rating,
                    year: movie.year,
                    poster: &movie.poster,
                };
                (title.as_str(), entry)
            })
            .collect();

        let body = serde_json::to_string_pretty(&entries).map_err(|e| self.json_error(e))?;
        fs::write(&self.path, body).map_err(|e| self.io_error(e))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
