use std::{
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Writer};
use serde::Deserialize;

use crate::{
    model::movie::{Movie, Movies},
    persisters::{ensure_parent_dir, MovieStorage, StorageError},
};

/// One raw CSV row. Numeric columns stay text so bad values can be coerced
/// instead of failing the row. Files written before posters were stored
/// have no `poster` column or end rows after the rating.
#[derive(Debug, Deserialize)]
struct CsvRow {
    title: String,
    year: String,
    rating: String,
    #[serde(default)]
    poster: String,
}

impl CsvRow {
    fn into_movie(self) -> Movie {
        let year = self.year.trim().parse::<i32>().unwrap_or(0);
        let rating = self
            .rating
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .unwrap_or(0.0);

        Movie {
            title: self.title,
            year,
            rating,
            poster: self.poster,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage { path: path.into() }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl MovieStorage for CsvStorage {
    fn load(&self) -> Result<Movies, StorageError> {
        let opened = ReaderBuilder::new().flexible(true).from_path(&self.path);
        let mut rdr = match opened {
            Ok(rdr) => rdr,
            Err(e) => {
                if let csv::ErrorKind::Io(io_err) = e.kind() {
                    if io_err.kind() == io::ErrorKind::NotFound {
                        log::debug!("Movie file {} does not exist yet", self.path.display());
                        return Ok(Movies::new());
                    }
                }
                return Err(self.csv_error(e));
            }
        };

        let headers = rdr.headers().map_err(|e| self.csv_error(e))?;
        if headers.is_empty() {
            log::debug!("Movie file {} is empty", self.path.display());
            return Ok(Movies::new());
        }

        let mut movies = Movies::new();
        for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
            match row {
                Ok(row) => {
                    let movie = row.into_movie();
                    movies.insert(movie.title.clone(), movie);
                }
                Err(e) => log::warn!(
                    "Skipping malformed row {} in {}: {}",
                    line + 2,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(movies)
    }

    fn save(&self, movies: &Movies) -> Result<(), StorageError> {
        ensure_parent_dir(&self.path)?;

        let mut wrt = Writer::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        wrt.write_record(Movie::csv_titles())
            .map_err(|e| self.csv_error(e))?;
        for movie in movies.values() {
            wrt.write_record(movie.to_csvable_array())
                .map_err(|e| self.csv_error(e))?;
        }

        wrt.flush().map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
