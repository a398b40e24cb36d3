//! Read-only views computed over a loaded collection.

use rand::seq::SliceRandom;

use crate::model::movie::{Movie, Movies};

#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub mean: f64,
    pub median: f64,
    pub best: Option<Movie>,
    pub worst: Option<Movie>,
}

/// Stored key of the movie whose title equals `query`, ignoring case.
pub fn find_title<'a>(movies: &'a Movies, query: &str) -> Option<&'a str> {
    let query = query.trim().to_lowercase();
    movies
        .keys()
        .find(|title| title.to_lowercase() == query)
        .map(String::as_str)
}

pub fn stats(movies: &Movies) -> RatingStats {
    let mut ratings: Vec<f64> = movies.values().map(|m| m.rating).collect();
    if ratings.is_empty() {
        return RatingStats {
            mean: 0.0,
            median: 0.0,
            best: None,
            worst: None,
        };
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;

    ratings.sort_by(f64::total_cmp);
    let mid = ratings.len() / 2;
    let median = if ratings.len() % 2 == 0 {
        (ratings[mid - 1] + ratings[mid]) / 2.0
    } else {
        ratings[mid]
    };

    // Strict comparisons keep the first movie seen on ties.
    let mut best: Option<&Movie> = None;
    let mut worst: Option<&Movie> = None;
    for movie in movies.values() {
        if best.map_or(true, |b| movie.rating > b.rating) {
            best = Some(movie);
        }
        if worst.map_or(true, |w| movie.rating < w.rating) {
            worst = Some(movie);
        }
    }

    RatingStats {
        mean,
        median,
        best: best.cloned(),
        worst: worst.cloned(),
    }
}

/// Movies whose title contains `keyword`, ignoring case, in collection order.
pub fn search<'a>(movies: &'a Movies, keyword: &str) -> Vec<&'a Movie> {
    let keyword = keyword.trim().to_lowercase();
    movies
        .values()
        .filter(|movie| movie.title.to_lowercase().contains(&keyword))
        .collect()
}

/// Highest rated first. Equal ratings keep collection order.
pub fn sorted_by_rating(movies: &Movies) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.values().collect();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

pub fn pick_random(movies: &Movies) -> Option<&Movie> {
    let titles: Vec<&String> = movies.keys().collect();
    let title = titles.choose(&mut rand::thread_rng())?;
    movies.get(title.as_str())
}
