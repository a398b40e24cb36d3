use indexmap::IndexMap;

/// Movies keyed by title, in the order they were read from storage.
pub type Movies = IndexMap<String, Movie>;

#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

impl Movie {
    pub fn new(title: &str, year: i32, rating: f64, poster: Option<&str>) -> Self {
        Movie {
            title: title.to_string(),
            year,
            rating,
            poster: poster.unwrap_or_default().to_string(),
        }
    }

    pub fn to_csvable_array(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.year.to_string(),
            self.rating.to_string(),
            self.poster.clone(),
        ]
    }

    pub fn csv_titles() -> Vec<&'static str> {
        vec!["title", "year", "rating", "poster"]
    }

    pub fn display_rating(&self) -> String {
        format_rating(self.rating)
    }
}

/// Whole ratings keep one decimal so `9` prints as `9.0`.
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() && rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_poster_defaults_to_empty() {
        let movie = Movie::new("Matrix", 1999, 8.7, None);
        assert_eq!(movie.poster, "");
    }

    #[test]
    fn csv_array_follows_header_order() {
        let movie = Movie::new("Matrix", 1999, 8.7, Some("http://img/matrix.jpg"));
        assert_eq!(
            movie.to_csvable_array(),
            vec!["Matrix", "1999", "8.7", "http://img/matrix.jpg"]
        );
        assert_eq!(Movie::csv_titles().len(), movie.to_csvable_array().len());
    }

    #[test]
    fn ratings_always_show_a_decimal() {
        assert_eq!(format_rating(9.0), "9.0");
        assert_eq!(format_rating(8.7), "8.7");
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(7.25), "7.25");
    }
}
