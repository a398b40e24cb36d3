use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::model::movie::Movies;

pub const TITLE_TOKEN: &str = "__TEMPLATE_TITLE__";
pub const GRID_TOKEN: &str = "__TEMPLATE_MOVIE_GRID__";
pub const SITE_TITLE: &str = "My Movie Collection";

#[derive(Error, Debug)]
pub enum WebsiteError {
    #[error("template file {0} not found")]
    TemplateNotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One `<li>` card per movie, in collection order.
pub fn movie_grid_html(movies: &Movies) -> String {
    let mut html = String::new();
    for movie in movies.values() {
        let title = escape_html(&movie.title);
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            r#"
        <li>
            <div class="movie">
                <img class="movie-poster" src="{poster}" alt="{title}" style="height: 200px;">
                <div class="movie-title">{title}</div>
                <div class="movie-year">Year: {year}</div>
                <div class="movie-rating">Rating: {rating}</div>
            </div>
        </li>"#,
            poster = escape_html(&movie.poster),
            title = title,
            year = movie.year,
            rating = movie.display_rating(),
        );
    }
    html
}

#[derive(Debug, Clone)]
pub struct WebsiteGenerator {
    template_path: PathBuf,
    output_path: PathBuf,
}

impl WebsiteGenerator {
    pub fn new(template_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        WebsiteGenerator {
            template_path: template_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Fills the template with the collection and writes the page.
    pub fn generate(&self, movies: &Movies) -> Result<&Path, WebsiteError> {
        let template = fs::read_to_string(&self.template_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                WebsiteError::TemplateNotFound(self.template_path.clone())
            } else {
                WebsiteError::Io {
                    path: self.template_path.clone(),
                    source,
                }
            }
        })?;

        let page = template
            .replace(TITLE_TOKEN, SITE_TITLE)
            .replace(GRID_TOKEN, &movie_grid_html(movies));

        fs::write(&self.output_path, page).map_err(|source| WebsiteError::Io {
            path: self.output_path.clone(),
            source,
        })?;

        log::info!(
            "Website with {} movies written to {}",
            movies.len(),
            self.output_path.display()
        );
        Ok(&self.output_path)
    }
}
