//! Interactive menu and the command handlers behind it.
//!
//! Each command reloads the collection from storage, so commands never share
//! state beyond the backing file. Failures are reported on the console and
//! control returns to the menu; only console I/O errors end the loop.

use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use crate::{
    analysis,
    clients::omdb_client::{MovieDetails, MovieLookup},
    config::Config,
    console::Console,
    model::movie::format_rating,
    persisters::MovieStorage,
    renderers::{
        histogram::{normalize_output_path, HistogramRenderer, RatingHistogram, RATING_BUCKETS},
        website::{WebsiteError, WebsiteGenerator},
    },
};

const MENU: &str = "\nMenu:\n\
0. Exit\n\
1. List movies\n\
2. Add movie\n\
3. Delete movie\n\
4. Update movie\n\
5. Stats\n\
6. Random movie\n\
7. Search movie\n\
8. Movies sorted by rating\n\
9. Create rating histogram\n\
10. Generate website\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortedByRating,
    Histogram,
    Website,
}

impl Command {
    pub fn from_choice(choice: &str) -> Option<Self> {
        let command = match choice.trim().parse::<u8>().ok()? {
            0 => Command::Exit,
            1 => Command::List,
            2 => Command::Add,
            3 => Command::Delete,
            4 => Command::Update,
            5 => Command::Stats,
            6 => Command::Random,
            7 => Command::Search,
            8 => Command::SortedByRating,
            9 => Command::Histogram,
            10 => Command::Website,
            _ => return None,
        };
        Some(command)
    }
}

/// Parses a user supplied rating and checks it lies in `0..=10`.
pub fn parse_rating(input: &str) -> Result<f64, &'static str> {
    let rating = input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or("Invalid rating, expected a number")?;

    if !(0.0..=10.0).contains(&rating) {
        return Err("Rating must be between 0 and 10");
    }
    Ok(rating)
}

/// Reads one answer; end of input reads as an empty answer.
fn ask<R: BufRead, W: Write>(console: &mut Console<R, W>, message: &str) -> io::Result<String> {
    Ok(console.prompt(message)?.unwrap_or_default().trim().to_string())
}

pub struct MovieApp<L, H> {
    storage: Box<dyn MovieStorage>,
    lookup: L,
    renderer: H,
    website: WebsiteGenerator,
}

impl<L: MovieLookup, H: HistogramRenderer> MovieApp<L, H> {
    pub fn new(storage: Box<dyn MovieStorage>, lookup: L, renderer: H, config: &Config) -> Self {
        MovieApp {
            storage,
            lookup,
            renderer,
            website: WebsiteGenerator::new(&config.template_path, &config.website_path),
        }
    }

    /// Runs the menu until the user exits or the input ends.
    pub async fn run<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        loop {
            let command = match self.read_command(console)? {
                Some(Command::Exit) | None => break,
                Some(command) => command,
            };

            self.execute(command, console).await?;

            if console.prompt("\nPress enter to continue...")?.is_none() {
                break;
            }
        }

        console.say("Bye!")
    }

    /// Shows the menu until a valid choice is entered.
    fn read_command<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> io::Result<Option<Command>> {
        loop {
            console.say(MENU)?;
            let Some(choice) = console.prompt("Enter choice (0-10): ")? else {
                return Ok(None);
            };
            match Command::from_choice(&choice) {
                Some(command) => return Ok(Some(command)),
                None => console.say("\nPlease enter a valid choice!")?,
            }
        }
    }

    pub async fn execute<R: BufRead, W: Write>(
        &self,
        command: Command,
        console: &mut Console<R, W>,
    ) -> io::Result<()> {
        log::debug!("Running command {:?}", command);
        match command {
            Command::Exit => Ok(()),
            Command::List => self.list_movies(console),
            Command::Add => self.add_movie(console).await,
            Command::Delete => self.delete_movie(console),
            Command::Update => self.update_movie(console),
            Command::Stats => self.show_stats(console),
            Command::Random => self.random_movie(console),
            Command::Search => self.search_movies(console),
            Command::SortedByRating => self.movies_by_rating(console),
            Command::Histogram => self.rating_histogram(console),
            Command::Website => self.generate_website(console),
        }
    }

    fn list_movies<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let movies = self.storage.list_movies();
        console.say(format!("{} movies in total", movies.len()))?;
        for movie in movies.values() {
            console.say(format!(
                "{} ({}): {}",
                movie.title,
                movie.year,
                movie.display_rating()
            ))?;
        }
        Ok(())
    }

    async fn add_movie<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let title = ask(console, "Enter new movie name: ")?;
        if title.is_empty() {
            return console.say("Movie name cannot be empty");
        }

        let movies = self.storage.list_movies();
        if let Some(existing) = analysis::find_title(&movies, &title) {
            return console.say(format!("Movie {} already exists", existing));
        }

        let found = match self.lookup.lookup(&title).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Lookup for {} failed: {}", title, e);
                None
            }
        };

        let details = match found {
            Some(details) => {
                console.say(format!(
                    "Movie found: {} ({}), rated {}, poster: {}",
                    details.title,
                    details.year,
                    format_rating(details.rating),
                    if details.poster.is_empty() {
                        "none"
                    } else {
                        details.poster.as_str()
                    }
                ))?;
                let answer = ask(console, "Do you want to add this movie? (y/n): ")?;
                if answer.eq_ignore_ascii_case("y") {
                    Some(details)
                } else {
                    console.say("Enter the movie details manually.")?;
                    None
                }
            }
            None => {
                console.say("Movie not found online. Enter the movie details manually.")?;
                None
            }
        };

        let details = match details {
            Some(details) => {
                if let Some(existing) = analysis::find_title(&movies, &details.title) {
                    return console.say(format!("Movie {} already exists", existing));
                }
                details
            }
            None => {
                // Years are coerced like the storage layer does.
                let year = ask(console, "Enter movie year (4 digits): ")?
                    .parse::<i32>()
                    .unwrap_or(0);
                let answer = ask(console, "Enter movie rating between 0 and 10: ")?;
                let rating = match parse_rating(&answer) {
                    Ok(rating) => rating,
                    Err(message) => return console.say(message),
                };
                MovieDetails {
                    title,
                    year,
                    rating,
                    poster: String::new(),
                }
            }
        };

        let poster = Some(details.poster.as_str()).filter(|p| !p.is_empty());
        match self
            .storage
            .add_movie(&details.title, details.year, details.rating, poster)
        {
            Ok(()) => console.say(format!("Movie {} successfully added", details.title)),
            Err(e) => {
                log::error!("Could not add movie {}: {}", details.title, e);
                console.say(format!("Could not save movie {}: {}", details.title, e))
            }
        }
    }

    fn delete_movie<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let name = ask(console, "Which movie would you like to delete? ")?;
        if name.is_empty() {
            return console.say("Please enter a movie name");
        }

        let movies = self.storage.list_movies();
        let Some(title) = analysis::find_title(&movies, &name) else {
            return console.say(format!("Movie {} not found", name));
        };

        match self.storage.delete_movie(title) {
            Ok(()) => console.say(format!("Movie {} successfully deleted", title)),
            Err(e) => {
                log::error!("Could not delete movie {}: {}", title, e);
                console.say(format!("Could not delete movie {}: {}", title, e))
            }
        }
    }

    fn update_movie<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let name = ask(console, "Enter movie name: ")?;
        if name.is_empty() {
            return console.say("Please enter a movie name");
        }

        let movies = self.storage.list_movies();
        let Some(title) = analysis::find_title(&movies, &name) else {
            return console.say(format!("Movie {} not found", name));
        };

        let answer = ask(console, "Enter new movie rating between 0 and 10: ")?;
        let rating = match parse_rating(&answer) {
            Ok(rating) => rating,
            Err(message) => return console.say(message),
        };

        match self.storage.update_movie(title, rating) {
            Ok(()) => console.say(format!("Movie {} successfully updated", title)),
            Err(e) => {
                log::error!("Could not update movie {}: {}", title, e);
                console.say(format!("Could not update movie {}: {}", title, e))
            }
        }
    }

    fn show_stats<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let stats = analysis::stats(&self.storage.list_movies());

        console.say(format!("Average rating: {:.2}", stats.mean))?;
        console.say(format!("Median rating: {:.2}", stats.median))?;
        if let Some(best) = stats.best {
            console.say(format!("Best movie: {} ({})", best.title, best.display_rating()))?;
        }
        if let Some(worst) = stats.worst {
            console.say(format!("Worst movie: {} ({})", worst.title, worst.display_rating()))?;
        }
        Ok(())
    }

    fn random_movie<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let movies = self.storage.list_movies();
        match analysis::pick_random(&movies) {
            Some(movie) => console.say(format!(
                "Your movie for tonight: {}, it's rated {}",
                movie.title,
                movie.display_rating()
            )),
            None => console.say("No movies found."),
        }
    }

    fn search_movies<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let keyword = ask(console, "Enter a keyword: ")?;
        let movies = self.storage.list_movies();
        let found = analysis::search(&movies, &keyword);

        if found.is_empty() {
            return console.say("No movies found");
        }
        for movie in found {
            console.say(&movie.title)?;
        }
        Ok(())
    }

    fn movies_by_rating<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let movies = self.storage.list_movies();
        for movie in analysis::sorted_by_rating(&movies) {
            console.say(format!("{}: {}", movie.title, movie.display_rating()))?;
        }
        Ok(())
    }

    fn rating_histogram<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let file = ask(console, "Save histogram in file: ")?;
        if file.is_empty() {
            return console.say("Please enter a file name");
        }
        let file = normalize_output_path(&file);

        let ratings: Vec<f64> = self
            .storage
            .list_movies()
            .values()
            .map(|m| m.rating)
            .collect();
        let histogram = RatingHistogram::from_ratings(&ratings, RATING_BUCKETS);

        match self.renderer.render(&histogram, Path::new(&file)) {
            Ok(()) => console.say(format!("Histogram saved as {}", file)),
            Err(e) => {
                log::error!("{}", e);
                console.say(format!("Could not save histogram: {}", e))
            }
        }
    }

    fn generate_website<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> io::Result<()> {
        let movies = self.storage.list_movies();
        match self.website.generate(&movies) {
            Ok(path) => console.say(format!(
                "Website generated successfully: {}",
                path.display()
            )),
            Err(WebsiteError::TemplateNotFound(path)) => console.say(format!(
                "Template file not found. Ensure '{}' exists.",
                path.display()
            )),
            Err(e) => {
                log::error!("Website generation failed: {}", e);
                console.say(format!("An error occurred: {}", e))
            }
        }
    }
}
