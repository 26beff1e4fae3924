use crate::core::favorites::FavoritesStore;
use crate::core::input::{InputError, InputHandler, InputProvider};
use crate::core::models::{MediaType, MovieDetail, MovieSummary, PlotLength, NOT_AVAILABLE};
use crate::core::search::{self, MovieCatalog, SearchOutcome, FEATURED_TERM};
use crate::core::storage::KeyValueStore;
use tracing::error;

/// The search currently on screen, so "More results" can fetch the next page.
struct ActiveSearch {
    term: String,
    media_type: MediaType,
    year: Option<String>,
    page: u32,
    total_results: u32,
    results: Vec<MovieSummary>,
}

impl ActiveSearch {
    fn has_more(&self) -> bool {
        (self.results.len() as u32) < self.total_results
    }
}

pub struct App<S: KeyValueStore, I: InputProvider> {
    catalog: Box<dyn MovieCatalog>,
    favorites: FavoritesStore<S>,
    input: InputHandler<I>,
    current: Option<ActiveSearch>,
}

impl<S: KeyValueStore, I: InputProvider> App<S, I> {
    pub fn new(catalog: Box<dyn MovieCatalog>, storage: S, input_provider: I) -> Self {
        Self {
            catalog,
            favorites: FavoritesStore::new(storage),
            input: InputHandler::new(input_provider),
            current: None,
        }
    }

    #[cfg(test)]
    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn run(&mut self) {
        println!("== CINESEARCH ==");
        self.show_featured();

        loop {
            println!("\n[1] Search  [2] More results  [3] Details  [4] Favorites  [5] Toggle favorite  [6] Remove favorite  [7] Exit");
            let choice = match self.input.get_string_trimmed("Selection: ") {
                Ok(c) => c,
                Err(e) if e.is_eof() => break,
                Err(_) => continue,
            };

            let result = match choice.as_str() {
                "1" => self.search_flow(),
                "2" => self.more_results_flow(),
                "3" => self.details_flow(),
                "4" => {
                    self.list_favorites();
                    Ok(())
                }
                "5" => self.toggle_flow(),
                "6" => self.remove_flow(),
                "7" => break,
                _ => {
                    println!("Invalid selection, please try again.");
                    Ok(())
                }
            };

            if let Err(e) = result {
                if e.is_eof() {
                    break;
                }
                println!("Invalid input: {e}");
            }
        }
        println!("Goodbye!");
    }

    /// Failures are silent here; the menu still works without a starting list.
    fn show_featured(&mut self) {
        if let SearchOutcome::Found {
            movies,
            total_results,
        } = search::featured(self.catalog.as_ref())
        {
            println!("\nFeatured:");
            self.print_results(&movies, 0);
            self.current = Some(ActiveSearch {
                term: FEATURED_TERM.to_string(),
                media_type: MediaType::default(),
                year: None,
                page: 1,
                total_results,
                results: movies,
            });
        }
    }

    fn search_flow(&mut self) -> Result<(), InputError> {
        let term = self.input.get_string_trimmed("Search: ")?;
        let media_type = match self.input.get_optional("Type (movie/series/episode/any) [movie]: ")? {
            None => MediaType::default(),
            Some(t) => match t.parse::<MediaType>() {
                Ok(mt) => mt,
                Err(e) => {
                    println!("{e}");
                    return Ok(());
                }
            },
        };
        let year = self.input.get_optional("Year (leave empty for any): ")?;

        match self
            .catalog
            .search_movies(&term, 1, media_type, year.as_deref())
        {
            SearchOutcome::Found {
                movies,
                total_results,
            } => {
                println!("\n{total_results} result(s):");
                self.print_results(&movies, 0);
                self.current = Some(ActiveSearch {
                    term,
                    media_type,
                    year,
                    page: 1,
                    total_results,
                    results: movies,
                });
            }
            SearchOutcome::Failed { reason } => {
                println!("{reason}");
                self.current = None;
            }
        }
        Ok(())
    }

    fn more_results_flow(&mut self) -> Result<(), InputError> {
        let Some(active) = self.current.as_ref() else {
            println!("Search for something first.");
            return Ok(());
        };
        if !active.has_more() {
            println!("No more results.");
            return Ok(());
        }

        let next_page = active.page + 1;
        let outcome = self.catalog.search_movies(
            &active.term,
            next_page,
            active.media_type,
            active.year.as_deref(),
        );

        match outcome {
            SearchOutcome::Found { movies, .. } => {
                let offset = active.results.len();
                self.print_results(&movies, offset);
                if let Some(active) = self.current.as_mut() {
                    active.page = next_page;
                    active.results.extend(movies);
                }
            }
            SearchOutcome::Failed { reason } => println!("{reason}"),
        }
        Ok(())
    }

    fn details_flow(&mut self) -> Result<(), InputError> {
        let Some(movie_id) = self.pick_result_or_id("Item # or IMDb ID: ")? else {
            return Ok(());
        };

        let detail = self.catalog.get_movie_details(&movie_id, PlotLength::Full);
        if !detail.is_available() {
            println!("{}", detail.plot);
            return Ok(());
        }

        self.print_detail(&detail);

        let prompt = if self.favorites.is_favorite(&detail.summary.id) {
            "Remove from favorites? (y/N): "
        } else {
            "Add to favorites? (y/N): "
        };
        let confirm = self.input.get_string_trimmed(prompt)?;
        if confirm.eq_ignore_ascii_case("y") {
            self.toggle(&detail.summary());
        }
        Ok(())
    }

    fn toggle_flow(&mut self) -> Result<(), InputError> {
        let results_len = self.current.as_ref().map_or(0, |c| c.results.len());
        if results_len == 0 {
            println!("Search for something first.");
            return Ok(());
        }

        let idx: usize = self.input.parse_trimmed("Toggle item #: ")?;
        let movie = match self.current.as_ref().and_then(|c| c.results.get(idx.wrapping_sub(1))) {
            Some(m) => m.clone(),
            None => {
                println!("Invalid selection.");
                return Ok(());
            }
        };
        self.toggle(&movie);
        Ok(())
    }

    fn remove_flow(&mut self) -> Result<(), InputError> {
        let favorites = self.favorites.get_favorites();
        if favorites.is_empty() {
            println!("No favorites yet.");
            return Ok(());
        }
        self.list_favorites();

        let idx: usize = self.input.parse_trimmed("Remove favorite #: ")?;
        let Some(movie) = favorites.get(idx.wrapping_sub(1)) else {
            println!("Invalid selection.");
            return Ok(());
        };

        match self.favorites.remove_favorite(&movie.id) {
            Ok(()) => println!("Removed '{}' from favorites.", movie.title),
            Err(e) => error!("Failed to save favorites: {e}"),
        }
        Ok(())
    }

    fn toggle(&self, movie: &MovieSummary) {
        match self.favorites.toggle_favorite(movie) {
            Ok(true) => println!("Added '{}' to favorites ♥", movie.title),
            Ok(false) => println!("Removed '{}' from favorites.", movie.title),
            Err(e) => error!("Failed to save favorites: {e}"),
        }
    }

    /// Accepts either a 1-based index into the current results or a raw id.
    fn pick_result_or_id(&mut self, prompt: &str) -> Result<Option<String>, InputError> {
        let answer = self.input.get_string_trimmed(prompt)?;
        if answer.is_empty() {
            println!("Nothing selected.");
            return Ok(None);
        }

        if let Ok(idx) = answer.parse::<usize>() {
            let picked = self
                .current
                .as_ref()
                .and_then(|c| c.results.get(idx.wrapping_sub(1)))
                .map(|m| m.id.clone());
            if picked.is_none() {
                println!("Invalid selection.");
            }
            return Ok(picked);
        }
        Ok(Some(answer))
    }

    fn list_favorites(&self) {
        let favorites = self.favorites.get_favorites();
        if favorites.is_empty() {
            println!("No favorites yet.");
            return;
        }
        println!("\nFavorites:");
        for (i, movie) in favorites.iter().enumerate() {
            println!("{}", movie.display_line(i + 1));
        }
    }

    fn print_results(&self, movies: &[MovieSummary], offset: usize) {
        for (i, movie) in movies.iter().enumerate() {
            let heart = if self.favorites.is_favorite(&movie.id) { " ♥" } else { "" };
            println!("{}{heart}", movie.display_line(offset + i + 1));
        }
    }

    fn print_detail(&self, detail: &MovieDetail) {
        let s = &detail.summary;
        println!("\n--- {} ({}) ---", s.title, s.year);
        print_field("Rated", &detail.rated);
        print_field("Runtime", &detail.runtime);
        print_field("Genre", &detail.genre);
        print_field("Released", &detail.released);
        print_field("Director", &detail.director);
        print_field("Writer", &detail.writer);
        print_field("Actors", &detail.actors);
        print_field("IMDb", &detail.imdb_rating);
        for rating in &detail.ratings {
            print_field(&rating.source, &rating.value);
        }
        print_field("Awards", &detail.awards);
        print_field("Box office", &detail.box_office);
        if let Some(url) = s.poster() {
            print_field("Poster", url);
        }
        println!("\n  {}", detail.plot);
    }
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() && value != NOT_AVAILABLE {
        println!("  {label:<10} {value}");
    }
}
