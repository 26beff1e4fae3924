use crate::core::models::{MediaType, MovieDetail, MovieSummary, PlotLength};
use thiserror::Error;

pub const MISSING_API_KEY: &str = "No API key provided. Please add your OMDB API key.";
pub const EMPTY_SEARCH_TERM: &str = "Please enter a search term";
pub const NO_RESULTS: &str = "No results found";
pub const SEARCH_FAILED: &str = "Failed to fetch movies. Please try again later.";
pub const DETAILS_FAILED: &str = "Failed to fetch movie details. Please try again later.";
pub const ADVANCED_SEARCH_FAILED: &str = "Failed to perform search. Please try again later.";
pub const LOOKUP_FAILED: &str = "Failed to fetch movie. Please try again later.";

/// How many suggestions are offered while the user is still typing.
pub const MAX_SUGGESTIONS: usize = 5;

/// Popular term whose first page is shown before the user searches.
pub const FEATURED_TERM: &str = "marvel";

/// Transport-level failures. These never leave the client: they are logged
/// and replaced by one of the user-facing messages above.
#[derive(Error, Debug)]
pub enum OmdbError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        movies: Vec<MovieSummary>,
        total_results: u32,
    },
    Failed {
        reason: String,
    },
}

impl SearchOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        SearchOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            SearchOutcome::Found { movies, .. } => movies,
            SearchOutcome::Failed { .. } => &[],
        }
    }

    pub fn total_results(&self) -> u32 {
        match self {
            SearchOutcome::Found { total_results, .. } => *total_results,
            SearchOutcome::Failed { .. } => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found { .. } => None,
            SearchOutcome::Failed { reason } => Some(reason),
        }
    }
}

/// Answer of the parameterized lookups: depending on the filters OMDb
/// replies with either a result page or a single detail record.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Search(SearchOutcome),
    Detail(MovieDetail),
}

impl LookupOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        LookupOutcome::Search(SearchOutcome::failed(reason))
    }
}

/// Filters for [`MovieCatalog::advanced_search`]. Only the fields that are
/// set end up in the request.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub title: Option<String>,
    pub imdb_id: Option<String>,
    pub media_type: Option<MediaType>,
    pub year: Option<String>,
    pub plot: Option<PlotLength>,
    pub page: Option<u32>,
}

/// A source of movie metadata. Implementations report every failure as a
/// value; none of these calls can error or panic.
pub trait MovieCatalog: Send + Sync {
    fn search_movies(
        &self,
        term: &str,
        page: u32,
        media_type: MediaType,
        year: Option<&str>,
    ) -> SearchOutcome;

    fn get_movie_details(&self, id: &str, plot: PlotLength) -> MovieDetail;

    fn advanced_search(&self, options: &SearchOptions) -> LookupOutcome;

    fn search_by_title_and_year(&self, title: &str, year: Option<&str>) -> LookupOutcome;
}

/// Type-ahead suggestions: first-page matches for terms longer than two
/// characters, capped at [`MAX_SUGGESTIONS`].
pub fn suggestions(catalog: &dyn MovieCatalog, term: &str) -> Vec<MovieSummary> {
    if term.trim().chars().count() <= 2 {
        return Vec::new();
    }
    match catalog.search_movies(term, 1, MediaType::default(), None) {
        SearchOutcome::Found { mut movies, .. } => {
            movies.truncate(MAX_SUGGESTIONS);
            movies
        }
        SearchOutcome::Failed { .. } => Vec::new(),
    }
}

/// Starting list shown on launch: the first page for [`FEATURED_TERM`].
pub fn featured(catalog: &dyn MovieCatalog) -> SearchOutcome {
    catalog.search_movies(FEATURED_TERM, 1, MediaType::default(), None)
}
