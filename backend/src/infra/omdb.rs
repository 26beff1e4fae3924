use crate::core::models::{MediaType, MovieDetail, MovieSummary, PlotLength};
use crate::core::search::{
    LookupOutcome, MovieCatalog, OmdbError, SearchOptions, SearchOutcome, ADVANCED_SEARCH_FAILED,
    DETAILS_FAILED, EMPTY_SEARCH_TERM, LOOKUP_FAILED, MISSING_API_KEY, NO_RESULTS, SEARCH_FAILED,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
const USER_AGENT: &str = "cinesearch/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const INVALID_API_KEY: &str = "Invalid API key!";

// ── Response types ───────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchPage {
    #[serde(rename = "Search", default)]
    search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default)]
    total_results: Value,
}

// ── Client ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct OmdbClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OmdbClient {
    /// A blank key is treated as no key at all; the client then answers
    /// every call with the missing-key message and never touches the network.
    pub fn new(config: OmdbConfig) -> Result<Self, OmdbError> {
        let api_key = config
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OmdbError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Probes the service with a throwaway search. Any answer other than
    /// OMDb's explicit invalid-key error counts as a working key.
    pub fn validate_api_key(&self) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return false;
        };

        match self.fetch(api_key, &[("s", "test".to_string())]) {
            Ok(body) => match body.get("Response").and_then(Value::as_str) {
                Some("True") => true,
                Some("False") => {
                    body.get("Error").and_then(Value::as_str) != Some(INVALID_API_KEY)
                }
                _ => false,
            },
            Err(e) => {
                warn!("Error validating API key: {e}");
                false
            }
        }
    }

    fn fetch(&self, api_key: &str, params: &[(&str, String)]) -> Result<Value, OmdbError> {
        debug!(?params, "OMDb request");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", api_key)])
            .query(params)
            .send()
            .map_err(|e| OmdbError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| OmdbError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| OmdbError::Parse(e.to_string()));
        }

        // OMDb reports its own errors as JSON even on 4xx (a bad key comes
        // back as 401). Anything else with a failing status is a transport error.
        match serde_json::from_str::<Value>(&body) {
            Ok(value) if value.get("Response").is_some() => Ok(value),
            _ => Err(OmdbError::Status(status.as_u16())),
        }
    }
}

impl MovieCatalog for OmdbClient {
    fn search_movies(
        &self,
        term: &str,
        page: u32,
        media_type: MediaType,
        year: Option<&str>,
    ) -> SearchOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Search attempted without an OMDb API key");
            return SearchOutcome::failed(MISSING_API_KEY);
        };
        if term.trim().is_empty() {
            return SearchOutcome::failed(EMPTY_SEARCH_TERM);
        }

        let mut params = vec![("s", term.to_string()), ("page", page.max(1).to_string())];
        if let Some(t) = media_type.as_query() {
            params.push(("type", t.to_string()));
        }
        if let Some(y) = non_blank(year) {
            params.push(("y", y.to_string()));
        }

        match self.fetch(api_key, &params).and_then(decode_search) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error searching movies: {e}");
                SearchOutcome::failed(SEARCH_FAILED)
            }
        }
    }

    fn get_movie_details(&self, id: &str, plot: PlotLength) -> MovieDetail {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Detail lookup attempted without an OMDb API key");
            return MovieDetail::unavailable(MISSING_API_KEY);
        };

        let params = [("i", id.to_string()), ("plot", plot.as_query().to_string())];
        match self.fetch(api_key, &params).and_then(decode_detail) {
            Ok(detail) => detail,
            Err(e) => {
                error!("Error fetching movie details: {e}");
                MovieDetail::unavailable(DETAILS_FAILED)
            }
        }
    }

    fn advanced_search(&self, options: &SearchOptions) -> LookupOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return LookupOutcome::failed(MISSING_API_KEY);
        };

        let mut params = Vec::new();
        if let Some(title) = non_blank(options.title.as_deref()) {
            params.push(("s", title.to_string()));
        }
        if let Some(id) = non_blank(options.imdb_id.as_deref()) {
            params.push(("i", id.to_string()));
        }
        if let Some(t) = options.media_type.and_then(|t| t.as_query()) {
            params.push(("type", t.to_string()));
        }
        if let Some(y) = non_blank(options.year.as_deref()) {
            params.push(("y", y.to_string()));
        }
        if let Some(plot) = options.plot {
            params.push(("plot", plot.as_query().to_string()));
        }
        if let Some(page) = options.page {
            params.push(("page", page.to_string()));
        }

        match self.fetch(api_key, &params).and_then(decode_lookup) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error in advanced search: {e}");
                LookupOutcome::failed(ADVANCED_SEARCH_FAILED)
            }
        }
    }

    fn search_by_title_and_year(&self, title: &str, year: Option<&str>) -> LookupOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            return LookupOutcome::failed(MISSING_API_KEY);
        };
        if title.trim().is_empty() {
            return LookupOutcome::failed(EMPTY_SEARCH_TERM);
        }

        let mut params = vec![("t", title.to_string())];
        if let Some(y) = non_blank(year) {
            params.push(("y", y.to_string()));
        }

        match self.fetch(api_key, &params).and_then(decode_lookup) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error searching by title and year: {e}");
                LookupOutcome::failed(LOOKUP_FAILED)
            }
        }
    }
}

// ── Decoding ─────────────────────────────────────────────────────

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `Some(message)` when OMDb answered `"Response": "False"`.
fn upstream_error(body: &Value) -> Option<String> {
    let response = body.get("Response").and_then(Value::as_str)?;
    if response.eq_ignore_ascii_case("true") {
        return None;
    }
    let message = body
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or(NO_RESULTS);
    warn!("OMDb reported an error: {message}");
    Some(message.to_string())
}

fn decode_search(body: Value) -> Result<SearchOutcome, OmdbError> {
    if let Some(message) = upstream_error(&body) {
        return Ok(SearchOutcome::failed(message));
    }

    let page: SearchPage =
        serde_json::from_value(body).map_err(|e| OmdbError::Parse(e.to_string()))?;
    if page.search.is_empty() {
        return Ok(SearchOutcome::failed(NO_RESULTS));
    }

    // totalResults is a string upstream; fall back to the page size when it
    // is missing or not a number.
    let total_results = match &page.total_results {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
    .unwrap_or(page.search.len() as u32);

    Ok(SearchOutcome::Found {
        movies: page.search,
        total_results,
    })
}

fn decode_detail(body: Value) -> Result<MovieDetail, OmdbError> {
    if let Some(message) = upstream_error(&body) {
        return Ok(MovieDetail::unavailable(message));
    }
    let confirmed = body
        .get("Response")
        .and_then(Value::as_str)
        .is_some_and(|r| r.eq_ignore_ascii_case("true"));
    if !confirmed {
        return Err(OmdbError::Parse("reply is not a movie record".to_string()));
    }

    let detail: MovieDetail =
        serde_json::from_value(body).map_err(|e| OmdbError::Parse(e.to_string()))?;
    if !detail.is_available() {
        return Err(OmdbError::Parse("movie record has no imdbID".to_string()));
    }
    Ok(detail)
}

fn decode_lookup(body: Value) -> Result<LookupOutcome, OmdbError> {
    if let Some(message) = upstream_error(&body) {
        return Ok(LookupOutcome::failed(message));
    }
    if body.get("Search").is_some() {
        decode_search(body).map(LookupOutcome::Search)
    } else {
        decode_detail(body).map(LookupOutcome::Detail)
    }
}
