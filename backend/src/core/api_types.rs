use serde::{Deserialize, Serialize};

use crate::core::models::{MovieDetail, MovieSummary, Rating, NOT_AVAILABLE};
use crate::core::search::{LookupOutcome, SearchOutcome};

/// Flat JSON representation for the REST API.
/// This is what the frontend sends and receives.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiMovie {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

// ── MovieSummary ↔ ApiMovie ──────────────────────────────────

impl ApiMovie {
    pub fn from_summary(movie: &MovieSummary, favorite: bool) -> Self {
        ApiMovie {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            media_type: movie.media_type.clone(),
            poster_url: movie.poster().map(str::to_string),
            favorite,
        }
    }

    pub fn into_summary(self) -> Result<MovieSummary, String> {
        if self.id.trim().is_empty() {
            return Err("Movie id is required".to_string());
        }
        Ok(MovieSummary {
            id: self.id,
            title: self.title,
            year: self.year,
            media_type: self.media_type,
            poster_url: self.poster_url.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
    }
}

// ── Search ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResponse {
    pub success: bool,
    pub movies: Vec<ApiMovie>,
    pub total_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiSearchResponse {
    pub fn from_outcome(outcome: &SearchOutcome, is_favorite: impl Fn(&str) -> bool) -> Self {
        ApiSearchResponse {
            success: outcome.is_success(),
            movies: outcome
                .movies()
                .iter()
                .map(|m| ApiMovie::from_summary(m, is_favorite(&m.id)))
                .collect(),
            total_results: outcome.total_results(),
            error: outcome.error().map(str::to_string),
        }
    }
}

// ── Detail ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMovieDetail {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub movie: ApiMovie,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub ratings: Vec<ApiRating>,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiRating {
    pub source: String,
    pub value: String,
}

impl From<&Rating> for ApiRating {
    fn from(r: &Rating) -> Self {
        ApiRating {
            source: r.source.clone(),
            value: r.value.clone(),
        }
    }
}

impl ApiMovieDetail {
    pub fn from_detail(detail: &MovieDetail, favorite: bool) -> Self {
        let success = detail.is_available();
        ApiMovieDetail {
            success,
            error: (!success).then(|| detail.plot.clone()),
            movie: ApiMovie::from_summary(&detail.summary, favorite),
            rated: detail.rated.clone(),
            released: detail.released.clone(),
            runtime: detail.runtime.clone(),
            genre: detail.genre.clone(),
            director: detail.director.clone(),
            writer: detail.writer.clone(),
            actors: detail.actors.clone(),
            plot: detail.plot.clone(),
            language: detail.language.clone(),
            country: detail.country.clone(),
            awards: detail.awards.clone(),
            ratings: detail.ratings.iter().map(ApiRating::from).collect(),
            metascore: detail.metascore.clone(),
            imdb_rating: detail.imdb_rating.clone(),
            imdb_votes: detail.imdb_votes.clone(),
            dvd: detail.dvd.clone(),
            box_office: detail.box_office.clone(),
            production: detail.production.clone(),
            website: detail.website.clone(),
        }
    }
}

// ── Lookup (search page or single record) ────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ApiLookupResponse {
    Search(ApiSearchResponse),
    Detail(Box<ApiMovieDetail>),
}

impl ApiLookupResponse {
    pub fn from_outcome(outcome: &LookupOutcome, is_favorite: impl Fn(&str) -> bool) -> Self {
        match outcome {
            LookupOutcome::Search(s) => {
                ApiLookupResponse::Search(ApiSearchResponse::from_outcome(s, is_favorite))
            }
            LookupOutcome::Detail(d) => {
                let favorite = is_favorite(&d.summary.id);
                ApiLookupResponse::Detail(Box::new(ApiMovieDetail::from_detail(d, favorite)))
            }
        }
    }
}

// ── Favorites ────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiFavoriteStatus {
    pub id: String,
    pub favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(poster: &str) -> MovieSummary {
        MovieSummary {
            id: "tt0111161".to_string(),
            title: "The Shawshank Redemption".to_string(),
            year: "1994".to_string(),
            media_type: "movie".to_string(),
            poster_url: poster.to_string(),
        }
    }

    #[test]
    fn missing_poster_becomes_null_and_back() {
        let api = ApiMovie::from_summary(&summary("N/A"), true);
        assert_eq!(api.poster_url, None);
        assert!(api.favorite);

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["posterUrl"], serde_json::Value::Null);
        assert_eq!(json["mediaType"], "movie");

        assert_eq!(api.into_summary().unwrap(), summary("N/A"));
    }

    #[test]
    fn blank_id_is_rejected() {
        let api = ApiMovie {
            id: " ".to_string(),
            title: "x".to_string(),
            year: String::new(),
            media_type: String::new(),
            poster_url: None,
            favorite: false,
        };
        assert!(api.into_summary().is_err());
    }

    #[test]
    fn failed_search_serializes_error() {
        let resp = ApiSearchResponse::from_outcome(&SearchOutcome::failed("Movie not found!"), |_| false);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Movie not found!");
        assert_eq!(json["totalResults"], 0);
    }

    #[test]
    fn found_search_marks_favorites() {
        let outcome = SearchOutcome::Found {
            movies: vec![summary("https://img.example/s.jpg")],
            total_results: 41,
        };
        let resp = ApiSearchResponse::from_outcome(&outcome, |id| id == "tt0111161");
        assert!(resp.success);
        assert_eq!(resp.total_results, 41);
        assert!(resp.movies[0].favorite);
        assert_eq!(resp.movies[0].poster_url.as_deref(), Some("https://img.example/s.jpg"));
    }

    #[test]
    fn unavailable_detail_reports_message() {
        let resp = ApiMovieDetail::from_detail(&MovieDetail::unavailable("Incorrect IMDb ID."), false);
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Incorrect IMDb ID."));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], "");
        assert_eq!(json["boxOffice"], "");
    }

    #[test]
    fn lookup_is_tagged_by_kind() {
        let outcome = LookupOutcome::Detail(MovieDetail {
            summary: summary("N/A"),
            ..MovieDetail::default()
        });
        let json = serde_json::to_value(ApiLookupResponse::from_outcome(&outcome, |_| true)).unwrap();
        assert_eq!(json["kind"], "detail");
        assert_eq!(json["favorite"], true);
    }
}
