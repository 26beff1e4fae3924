use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder OMDb uses for any field it has no value for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Short movie record, exactly as OMDb returns it inside a `Search` array.
/// The same shape is what gets persisted in the favorites slot.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(default)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Type")]
    pub media_type: String,
    #[serde(rename = "Poster")]
    pub poster_url: String,
}

impl MovieSummary {
    /// Poster URL, or `None` when OMDb has no artwork for this title.
    pub fn poster(&self) -> Option<&str> {
        match self.poster_url.as_str() {
            "" | NOT_AVAILABLE => None,
            url => Some(url),
        }
    }

    pub fn display_line(&self, idx: usize) -> String {
        format!("  {}. {} ({}) - {} [{}]", idx, self.title, self.year, self.media_type, self.id)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record returned by an `i=` (or `t=`) lookup.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(default)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Rated")]
    pub rated: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Writer")]
    pub writer: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Awards")]
    pub awards: String,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<Rating>,
    #[serde(rename = "Metascore")]
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "DVD")]
    pub dvd: String,
    #[serde(rename = "BoxOffice")]
    pub box_office: String,
    #[serde(rename = "Production")]
    pub production: String,
    #[serde(rename = "Website")]
    pub website: String,
}

impl MovieDetail {
    /// Sentinel record for a lookup that could not be served: every field
    /// is empty and the plot carries the message for the reader.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            plot: message.into(),
            ..Self::default()
        }
    }

    pub fn is_available(&self) -> bool {
        !self.summary.id.is_empty()
    }

    pub fn summary(&self) -> MovieSummary {
        self.summary.clone()
    }
}

/// `type=` filter accepted by OMDb. `Any` omits the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
    Any,
}

impl MediaType {
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            MediaType::Movie => Some("movie"),
            MediaType::Series => Some("series"),
            MediaType::Episode => Some("episode"),
            MediaType::Any => None,
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            "episode" => Ok(MediaType::Episode),
            "" | "any" | "all" => Ok(MediaType::Any),
            other => Err(format!("Unknown media type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotLength {
    Short,
    #[default]
    Full,
}

impl PlotLength {
    pub fn as_query(&self) -> &'static str {
        match self {
            PlotLength::Short => "short",
            PlotLength::Full => "full",
        }
    }
}

impl FromStr for PlotLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(PlotLength::Short),
            "full" => Ok(PlotLength::Full),
            other => Err(format!("Unknown plot length: {other}")),
        }
    }
}
