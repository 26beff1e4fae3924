use crate::infra::omdb::{OmdbConfig, DEFAULT_BASE_URL};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PORT: u16 = 3001;

/// Process settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub omdb: OmdbConfig,
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            omdb: OmdbConfig {
                api_key: non_empty("OMDB_API_KEY"),
                base_url: non_empty("OMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            },
            data_dir: non_empty("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
