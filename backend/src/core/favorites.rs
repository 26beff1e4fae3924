use crate::core::models::MovieSummary;
use crate::core::storage::{KeyValueStore, StorageError};
use tracing::{debug, warn};

/// Slot holding the JSON array of saved movies.
pub const FAVORITES_STORAGE_KEY: &str = "movieSearchApp_favorites";

/// The user's saved movies, unique by id, in insertion order.
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Never fails: a missing or unreadable slot reads as an empty list.
    pub fn get_favorites(&self) -> Vec<MovieSummary> {
        let raw = match self.storage.get_item(FAVORITES_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!("Discarding unreadable favorites slot: {e}");
                Vec::new()
            }
        }
    }

    pub fn add_favorite(&self, movie: &MovieSummary) -> Result<(), StorageError> {
        let mut favorites = self.get_favorites();
        if favorites.iter().any(|fav| fav.id == movie.id) {
            return Ok(());
        }
        favorites.push(movie.clone());
        self.save(&favorites)?;
        debug!(id = %movie.id, "Added favorite");
        Ok(())
    }

    pub fn remove_favorite(&self, id: &str) -> Result<(), StorageError> {
        let mut favorites = self.get_favorites();
        let before = favorites.len();
        favorites.retain(|fav| fav.id != id);
        if favorites.len() == before {
            return Ok(());
        }
        self.save(&favorites)?;
        debug!(id, "Removed favorite");
        Ok(())
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.get_favorites().iter().any(|fav| fav.id == id)
    }

    /// Flips membership and returns whether the movie is now a favorite.
    pub fn toggle_favorite(&self, movie: &MovieSummary) -> Result<bool, StorageError> {
        if self.is_favorite(&movie.id) {
            self.remove_favorite(&movie.id)?;
            Ok(false)
        } else {
            self.add_favorite(movie)?;
            Ok(true)
        }
    }

    fn save(&self, favorites: &[MovieSummary]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(favorites)?;
        self.storage.set_item(FAVORITES_STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::memory::MemoryStorage;

    fn movie(id: &str) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: format!("Title {id}"),
            year: "2010".to_string(),
            media_type: "movie".to_string(),
            poster_url: format!("https://img.example/{id}.jpg"),
        }
    }

    fn store() -> FavoritesStore<MemoryStorage> {
        FavoritesStore::new(MemoryStorage::default())
    }

    #[test]
    fn empty_store_has_no_favorites() {
        let store = store();
        assert!(store.get_favorites().is_empty());
        assert!(!store.is_favorite("tt1"));
    }

    #[test]
    fn add_is_idempotent() {
        let store = store();
        let m = movie("tt1375666");
        store.add_favorite(&m).unwrap();
        store.add_favorite(&m).unwrap();

        let favorites = store.get_favorites();
        assert_eq!(favorites.iter().filter(|f| f.id == m.id).count(), 1);
        assert_eq!(store.storage.write_count(), 1);
    }

    #[test]
    fn add_round_trips_every_field() {
        let store = store();
        let m = MovieSummary {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            media_type: "movie".to_string(),
            poster_url: "N/A".to_string(),
        };
        store.add_favorite(&m).unwrap();
        assert_eq!(store.get_favorites(), vec![m]);
    }

    #[test]
    fn remove_on_empty_store_is_noop() {
        let store = store();
        store.remove_favorite("tt1").unwrap();
        assert!(store.get_favorites().is_empty());
        assert_eq!(store.storage.write_count(), 0);
    }

    #[test]
    fn is_favorite_tracks_latest_operation() {
        let store = store();
        let m = movie("tt2");
        store.add_favorite(&m).unwrap();
        assert!(store.is_favorite("tt2"));
        store.remove_favorite("tt2").unwrap();
        assert!(!store.is_favorite("tt2"));
    }

    #[test]
    fn insertion_order_is_kept() {
        let store = store();
        for id in ["tt3", "tt1", "tt2"] {
            store.add_favorite(&movie(id)).unwrap();
        }
        store.remove_favorite("tt1").unwrap();
        let ids: Vec<String> = store.get_favorites().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["tt3", "tt2"]);
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let storage = MemoryStorage::default();
        let dupes = serde_json::to_string(&vec![movie("tt9"), movie("tt8"), movie("tt9")]).unwrap();
        storage.set_item(FAVORITES_STORAGE_KEY, &dupes).unwrap();
        let store = FavoritesStore::new(storage);

        store.remove_favorite("tt9").unwrap();
        let ids: Vec<String> = store.get_favorites().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["tt8"]);
    }

    #[test]
    fn corrupted_slot_reads_as_empty_and_recovers() {
        let storage = MemoryStorage::default();
        storage.set_item(FAVORITES_STORAGE_KEY, "{not json").unwrap();
        let store = FavoritesStore::new(storage);

        assert!(store.get_favorites().is_empty());
        store.add_favorite(&movie("tt5")).unwrap();
        assert_eq!(store.get_favorites().len(), 1);
    }

    #[test]
    fn toggle_flips_membership() {
        let store = store();
        let m = movie("tt7");
        assert!(store.toggle_favorite(&m).unwrap());
        assert!(store.is_favorite("tt7"));
        assert!(!store.toggle_favorite(&m).unwrap());
        assert!(!store.is_favorite("tt7"));
    }

    #[test]
    fn mixed_sequence_never_duplicates() {
        let store = store();
        let ops = ["a1", "b2", "a1", "c3", "b2", "a1", "c3", "c3"];
        for (i, id) in ops.iter().enumerate() {
            if i % 3 == 2 {
                store.remove_favorite(id).unwrap();
            } else {
                store.add_favorite(&movie(id)).unwrap();
            }
        }
        let mut ids: Vec<String> = store.get_favorites().into_iter().map(|m| m.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
