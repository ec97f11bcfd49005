//! Core domain types for the two movie catalogs.
//!
//! The content catalog (TMDB-style metadata + credits) backs the
//! content-similarity and genre-ranking indexes; the ratings catalog
//! (MovieLens-style ratings + titles + links) backs the collaborative
//! index. Both are built once at load time and immutable afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up the three id spaces.

/// External (TMDB) movie identifier — the cross-catalog join key
pub type MovieId = u32;

/// MovieLens-local movie identifier, only meaningful inside the ratings catalog
pub type MlMovieId = u32;

/// Identifier for a rating user
pub type UserId = u32;

// =============================================================================
// Content catalog
// =============================================================================

/// One title in the content catalog.
///
/// Constructed once from the joined metadata + credits tables and never
/// mutated. `tags` is the per-movie free-text document fed to the
/// content vectorizer; it is always defined (empty string when the
/// source had no text at all).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    /// Original title — the key used for content-query title matching
    pub title: String,
    /// Lower-cased bag-of-words signal: overview + collapsed
    /// genre/keyword/cast/director tokens
    pub tags: String,
    /// Plain genre names, in source order (the `genres_names` view —
    /// genre matching never re-parses the serialized column)
    pub genres: Vec<String>,
    pub popularity: f32,
    /// Average vote on the 0–10 scale
    pub vote_average: f32,
    pub vote_count: u32,
    pub release_date: Option<NaiveDate>,
    pub overview: String,
}

/// Counters for defaulted/skipped fields during a content load.
///
/// Malformed nested columns never abort the load; they resolve to empty
/// lists and are tallied here so a load is observable rather than
/// silently lossy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    pub malformed_genres: u32,
    pub malformed_keywords: u32,
    pub malformed_cast: u32,
    pub malformed_crew: u32,
    pub missing_overviews: u32,
    /// Metadata rows dropped because no credits row shared their id
    pub unmatched_credits: u32,
}

impl LoadDiagnostics {
    /// Total number of defaulted nested fields
    pub fn malformed_total(&self) -> u32 {
        self.malformed_genres + self.malformed_keywords + self.malformed_cast + self.malformed_crew
    }
}

/// The in-memory content catalog: records in load order plus the
/// lookup maps that make every query-time lookup O(1).
///
/// Row position is the handle shared with the document-term and
/// similarity matrices; the maps below are the explicit id-keyed and
/// title-keyed joins onto that handle, built once here so no caller
/// ever depends on implicit ordering or rescans the table.
#[derive(Debug)]
pub struct ContentCatalog {
    records: Vec<MovieRecord>,
    /// TMDB id -> row position
    id_to_row: HashMap<MovieId, usize>,
    /// Lower-cased title -> row position (first occurrence wins)
    title_to_row: HashMap<String, usize>,
    diagnostics: LoadDiagnostics,
}

impl ContentCatalog {
    /// Build a catalog from already-normalized records.
    ///
    /// Load-time entry point and the test seam: tests construct small
    /// catalogs directly instead of going through CSV files.
    pub fn from_records(records: Vec<MovieRecord>, diagnostics: LoadDiagnostics) -> Self {
        let mut id_to_row = HashMap::with_capacity(records.len());
        let mut title_to_row = HashMap::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            id_to_row.entry(record.id).or_insert(row);
            title_to_row
                .entry(record.title.to_lowercase())
                .or_insert(row);
        }
        Self {
            records,
            id_to_row,
            title_to_row,
            diagnostics,
        }
    }

    /// Record at a given row position
    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.records.get(row)
    }

    /// Record by TMDB identifier
    pub fn get_by_id(&self, id: MovieId) -> Option<&MovieRecord> {
        self.id_to_row.get(&id).map(|&row| &self.records[row])
    }

    /// Row position for a TMDB identifier
    pub fn row_of_id(&self, id: MovieId) -> Option<usize> {
        self.id_to_row.get(&id).copied()
    }

    /// Row position for a title, matched case-insensitively and exactly.
    ///
    /// When several records share a lower-cased title the first catalog
    /// occurrence wins.
    pub fn row_of_title(&self, title: &str) -> Option<usize> {
        self.title_to_row.get(&title.to_lowercase()).copied()
    }

    /// All records in catalog (load) order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Defaulted-field counters from the load that built this catalog
    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.diagnostics
    }
}

// =============================================================================
// Ratings catalog
// =============================================================================

/// One retained rating: user x stripped title x rating value.
///
/// Entries whose title had no resolvable TMDB link are dropped at load
/// time and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub user_id: UserId,
    pub title: String,
    pub rating: f32,
}

/// The in-memory ratings catalog: retained entries plus the link maps
/// the collaborative resolution chain walks.
///
/// Titles are stripped of surrounding whitespace before they are stored
/// or compared, everywhere.
#[derive(Debug, Default)]
pub struct RatingsCatalog {
    entries: Vec<RatingEntry>,
    /// Stripped title -> MovieLens id (first match in table order)
    title_to_ml_id: HashMap<String, MlMovieId>,
    /// MovieLens id -> TMDB id, for titles that have a link
    ml_to_tmdb: HashMap<MlMovieId, MovieId>,
    /// Rating rows dropped because their title had no TMDB link
    dropped_unlinked: u32,
}

impl RatingsCatalog {
    pub fn new(
        entries: Vec<RatingEntry>,
        title_to_ml_id: HashMap<String, MlMovieId>,
        ml_to_tmdb: HashMap<MlMovieId, MovieId>,
        dropped_unlinked: u32,
    ) -> Self {
        Self {
            entries,
            title_to_ml_id,
            ml_to_tmdb,
            dropped_unlinked,
        }
    }

    /// Retained rating entries in source order
    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    /// MovieLens id for a stripped title
    pub fn ml_id_of_title(&self, title: &str) -> Option<MlMovieId> {
        self.title_to_ml_id.get(title.trim()).copied()
    }

    /// TMDB id for a MovieLens id
    pub fn tmdb_of_ml_id(&self, ml_id: MlMovieId) -> Option<MovieId> {
        self.ml_to_tmdb.get(&ml_id).copied()
    }

    /// Number of rating rows dropped for lack of a TMDB link
    pub fn dropped_unlinked(&self) -> u32 {
        self.dropped_unlinked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            tags: String::new(),
            genres: vec![],
            popularity: 0.0,
            vote_average: 0.0,
            vote_count: 0,
            release_date: None,
            overview: String::new(),
        }
    }

    #[test]
    fn title_lookup_is_case_insensitive() {
        let catalog = ContentCatalog::from_records(
            vec![record(10, "Inception"), record(11, "Avatar")],
            LoadDiagnostics::default(),
        );

        assert_eq!(catalog.row_of_title("inception"), Some(0));
        assert_eq!(catalog.row_of_title("INCEPTION"), Some(0));
        assert_eq!(catalog.row_of_title("Avatar"), Some(1));
        assert_eq!(catalog.row_of_title("Missing"), None);
    }

    #[test]
    fn duplicate_titles_keep_first_occurrence() {
        let catalog = ContentCatalog::from_records(
            vec![record(1, "Remake"), record(2, "Remake")],
            LoadDiagnostics::default(),
        );

        assert_eq!(catalog.row_of_title("remake"), Some(0));
        assert_eq!(catalog.get_by_id(2).map(|m| m.title.as_str()), Some("Remake"));
    }

    #[test]
    fn ratings_catalog_strips_titles_on_lookup() {
        let mut title_to_ml_id = HashMap::new();
        title_to_ml_id.insert("Toy Story (1995)".to_string(), 1);
        let mut ml_to_tmdb = HashMap::new();
        ml_to_tmdb.insert(1, 862);

        let catalog = RatingsCatalog::new(vec![], title_to_ml_id, ml_to_tmdb, 0);

        assert_eq!(catalog.ml_id_of_title("  Toy Story (1995)  "), Some(1));
        assert_eq!(catalog.tmdb_of_ml_id(1), Some(862));
        assert_eq!(catalog.tmdb_of_ml_id(99), None);
    }
}
