//! Catalog construction from the raw tables.
//!
//! Content side: join metadata and credits on the shared id, normalize
//! the nested attribute columns, assemble the tag document per title,
//! and build the id/title lookup maps.
//!
//! Ratings side: inner-join ratings with titles, left-join the external
//! links, drop unlinked rows, strip titles, and retain the link maps
//! the collaborative resolution chain needs.

use crate::error::Result;
use crate::parser;
use crate::types::{
    ContentCatalog, LoadDiagnostics, MlMovieId, MovieId, MovieRecord, RatingEntry, RatingsCatalog,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

impl ContentCatalog {
    /// Load the content catalog from a directory holding the metadata
    /// and credits tables.
    ///
    /// Any failure here is fatal to the caller: without the content
    /// catalog no recommendation can be served.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let metadata_path = data_dir.join("tmdb_5000_movies.csv");
        let credits_path = data_dir.join("tmdb_5000_credits.csv");

        // The two tables are independent; parse them in parallel.
        let (metadata, credits) = rayon::join(
            || parser::parse_metadata(&metadata_path),
            || parser::parse_credits(&credits_path),
        );
        let metadata = metadata?;
        let credits = credits?;

        info!(
            metadata_rows = metadata.len(),
            credits_rows = credits.len(),
            "parsed content tables"
        );

        // Credits keyed by id for the join. First row wins on duplicates.
        let mut credits_by_id: HashMap<MovieId, parser::RawCreditsRow> =
            HashMap::with_capacity(credits.len());
        for row in credits {
            credits_by_id.entry(row.id).or_insert(row);
        }

        let mut diagnostics = LoadDiagnostics::default();
        let mut records = Vec::with_capacity(metadata.len());

        for row in metadata {
            // Inner join: a metadata row without credits is dropped.
            let Some(credit) = credits_by_id.get(&row.id) else {
                diagnostics.unmatched_credits += 1;
                continue;
            };

            let genres = parser::parse_name_list(row.genres.as_deref(), &mut diagnostics.malformed_genres);
            let keywords =
                parser::parse_name_list(row.keywords.as_deref(), &mut diagnostics.malformed_keywords);
            let cast = parser::parse_cast(credit.cast.as_deref(), &mut diagnostics.malformed_cast);
            let director =
                parser::parse_director(credit.crew.as_deref(), &mut diagnostics.malformed_crew);

            // Missing overview is an empty string, never a null marker.
            let overview = match row.overview {
                Some(text) => text,
                None => {
                    diagnostics.missing_overviews += 1;
                    String::new()
                }
            };

            let tags = parser::build_tags(&overview, &genres, &keywords, &cast, &director);

            records.push(MovieRecord {
                id: row.id,
                title: row.original_title,
                tags,
                genres,
                popularity: row.popularity.unwrap_or(0.0),
                vote_average: row.vote_average.unwrap_or(0.0),
                vote_count: row.vote_count.unwrap_or(0),
                release_date: parser::parse_release_date(row.release_date.as_deref()),
                overview,
            });
        }

        let catalog = Self::from_records(records, diagnostics);

        info!(titles = catalog.len(), "content catalog built");
        if diagnostics.malformed_total() > 0 || diagnostics.unmatched_credits > 0 {
            warn!(
                malformed_genres = diagnostics.malformed_genres,
                malformed_keywords = diagnostics.malformed_keywords,
                malformed_cast = diagnostics.malformed_cast,
                malformed_crew = diagnostics.malformed_crew,
                unmatched_credits = diagnostics.unmatched_credits,
                "content load defaulted some fields"
            );
        }

        Ok(catalog)
    }
}

impl RatingsCatalog {
    /// Load the ratings catalog from a directory holding the ratings,
    /// titles, and links tables.
    ///
    /// The caller treats any error from this path as a degradation of
    /// collaborative capability, not a crash.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let ratings_path = data_dir.join("ratings.csv");
        let titles_path = data_dir.join("movies.csv");
        let links_path = data_dir.join("links.csv");

        let ((ratings, titles), links) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_ratings(&ratings_path),
                    || parser::parse_titles(&titles_path),
                )
            },
            || parser::parse_links(&links_path),
        );
        let ratings = ratings?;
        let titles = titles?;
        let links = links?;

        info!(
            rating_rows = ratings.len(),
            title_rows = titles.len(),
            link_rows = links.len(),
            "parsed ratings tables"
        );

        // Titles keyed by MovieLens id; the reverse map keeps the first
        // match in table order, mirroring a first-row title scan.
        let mut title_by_ml: HashMap<MlMovieId, String> = HashMap::with_capacity(titles.len());
        let mut title_to_ml_id: HashMap<String, MlMovieId> = HashMap::with_capacity(titles.len());
        for row in titles {
            let stripped = row.title.trim().to_string();
            title_to_ml_id.entry(stripped.clone()).or_insert(row.movie_id);
            title_by_ml.entry(row.movie_id).or_insert(stripped);
        }

        // Links: coerce to integer, blank means no external identifier.
        let mut ml_to_tmdb: HashMap<MlMovieId, MovieId> = HashMap::with_capacity(links.len());
        for row in links {
            if let Some(tmdb) = row.tmdb_id {
                ml_to_tmdb.entry(row.movie_id).or_insert(tmdb as MovieId);
            }
        }

        // Inner-join ratings with titles, then require a TMDB link.
        let mut entries = Vec::with_capacity(ratings.len());
        let mut dropped_unlinked = 0u32;
        for row in ratings {
            let Some(title) = title_by_ml.get(&row.movie_id) else {
                continue;
            };
            if !ml_to_tmdb.contains_key(&row.movie_id) {
                dropped_unlinked += 1;
                continue;
            }
            entries.push(RatingEntry {
                user_id: row.user_id,
                title: title.clone(),
                rating: row.rating,
            });
        }

        if dropped_unlinked > 0 {
            warn!(dropped_unlinked, "dropped rating rows without an external identifier");
        }
        info!(retained = entries.len(), "ratings catalog built");

        Ok(Self::new(entries, title_to_ml_id, ml_to_tmdb, dropped_unlinked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_load_fails_when_files_missing() {
        let result = ContentCatalog::load_from_files(Path::new("/nonexistent/dir"));
        assert!(result.is_err());
    }

    #[test]
    fn ratings_load_fails_when_files_missing() {
        let result = RatingsCatalog::load_from_files(Path::new("/nonexistent/dir"));
        assert!(result.is_err());
    }
}
