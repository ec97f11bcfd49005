//! Parsers for the raw catalog tables.
//!
//! Content side, two CSV tables joined on the movie id:
//! - metadata: id, original_title, overview, genres, keywords,
//!   popularity, vote_average, vote_count, release_date
//! - credits: movie_id, cast, crew (the key column is named differently
//!   and is mapped onto the shared id at deserialization)
//!
//! Ratings side, three CSV tables:
//! - ratings: userId, movieId, rating
//! - titles:  movieId, title
//! - links:   movieId, tmdbId (may be blank)
//!
//! The four serialized list columns (genres, keywords, cast, crew) hold
//! JSON arrays of records. They parse defensively: a malformed or
//! missing value resolves to an empty list and bumps a diagnostics
//! counter, never an error.

use crate::error::{CatalogError, Result};
use crate::types::{MlMovieId, MovieId, UserId};
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

// =============================================================================
// Raw row shapes
// =============================================================================

/// Row of the content metadata table. Numeric columns deserialize as
/// Option so a blank cell defaults instead of failing the row.
#[derive(Debug, Deserialize)]
pub struct RawMetadataRow {
    pub id: MovieId,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub popularity: Option<f32>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Row of the content credits table
#[derive(Debug, Deserialize)]
pub struct RawCreditsRow {
    /// The credits table names its key column `movie_id`; it is the
    /// same identifier as the metadata table's `id`.
    #[serde(rename = "movie_id")]
    pub id: MovieId,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub crew: Option<String>,
}

/// Row of the ratings table (timestamp column intentionally ignored)
#[derive(Debug, Deserialize)]
pub struct RawRatingRow {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MlMovieId,
    pub rating: f32,
}

/// Row of the titles table
#[derive(Debug, Deserialize)]
pub struct RawTitleRow {
    #[serde(rename = "movieId")]
    pub movie_id: MlMovieId,
    pub title: String,
}

/// Row of the cross-reference (links) table. The tmdbId column is blank
/// for titles without an external identifier, and floating-point
/// formatted in some exports, so it deserializes as Option<f64>.
#[derive(Debug, Deserialize)]
pub struct RawLinkRow {
    #[serde(rename = "movieId")]
    pub movie_id: MlMovieId,
    #[serde(rename = "tmdbId", default)]
    pub tmdb_id: Option<f64>,
}

// =============================================================================
// CSV reading
// =============================================================================

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(_) => {
            // Surface missing files as Io so the engine can tell
            // "files absent" apart from "files corrupt" in logs.
            CatalogError::Io {
                path: file_name.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, e),
            }
        }
        _ => CatalogError::Csv {
            file: file_name.clone(),
            source: e,
        },
    })?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|e| CatalogError::Csv {
            file: file_name.clone(),
            source: e,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn parse_metadata(path: &Path) -> Result<Vec<RawMetadataRow>> {
    read_csv(path)
}

pub fn parse_credits(path: &Path) -> Result<Vec<RawCreditsRow>> {
    read_csv(path)
}

pub fn parse_ratings(path: &Path) -> Result<Vec<RawRatingRow>> {
    read_csv(path)
}

pub fn parse_titles(path: &Path) -> Result<Vec<RawTitleRow>> {
    read_csv(path)
}

pub fn parse_links(path: &Path) -> Result<Vec<RawLinkRow>> {
    read_csv(path)
}

// =============================================================================
// Nested attribute columns
// =============================================================================

#[derive(Debug, Deserialize)]
struct NamedEntity {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewEntity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    job: String,
}

fn is_blank_list(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "[]"
}

/// Extract every `name` from a serialized list of records.
///
/// Malformed input yields an empty list and bumps `malformed`.
pub fn parse_name_list(raw: Option<&str>, malformed: &mut u32) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if is_blank_list(raw) {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<NamedEntity>>(raw) {
        Ok(entries) => entries
            .into_iter()
            .filter(|e| !e.name.is_empty())
            .map(|e| e.name)
            .collect(),
        Err(_) => {
            *malformed += 1;
            Vec::new()
        }
    }
}

/// Cast extraction: the first 3 billed names only
pub fn parse_cast(raw: Option<&str>, malformed: &mut u32) -> Vec<String> {
    let mut names = parse_name_list(raw, malformed);
    names.truncate(3);
    names
}

/// Crew extraction: the first entry whose job is "Director", or empty
pub fn parse_director(raw: Option<&str>, malformed: &mut u32) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if is_blank_list(raw) {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<CrewEntity>>(raw) {
        Ok(entries) => entries
            .into_iter()
            .find(|e| e.job == "Director" && !e.name.is_empty())
            .map(|e| vec![e.name])
            .unwrap_or_default(),
        Err(_) => {
            *malformed += 1;
            Vec::new()
        }
    }
}

/// Strip internal spaces so multi-word names become single tokens
/// ("Sam Worthington" -> "SamWorthington")
pub fn collapse(names: &[String]) -> Vec<String> {
    names.iter().map(|n| n.replace(' ', "")).collect()
}

/// Assemble the lower-cased tag document for one movie.
///
/// Field order matches the source layout: overview, then collapsed
/// genre/keyword/cast/director tokens.
pub fn build_tags(
    overview: &str,
    genres: &[String],
    keywords: &[String],
    cast: &[String],
    director: &[String],
) -> String {
    let joined = format!(
        "{} {} {} {} {}",
        overview,
        collapse(genres).join(" "),
        collapse(keywords).join(" "),
        collapse(cast).join(" "),
        collapse(director).join(" "),
    );
    joined.to_lowercase()
}

/// Release dates are `YYYY-MM-DD`; anything else is treated as absent.
pub fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_name_list() {
        let raw = r#"[{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]"#;
        let mut malformed = 0;
        let names = parse_name_list(Some(raw), &mut malformed);

        assert_eq!(names, vec!["Action", "Science Fiction"]);
        assert_eq!(malformed, 0);
    }

    #[test]
    fn malformed_list_yields_empty_and_counts() {
        let mut malformed = 0;
        let names = parse_name_list(Some("[{'name': 'unterminated"), &mut malformed);

        assert!(names.is_empty());
        assert_eq!(malformed, 1);
    }

    #[test]
    fn blank_and_empty_lists_do_not_count_as_malformed() {
        let mut malformed = 0;
        assert!(parse_name_list(Some("[]"), &mut malformed).is_empty());
        assert!(parse_name_list(Some("   "), &mut malformed).is_empty());
        assert!(parse_name_list(None, &mut malformed).is_empty());
        assert_eq!(malformed, 0);
    }

    #[test]
    fn cast_is_truncated_to_three() {
        let raw = r#"[{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}]"#;
        let mut malformed = 0;
        let cast = parse_cast(Some(raw), &mut malformed);

        assert_eq!(cast, vec!["A", "B", "C"]);
    }

    #[test]
    fn director_takes_first_matching_job_only() {
        let raw = r#"[
            {"name": "Jane Editor", "job": "Editor"},
            {"name": "John Director", "job": "Director"},
            {"name": "Second Director", "job": "Director"}
        ]"#;
        let mut malformed = 0;
        let director = parse_director(Some(raw), &mut malformed);

        assert_eq!(director, vec!["John Director"]);
    }

    #[test]
    fn director_absent_when_no_matching_job() {
        let raw = r#"[{"name": "Jane Editor", "job": "Editor"}]"#;
        let mut malformed = 0;
        assert!(parse_director(Some(raw), &mut malformed).is_empty());
        assert_eq!(malformed, 0);
    }

    #[test]
    fn malformed_crew_yields_empty_director_and_counts() {
        let mut malformed = 0;
        let director = parse_director(Some("not json at all"), &mut malformed);

        assert!(director.is_empty());
        assert_eq!(malformed, 1);
    }

    #[test]
    fn collapse_removes_internal_spaces() {
        let names = vec!["Sam Worthington".to_string(), "Zoe Saldana".to_string()];
        assert_eq!(collapse(&names), vec!["SamWorthington", "ZoeSaldana"]);
    }

    #[test]
    fn tags_are_lower_cased_and_collapsed() {
        let tags = build_tags(
            "In the 22nd century",
            &["Science Fiction".to_string()],
            &["culture clash".to_string()],
            &["Sam Worthington".to_string()],
            &["James Cameron".to_string()],
        );

        assert_eq!(
            tags,
            "in the 22nd century sciencefiction cultureclash samworthington jamescameron"
        );
    }

    #[test]
    fn release_date_parses_or_defaults() {
        assert_eq!(
            parse_release_date(Some("2009-12-10")),
            NaiveDate::from_ymd_opt(2009, 12, 10)
        );
        assert_eq!(parse_release_date(Some("not-a-date")), None);
        assert_eq!(parse_release_date(None), None);
    }
}
