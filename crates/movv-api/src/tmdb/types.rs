//! TMDB API response types.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

// --- Paging ---

/// A paginated result list (`discover/*`, `search/*`).
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    /// Current page number.
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

impl<T> PagedResponse<T> {
    /// Returns `true` if a later page exists.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Response from `discover/movie` and `search/movie`.
pub type MovieListResponse = PagedResponse<MovieSummary>;

/// Response from `discover/tv`.
pub type TvListResponse = PagedResponse<TvSummary>;

// --- Movies ---

/// A movie entry within a result list.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Response from `movie/{movie_id}?append_to_response=credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Release status (e.g., "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production countries.
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Cast and crew, present when `credits` is appended.
    #[serde(default)]
    pub credits: Credits,
}

impl MovieDetails {
    /// Year part of the release date.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Runtime formatted as `"{h}h {m}min"`.
    #[must_use]
    pub fn runtime_display(&self) -> Option<String> {
        let minutes = self.runtime.filter(|m| *m > 0)?;
        Some(format!("{}h {}min", minutes / 60, minutes % 60))
    }
}

/// Country entry within movie details.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// English name.
    pub name: String,
}

/// Cast and crew of a movie.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    /// Cast members in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// Names of the first `limit` cast members.
    #[must_use]
    pub fn top_cast(&self, limit: usize) -> Vec<&str> {
        self.cast
            .iter()
            .take(limit)
            .map(|member| member.name.as_str())
            .collect()
    }

    /// Comma-separated top cast, suffixed with `...` when truncated.
    #[must_use]
    pub fn casting_summary(&self, limit: usize) -> String {
        let mut summary = self.top_cast(limit).join(", ");
        if self.cast.len() > limit {
            summary.push_str("...");
        }
        summary
    }

    /// Crew members credited as director.
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|member| member.job == "Director")
    }
}

/// A cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A crew member.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g., "Director").
    #[serde(default)]
    pub job: String,
    /// Department (e.g., "Directing").
    #[serde(default)]
    pub department: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Genres and countries ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    /// Available genres.
    pub genres: Vec<Genre>,
}

/// Entry of `configuration/countries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// English name.
    pub english_name: String,
    /// Name in the requested language.
    #[serde(default)]
    pub native_name: Option<String>,
}

impl Country {
    /// Localized name, falling back to the English name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.native_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.english_name)
    }
}

// --- TV ---

/// A TV series entry within a result list.
#[derive(Debug, Clone, Deserialize)]
pub struct TvSummary {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Response from `tv/{series_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: String,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Last air date.
    #[serde(default)]
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Status (e.g., "Returning Series", "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Whether the show is still in production.
    #[serde(default)]
    pub in_production: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}
