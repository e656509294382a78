//! `MovieDbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{Country, GenreList, MovieDetails, MovieListResponse, TvDetails, TvListResponse};

/// Read-only TMDB operations driven by the client's current state.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[trait_variant::make(MovieDbApi: Send)]
pub trait LocalMovieDbApi {
    /// Fetches a page of `discover/movie` with the active filters and sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_movies(&self, page: u32) -> Result<MovieListResponse>;

    /// Fetches movie details with credits appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_list(&self) -> Result<GenreList>;

    /// Fetches the country list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn country_list(&self) -> Result<Vec<Country>>;

    /// Searches movies by title. Filters do not apply to search.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movies(&self, query: &str, page: u32) -> Result<MovieListResponse>;

    /// Counts movies whose origin country is `country_code`, ignoring other filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn count_country_movies(&self, country_code: &str) -> Result<u32>;

    /// Fetches a page of `discover/tv`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_tv(&self, page: u32) -> Result<TvListResponse>;

    /// Fetches TV series details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(&self, series_id: u64) -> Result<TvDetails>;
}
