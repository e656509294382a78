//! Helpers built on top of `LocalMovieDbApi`.

use anyhow::{Context, Result};

use super::api::LocalMovieDbApi;
use super::types::Country;

/// Probes each country with a one-page discover call and returns the codes
/// that have no movies, in input order.
///
/// Countries are probed sequentially; the client's throttle spaces the calls.
///
/// # Errors
///
/// Returns an error on the first failed probe.
pub async fn find_no_movie_countries(
    api: &(impl LocalMovieDbApi + Sync),
    countries: &[Country],
) -> Result<Vec<String>> {
    let mut empty: Vec<String> = Vec::new();

    for country in countries {
        let total = api
            .count_country_movies(&country.iso_3166_1)
            .await
            .with_context(|| format!("country probe failed: {}", country.iso_3166_1))?;

        tracing::debug!(country = %country.iso_3166_1, total, "country probe");

        if total == 0 {
            empty.push(country.iso_3166_1.clone());
        }
    }

    Ok(empty)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::bail;

    use super::*;
    use crate::tmdb::types::{GenreList, MovieDetails, MovieListResponse, TvDetails, TvListResponse};

    struct MockMovieDbApi {
        totals: HashMap<&'static str, u32>,
        call_count: AtomicU32,
    }

    impl MockMovieDbApi {
        fn new(totals: &[(&'static str, u32)]) -> Self {
            Self {
                totals: totals.iter().copied().collect(),
                call_count: AtomicU32::new(0),
            }
        }
    }

    impl LocalMovieDbApi for MockMovieDbApi {
        async fn discover_movies(&self, _page: u32) -> Result<MovieListResponse> {
            bail!("not used")
        }

        async fn movie_details(&self, _movie_id: u64) -> Result<MovieDetails> {
            bail!("not used")
        }

        async fn genre_list(&self) -> Result<GenreList> {
            Ok(GenreList { genres: vec![] })
        }

        async fn country_list(&self) -> Result<Vec<Country>> {
            Ok(vec![])
        }

        async fn search_movies(&self, _query: &str, _page: u32) -> Result<MovieListResponse> {
            bail!("not used")
        }

        async fn count_country_movies(&self, country_code: &str) -> Result<u32> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.totals
                .get(country_code)
                .copied()
                .with_context(|| format!("unexpected country {country_code}"))
        }

        async fn discover_tv(&self, _page: u32) -> Result<TvListResponse> {
            bail!("not used")
        }

        async fn tv_details(&self, _series_id: u64) -> Result<TvDetails> {
            bail!("not used")
        }
    }

    fn country(code: &str) -> Country {
        Country {
            iso_3166_1: String::from(code),
            english_name: String::from(code),
            native_name: None,
        }
    }

    #[tokio::test]
    async fn test_find_no_movie_countries_keeps_input_order() {
        // Arrange
        let api = MockMovieDbApi::new(&[("AQ", 0), ("FR", 120_000), ("BV", 0)]);
        let countries = vec![country("BV"), country("FR"), country("AQ")];

        // Act
        let empty = find_no_movie_countries(&api, &countries).await.unwrap();

        // Assert
        assert_eq!(empty, vec![String::from("BV"), String::from("AQ")]);
        assert_eq!(api.call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_find_no_movie_countries_empty_input() {
        // Arrange
        let api = MockMovieDbApi::new(&[]);

        // Act
        let empty = find_no_movie_countries(&api, &[]).await.unwrap();

        // Assert
        assert!(empty.is_empty());
        assert_eq!(api.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_find_no_movie_countries_stops_on_error() {
        // Arrange
        let api = MockMovieDbApi::new(&[("FR", 10)]);
        let countries = vec![country("XX"), country("FR")];

        // Act
        let result = find_no_movie_countries(&api, &countries).await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("country probe failed: XX")
        );
        assert_eq!(api.call_count.load(Ordering::SeqCst), 1);
    }
}
