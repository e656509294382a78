//! `MovieDb` - TMDB client holding credentials, request parameters and filter state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalMovieDbApi;
use super::filters::{FilterError, MovieFilters, YearRange};
use super::params::{DEFAULT_SORT_BY, RequestParams, SORT_TYPES, SortType};
use super::rate_limiter::RequestThrottle;
use super::types::{
    Country, GenreList, MovieDetails, MovieListResponse, TmdbErrorResponse, TvDetails,
    TvListResponse,
};
use super::util::find_no_movie_countries;

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default base URL for poster and backdrop images.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Query string pairs, in the order they are appended.
type Query = Vec<(&'static str, String)>;

/// TMDB movie client.
///
/// Owns the mutable discover state (filters, sort order, cached no-result
/// countries). Every request URL is built from that state at call time.
pub struct MovieDb {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Base URL for images.
    image_base_url: String,
    /// v3 API key, sent as the `api_key` query parameter.
    api_key: String,
    /// Default request parameters.
    params: RequestParams,
    /// Current sort order (always a catalog value).
    sort_by: String,
    /// Active discover filters.
    filters: MovieFilters,
    /// Countries known to have no movies.
    no_movie_countries: Vec<String>,
    /// Request throttle.
    throttle: Arc<Mutex<RequestThrottle>>,
}

impl std::fmt::Debug for MovieDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieDb")
            .field("base_url", &self.base_url.as_str())
            .field("params", &self.params)
            .field("sort_by", &self.sort_by)
            .field("filters", &self.filters)
            .field("no_movie_countries", &self.no_movie_countries.len())
            .finish_non_exhaustive()
    }
}

/// Builder for `MovieDb`.
#[derive(Debug)]
pub struct MovieDbBuilder {
    base_url: Option<Url>,
    image_base_url: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    params: Option<RequestParams>,
    min_interval: Option<Duration>,
}

impl MovieDbBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            image_base_url: None,
            api_key: None,
            user_agent: None,
            params: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the image base URL.
    #[must_use]
    pub fn image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = Some(url.into());
        self
    }

    /// Sets the v3 API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the default request parameters.
    #[must_use]
    pub fn params(mut self, params: RequestParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `user_agent` is not set.
    /// - `params.sort_by` is not in the sort-type catalog.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<MovieDb> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let params = self.params.unwrap_or_default();
        let sort_by = SortType::find(&params.sort_by)
            .with_context(|| format!("unknown sort type: {}", params.sort_by))?
            .value;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let image_base_url = self
            .image_base_url
            .unwrap_or_else(|| String::from(DEFAULT_IMAGE_BASE_URL));

        let throttle = self.min_interval.map_or_else(
            RequestThrottle::with_default_interval,
            RequestThrottle::new,
        );

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(MovieDb {
            http_client,
            base_url,
            image_base_url,
            api_key,
            sort_by: String::from(sort_by),
            params,
            filters: MovieFilters::default(),
            no_movie_countries: Vec::new(),
            throttle: Arc::new(Mutex::new(throttle)),
        })
    }
}

impl MovieDb {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> MovieDbBuilder {
        MovieDbBuilder::new()
    }

    // --- State ---

    /// Default request parameters.
    #[must_use]
    pub const fn params(&self) -> &RequestParams {
        &self.params
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &MovieFilters {
        &self.filters
    }

    /// Mutable access to the active filters.
    pub const fn filters_mut(&mut self) -> &mut MovieFilters {
        &mut self.filters
    }

    /// Selected genre IDs.
    #[must_use]
    pub fn genres(&self) -> &[u32] {
        self.filters.genres()
    }

    /// Appends genre IDs to the selection.
    pub fn add_genres(&mut self, ids: &[u32]) {
        self.filters.add_genres(ids);
    }

    /// Removes every occurrence of the given genre IDs.
    pub fn remove_genres(&mut self, ids: &[u32]) {
        self.filters.remove_genres(ids);
    }

    /// Clears the genre selection.
    pub fn reset_genres(&mut self) {
        self.filters.reset_genres();
    }

    /// Selected year range.
    #[must_use]
    pub const fn years(&self) -> Option<YearRange> {
        self.filters.years()
    }

    /// Sets the year range; a rejected range leaves the filter unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DescendingYears`] if `from > to`.
    pub fn set_years(&mut self, from: i32, to: i32) -> Result<(), FilterError> {
        self.filters
            .set_years(from, to)
            .inspect_err(|e| tracing::warn!(error = %e, "years filter rejected"))
    }

    /// Clears the year range.
    pub const fn reset_years(&mut self) {
        self.filters.reset_years();
    }

    /// Selected origin country codes.
    #[must_use]
    pub fn countries(&self) -> &[String] {
        self.filters.countries()
    }

    /// Replaces the country selection.
    pub fn update_countries<S: AsRef<str>>(&mut self, codes: &[S]) {
        self.filters.update_countries(codes);
    }

    /// Clears the country selection.
    pub fn reset_countries(&mut self) {
        self.filters.reset_countries();
    }

    /// The sort-type catalog.
    #[must_use]
    pub fn sort_types() -> &'static [SortType] {
        &SORT_TYPES
    }

    /// Current sort order.
    #[must_use]
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    /// Changes the sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not in the sort-type catalog.
    pub fn set_sort_by(&mut self, value: &str) -> Result<()> {
        let sort_type =
            SortType::find(value).with_context(|| format!("unknown sort type: {value}"))?;
        self.sort_by = String::from(sort_type.value);
        Ok(())
    }

    /// Cached country codes with no movies.
    #[must_use]
    pub fn no_movie_countries(&self) -> &[String] {
        &self.no_movie_countries
    }

    /// Replaces the cached no-result countries.
    pub fn set_no_movie_countries(&mut self, codes: Vec<String>) {
        self.no_movie_countries = codes;
    }

    /// Countries minus the cached no-result ones, in input order.
    #[must_use]
    pub fn available_countries<'a>(&self, countries: &'a [Country]) -> Vec<&'a Country> {
        countries
            .iter()
            .filter(|country| !self.no_movie_countries.contains(&country.iso_3166_1))
            .collect()
    }

    /// Probes every country and caches the ones without movies.
    ///
    /// # Errors
    ///
    /// Returns an error if any probe request fails; the cache is left unchanged.
    #[instrument(skip_all, fields(countries = countries.len()))]
    pub async fn refresh_no_movie_countries(&mut self, countries: &[Country]) -> Result<&[String]> {
        let found = find_no_movie_countries(&*self, countries).await?;
        tracing::info!(count = found.len(), "cached countries without movies");
        self.no_movie_countries = found;
        Ok(&self.no_movie_countries)
    }

    /// Image base URL joined with a size segment (e.g. "w500"); `""` gives the bare base.
    #[must_use]
    pub fn base_image_url(&self, size: &str) -> String {
        format!("{}{size}", self.image_base_url)
    }

    /// Full URL of a poster path (e.g. "/abc.jpg") at the given size.
    #[must_use]
    pub fn poster_url(&self, size: &str, poster_path: &str) -> String {
        format!("{}{poster_path}", self.base_image_url(size))
    }

    // --- URL building ---

    /// Joins `path` onto the base URL and appends `api_key` plus `query`.
    ///
    /// The joined URL must stay under the base URL (same origin, path prefix);
    /// absolute, scheme-relative and `..` paths are rejected before the key is attached.
    fn resource_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        if Url::parse(path).is_ok() || path.starts_with("//") || path.starts_with("\\\\") {
            bail!("API path must be relative to the base URL: {path}");
        }
        if path
            .split(['/', '\\', '?', '#'])
            .any(|segment| segment == "..")
        {
            bail!("API path must not contain '..' segments: {path}");
        }

        let mut url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            bail!("API path escapes the base URL: {path}");
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Query for `discover/movie` from the current params, sort order and filters.
    fn discover_query(&self, page: u32) -> Query {
        let mut query: Query = vec![
            ("include_adult", self.params.include_adult.to_string()),
            ("include_video", self.params.include_video.to_string()),
            ("language", self.params.language.clone()),
        ];
        query.extend(self.filters.genre_pair());
        query.extend(self.filters.country_pair());
        query.push(("sort_by", self.sort_by.clone()));
        query.extend(self.filters.year_pairs());
        query.push(("page", page.max(1).to_string()));
        query
    }

    /// URL for `discover/movie`. Page 0 is treated as page 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn discover_url(&self, page: u32) -> Result<Url> {
        self.resource_url("discover/movie", &self.discover_query(page))
    }

    /// URL for `movie/{movie_id}` with credits appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn movie_url(&self, movie_id: u64) -> Result<Url> {
        let query = [
            ("append_to_response", String::from("credits")),
            ("language", self.params.language.clone()),
        ];
        self.resource_url(&format!("movie/{movie_id}"), &query)
    }

    /// URL for `genre/movie/list`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn genre_list_url(&self) -> Result<Url> {
        let query = [("language", self.params.language.clone())];
        self.resource_url("genre/movie/list", &query)
    }

    /// URL for `configuration/countries`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn country_list_url(&self) -> Result<Url> {
        let query = [("language", self.params.language.clone())];
        self.resource_url("configuration/countries", &query)
    }

    /// URL for `search/movie`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn search_url(&self, title: &str, page: u32) -> Result<Url> {
        let query = [
            ("language", self.params.language.clone()),
            ("query", String::from(title)),
            ("include_adult", self.params.include_adult.to_string()),
            ("page", page.max(1).to_string()),
        ];
        self.resource_url("search/movie", &query)
    }

    /// URL for a single-country discover probe.
    fn country_probe_url(&self, country_code: &str) -> Result<Url> {
        let query = [
            ("include_adult", self.params.include_adult.to_string()),
            ("include_video", self.params.include_video.to_string()),
            ("language", self.params.language.clone()),
            ("with_origin_country", String::from(country_code)),
            ("page", String::from("1")),
        ];
        self.resource_url("discover/movie", &query)
    }

    /// URL for `discover/tv`, always by popularity.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn discover_tv_url(&self, page: u32) -> Result<Url> {
        let query = [
            ("include_adult", self.params.include_adult.to_string()),
            ("include_video", self.params.include_video.to_string()),
            ("language", self.params.language.clone()),
            ("sort_by", String::from(DEFAULT_SORT_BY)),
            ("page", page.max(1).to_string()),
        ];
        self.resource_url("discover/tv", &query)
    }

    /// URL for `tv/{series_id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built.
    pub fn tv_url(&self, series_id: u64) -> Result<Url> {
        let query = [("language", self.params.language.clone())];
        self.resource_url(&format!("tv/{series_id}"), &query)
    }

    // --- Fetching ---

    /// Sends a throttled GET and returns the body as text.
    /// Retries up to `MAX_RETRIES` times on HTTP 429; any other non-200 status fails.
    #[instrument(skip_all)]
    async fn get_text(&self, url: Url) -> Result<String> {
        // Logged without the query string, which carries the API key.
        let path = String::from(url.path());

        let mut retries = 0u32;
        loop {
            self.throttle.lock().await.acquire().await;

            tracing::debug!(path = %path, "TMDB API request");

            let result = self.http_client.get(url.clone()).send().await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();
            #[cfg(feature = "otel")]
            record_request(status);

            if status == StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                continue;
            }

            if status != StatusCode::OK {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            return response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"));
        }
    }

    /// Sends a throttled GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let path = String::from(url.path());
        let body = self.get_text(url).await?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Fetches an arbitrary API path (e.g. "movie/238/keywords") and returns the raw body.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built or the request fails.
    #[instrument(skip_all, fields(path = path))]
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.resource_url(path.trim_start_matches('/'), &[])?;
        self.get_text(url).await
    }
}

/// TMDB API responses by HTTP status.
#[cfg(feature = "otel")]
static REQUEST_COUNTER: std::sync::LazyLock<opentelemetry::metrics::Counter<u64>> =
    std::sync::LazyLock::new(|| {
        opentelemetry::global::meter("movv-api")
            .u64_counter("tmdb.requests")
            .with_description("TMDB API responses by HTTP status")
            .build()
    });

/// Counts API responses by status code.
#[cfg(feature = "otel")]
fn record_request(status: StatusCode) {
    REQUEST_COUNTER.add(
        1,
        &[opentelemetry::KeyValue::new(
            "http.response.status_code",
            i64::from(status.as_u16()),
        )],
    );
}

impl LocalMovieDbApi for MovieDb {
    #[instrument(skip_all, fields(page = page))]
    async fn discover_movies(&self, page: u32) -> Result<MovieListResponse> {
        let url = self.discover_url(page)?;
        self.get_json(url).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetails> {
        let url = self.movie_url(movie_id)?;
        self.get_json(url).await
    }

    #[instrument(skip_all)]
    async fn genre_list(&self) -> Result<GenreList> {
        let url = self.genre_list_url()?;
        self.get_json(url).await
    }

    #[instrument(skip_all)]
    async fn country_list(&self) -> Result<Vec<Country>> {
        let url = self.country_list_url()?;
        self.get_json(url).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn search_movies(&self, query: &str, page: u32) -> Result<MovieListResponse> {
        let url = self.search_url(query, page)?;
        self.get_json(url).await
    }

    #[instrument(skip_all, fields(country = country_code))]
    async fn count_country_movies(&self, country_code: &str) -> Result<u32> {
        let url = self.country_probe_url(country_code)?;
        let response: MovieListResponse = self.get_json(url).await?;
        Ok(response.total_results)
    }

    #[instrument(skip_all, fields(page = page))]
    async fn discover_tv(&self, page: u32) -> Result<TvListResponse> {
        let url = self.discover_tv_url(page)?;
        self.get_json(url).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_details(&self, series_id: u64) -> Result<TvDetails> {
        let url = self.tv_url(series_id)?;
        self.get_json(url).await
    }
}
