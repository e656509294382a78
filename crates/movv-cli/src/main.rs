//! movv - browse TMDB movies from the terminal.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use movv_api::tmdb::{
    LocalMovieDbApi, MovieDb, MovieDetails, MovieFilters, MovieListResponse, SortType, year_list,
};

/// Environment variable that overrides `[tmdb] api_key`.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Poster size used when printing image URLs.
const POSTER_SIZE: &str = "w500";

/// Number of cast members shown in movie details.
const CAST_LIMIT: usize = 4;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Discover movies using the saved filters.
    Discover(DiscoverArgs),
    /// Show details and credits for one movie.
    Movie(MovieArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// List movie genres.
    Genres,
    /// Origin countries.
    Countries(CountriesCommand),
    /// List available sort orders.
    SortTypes,
    /// List selectable release years.
    Years,
    /// Inspect or change the saved discover filters.
    Filters(FiltersCommand),
    /// Query TV series.
    Tv(TvCommand),
    /// GET any API path and print the raw body.
    Raw(RawArgs),
}

/// Arguments for the `discover` subcommand.
///
/// Each flag overrides the saved filter for this call only.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Comma-separated genre IDs (all must match).
    #[arg(long, value_delimiter = ',')]
    genres: Option<Vec<u32>>,

    /// Release year range as `FROM,TO`.
    #[arg(long, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// Comma-separated origin country codes (any may match).
    #[arg(long, value_delimiter = ',')]
    countries: Option<Vec<String>>,

    /// Sort order (see `sort-types`).
    #[arg(long)]
    sort_by: Option<String>,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for.
    #[arg(long)]
    query: String,

    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `countries` subcommand.
#[derive(clap::Args)]
struct CountriesCommand {
    /// Countries subcommand to run.
    #[command(subcommand)]
    command: CountriesSubcommands,
}

/// Available countries subcommands.
#[derive(Subcommand)]
enum CountriesSubcommands {
    /// List countries that have movies.
    List,
    /// Probe every country for movies and cache the empty ones.
    Probe,
}

/// Arguments for the `filters` subcommand.
#[derive(clap::Args)]
struct FiltersCommand {
    /// Filters subcommand to run.
    #[command(subcommand)]
    command: FiltersSubcommands,
}

/// Available filters subcommands.
#[derive(Subcommand)]
enum FiltersSubcommands {
    /// Show the saved filters and sort order.
    Show,
    /// Change the genre selection.
    Genres(GenresFilterCommand),
    /// Change the release year range.
    Years(YearsFilterCommand),
    /// Change the origin country selection.
    Countries(CountriesFilterCommand),
    /// Change the sort order.
    SortBy(SortByArgs),
    /// Clear genres, years and countries.
    Reset,
}

/// Arguments for the `filters genres` subcommand.
#[derive(clap::Args)]
struct GenresFilterCommand {
    /// Genres subcommand to run.
    #[command(subcommand)]
    command: GenresFilterSubcommands,
}

/// Available `filters genres` subcommands.
#[derive(Subcommand)]
enum GenresFilterSubcommands {
    /// Add genre IDs to the selection.
    Add(GenreIdsArgs),
    /// Remove genre IDs from the selection.
    Remove(GenreIdsArgs),
    /// Clear the genre selection.
    Reset,
}

/// Genre IDs for `filters genres add|remove`.
#[derive(clap::Args)]
struct GenreIdsArgs {
    /// Comma-separated genre IDs.
    #[arg(long, value_delimiter = ',', required = true)]
    ids: Vec<u32>,
}

/// Arguments for the `filters years` subcommand.
#[derive(clap::Args)]
struct YearsFilterCommand {
    /// Years subcommand to run.
    #[command(subcommand)]
    command: YearsFilterSubcommands,
}

/// Available `filters years` subcommands.
#[derive(Subcommand)]
enum YearsFilterSubcommands {
    /// Set the release year range.
    Set(YearsSetArgs),
    /// Clear the release year range.
    Reset,
}

/// Arguments for `filters years set`.
#[derive(clap::Args)]
struct YearsSetArgs {
    /// First year (inclusive).
    #[arg(long)]
    from: i32,

    /// Last year (inclusive).
    #[arg(long)]
    to: i32,
}

/// Arguments for the `filters countries` subcommand.
#[derive(clap::Args)]
struct CountriesFilterCommand {
    /// Countries subcommand to run.
    #[command(subcommand)]
    command: CountriesFilterSubcommands,
}

/// Available `filters countries` subcommands.
#[derive(Subcommand)]
enum CountriesFilterSubcommands {
    /// Replace the country selection.
    Set(CountryCodesArgs),
    /// Clear the country selection.
    Reset,
}

/// Country codes for `filters countries set`.
#[derive(clap::Args)]
struct CountryCodesArgs {
    /// Comma-separated ISO 3166-1 codes.
    #[arg(long, value_delimiter = ',', required = true)]
    codes: Vec<String>,
}

/// Arguments for `filters sort-by`.
#[derive(clap::Args)]
struct SortByArgs {
    /// Sort order value (see `sort-types`).
    value: String,
}

/// Arguments for the `tv` subcommand.
#[derive(clap::Args)]
struct TvCommand {
    /// TV subcommand to run.
    #[command(subcommand)]
    command: TvSubcommands,
}

/// Available TV subcommands.
#[derive(Subcommand)]
enum TvSubcommands {
    /// Discover popular TV series.
    Discover(TvDiscoverArgs),
    /// Show details for one series.
    Details(TvDetailsArgs),
}

/// Arguments for `tv discover`.
#[derive(clap::Args)]
struct TvDiscoverArgs {
    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for `tv details`.
#[derive(clap::Args)]
struct TvDetailsArgs {
    /// TMDB series ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `raw` subcommand.
#[derive(clap::Args)]
struct RawArgs {
    /// API path relative to the base URL (e.g. "configuration/languages").
    #[arg(long)]
    path: String,
}

/// Loads the config file from the resolved location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<(PathBuf, AppConfig)> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok((config_path, config))
}

/// Picks the API key: a non-empty environment value wins over the config value.
fn pick_api_key(from_env: Option<String>, configured: Option<&str>) -> Option<String> {
    from_env
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|key| !key.trim().is_empty())
                .map(String::from)
        })
}

/// Resolves the TMDB API key from `TMDB_API_KEY` or the config file.
///
/// # Errors
///
/// Returns an error if neither source provides a key.
fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let Some(key) = pick_api_key(
        std::env::var(API_KEY_ENV).ok(),
        config.tmdb.api_key.as_deref(),
    ) else {
        bail!("TMDB API key is required: set {API_KEY_ENV} or [tmdb] api_key in the config file");
    };
    Ok(key)
}

/// Builds a `MovieDb` carrying the saved request parameters and filters.
///
/// # Errors
///
/// Returns an error if the API key is missing, the saved filters are invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_movie_db(config: &AppConfig) -> Result<MovieDb> {
    let api_key = resolve_api_key(config)?;

    let mut db = MovieDb::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .params(config.tmdb.request_params())
        .build()
        .context("failed to build TMDB client")?;

    *db.filters_mut() = config.filters.to_filters()?;
    db.set_no_movie_countries(config.filters.no_movie_countries.clone());

    Ok(db)
}

/// Trims and uppercases country codes, dropping empty entries.
fn normalize_country_codes(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .map(|code| code.trim().to_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}

/// Extracts the year from a `YYYY-MM-DD` date, or `"-"`.
fn year_of(date: Option<&str>) -> &str {
    date.and_then(|d| d.get(..4))
        .filter(|y| !y.is_empty())
        .unwrap_or("-")
}

/// Logs one page of movie results.
fn log_movie_list(response: &MovieListResponse) {
    tracing::info!(
        "Page {}/{} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tYear\tVote\tTitle");
    for movie in &response.results {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}",
            movie.id,
            year_of(movie.release_date.as_deref()),
            movie.vote_average,
            movie.title,
        );
    }
    if response.has_more() {
        tracing::info!("More results: --page {}", response.page.saturating_add(1));
    }
}

/// Logs movie details the way a details card presents them.
fn log_movie_details(db: &MovieDb, details: &MovieDetails) {
    match details.release_year() {
        Some(year) => tracing::info!("{} ({year})", details.title),
        None => tracing::info!("{}", details.title),
    }
    if details.original_title != details.title && !details.original_title.is_empty() {
        tracing::info!("Original Title: {}", details.original_title);
    }
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("\"{tagline}\"");
    }
    tracing::info!(
        "Genres: {}",
        details
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "Runtime: {}",
        details.runtime_display().unwrap_or_else(|| String::from("-"))
    );
    tracing::info!(
        "Countries: {}",
        details
            .production_countries
            .iter()
            .map(|country| country.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let directors: Vec<&str> = details
        .credits
        .directors()
        .map(|crew| crew.name.as_str())
        .collect();
    tracing::info!(
        "Director: {}",
        if directors.is_empty() {
            String::from("-")
        } else {
            directors.join(", ")
        }
    );
    tracing::info!("Cast: {}", details.credits.casting_summary(CAST_LIMIT));
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        details.vote_average,
        details.vote_count
    );
    if let Some(path) = details.poster_path.as_deref() {
        tracing::info!("Poster: {}", db.poster_url(POSTER_SIZE, path));
    }
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        tracing::info!("---");
        tracing::info!("{overview}");
    }
}

/// Logs the saved filter state.
fn log_filters(config: &AppConfig) {
    let filters = &config.filters;
    tracing::info!(
        "Genres: {}",
        if filters.genres.is_empty() {
            String::from("(any)")
        } else {
            filters
                .genres
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }
    );
    tracing::info!(
        "Years: {}",
        filters
            .years
            .map_or_else(|| String::from("(any)"), |[from, to]| format!("{from}-{to}"))
    );
    tracing::info!(
        "Countries: {}",
        if filters.countries.is_empty() {
            String::from("(any)")
        } else {
            filters.countries.join(",")
        }
    );
    tracing::info!("Sort by: {}", config.tmdb.sort_by);
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if an override is invalid or the API request fails.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let mut db = build_movie_db(&config)?;

    if let Some(genres) = &args.genres {
        db.reset_genres();
        db.add_genres(genres);
    }
    if let Some(years) = &args.years {
        db.filters_mut()
            .set_years_from_slice(years)
            .context("invalid --years")?;
    }
    if let Some(countries) = &args.countries {
        db.update_countries(&normalize_country_codes(countries));
    }
    if let Some(sort_by) = &args.sort_by {
        db.set_sort_by(sort_by)?;
    }

    let response = db
        .discover_movies(args.page)
        .await
        .context("TMDB discover/movie request failed")?;

    log_movie_list(&response);
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let details = db
        .movie_details(args.id)
        .await
        .context("TMDB movie details request failed")?;

    log_movie_details(&db, &details);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let response = db
        .search_movies(&args.query, args.page)
        .await
        .context("TMDB search/movie request failed")?;

    log_movie_list(&response);
    Ok(())
}

/// Runs the `genres` subcommand. Selected genres are marked with `*`.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let list = db
        .genre_list()
        .await
        .context("TMDB genre list request failed")?;

    tracing::info!("ID\tName");
    for genre in &list.genres {
        let mark = if db.genres().contains(&genre.id) {
            "*"
        } else {
            " "
        };
        tracing::info!("{mark}{}\t{}", genre.id, genre.name);
    }
    Ok(())
}

/// Runs the `countries list` subcommand, hiding cached no-movie countries.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_countries_list(dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let countries = db
        .country_list()
        .await
        .context("TMDB country list request failed")?;
    let available = db.available_countries(&countries);

    tracing::info!(
        "Countries ({} of {}):",
        available.len(),
        countries.len()
    );
    for country in available {
        let mark = if db.countries().contains(&country.iso_3166_1) {
            "*"
        } else {
            " "
        };
        tracing::info!("{mark}{}\t{}", country.iso_3166_1, country.display_name());
    }
    Ok(())
}

/// Runs the `countries probe` subcommand and saves the result to the config file.
///
/// # Errors
///
/// Returns an error if any API request fails or the config cannot be saved.
#[instrument(skip_all)]
async fn run_countries_probe(dir: Option<&PathBuf>) -> Result<()> {
    let (config_path, mut config) = load_config(dir)?;
    let mut db = build_movie_db(&config)?;

    let countries = db
        .country_list()
        .await
        .context("TMDB country list request failed")?;

    tracing::info!("Probing {} countries...", countries.len());
    let empty = db
        .refresh_no_movie_countries(&countries)
        .await
        .context("country probe failed")?
        .to_vec();

    tracing::info!("Countries without movies ({}): {}", empty.len(), empty.join(","));
    config.filters.no_movie_countries = empty;
    config
        .save(&config_path)
        .context("failed to save config")?;
    Ok(())
}

/// Runs the `sort-types` subcommand. The saved sort order is marked with `*`.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_sort_types(dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;

    for sort_type in MovieDb::sort_types() {
        let mark = if sort_type.value == config.tmdb.sort_by {
            "*"
        } else {
            " "
        };
        tracing::info!("{mark}{:<28}{}", sort_type.value, sort_type.label);
    }
    Ok(())
}

/// Runs the `years` subcommand.
#[instrument(skip_all)]
fn run_years() {
    let years = year_list();
    tracing::info!(
        "{}",
        years
            .iter()
            .rev()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
}

/// Applies `update` to the saved filters and writes them back.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, `update` rejects the
/// change, or the config cannot be saved. The file is untouched on error.
fn update_filters(
    dir: Option<&PathBuf>,
    update: impl FnOnce(&mut MovieFilters) -> Result<()>,
) -> Result<()> {
    let (config_path, mut config) = load_config(dir)?;
    let mut filters = config.filters.to_filters()?;

    update(&mut filters)?;

    config.filters.store(&filters);
    config
        .save(&config_path)
        .context("failed to save config")?;
    log_filters(&config);
    Ok(())
}

/// Runs the `filters` subcommand.
///
/// # Errors
///
/// Returns an error if the change is rejected or the config cannot be saved.
#[instrument(skip_all)]
fn run_filters(command: &FiltersSubcommands, dir: Option<&PathBuf>) -> Result<()> {
    match command {
        FiltersSubcommands::Show => {
            let (_, config) = load_config(dir)?;
            log_filters(&config);
            Ok(())
        }
        FiltersSubcommands::Genres(cmd) => match &cmd.command {
            GenresFilterSubcommands::Add(args) => update_filters(dir, |filters| {
                filters.add_genres(&args.ids);
                Ok(())
            }),
            GenresFilterSubcommands::Remove(args) => update_filters(dir, |filters| {
                filters.remove_genres(&args.ids);
                Ok(())
            }),
            GenresFilterSubcommands::Reset => update_filters(dir, |filters| {
                filters.reset_genres();
                Ok(())
            }),
        },
        FiltersSubcommands::Years(cmd) => match &cmd.command {
            YearsFilterSubcommands::Set(args) => update_filters(dir, |filters| {
                filters
                    .set_years(args.from, args.to)
                    .context("invalid year range")
            }),
            YearsFilterSubcommands::Reset => update_filters(dir, |filters| {
                filters.reset_years();
                Ok(())
            }),
        },
        FiltersSubcommands::Countries(cmd) => match &cmd.command {
            CountriesFilterSubcommands::Set(args) => update_filters(dir, |filters| {
                filters.update_countries(&normalize_country_codes(&args.codes));
                Ok(())
            }),
            CountriesFilterSubcommands::Reset => update_filters(dir, |filters| {
                filters.reset_countries();
                Ok(())
            }),
        },
        FiltersSubcommands::SortBy(args) => {
            let sort_type = SortType::find(&args.value)
                .with_context(|| format!("unknown sort type: {}", args.value))?;
            let (config_path, mut config) = load_config(dir)?;
            config.tmdb.sort_by = String::from(sort_type.value);
            config
                .save(&config_path)
                .context("failed to save config")?;
            log_filters(&config);
            Ok(())
        }
        FiltersSubcommands::Reset => update_filters(dir, |filters| {
            *filters = MovieFilters::default();
            Ok(())
        }),
    }
}

/// Runs the `tv discover` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_tv_discover(args: &TvDiscoverArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let response = db
        .discover_tv(args.page)
        .await
        .context("TMDB discover/tv request failed")?;

    tracing::info!(
        "Page {}/{} ({} results)",
        response.page,
        response.total_pages,
        response.total_results
    );
    tracing::info!("ID\tYear\tCountry\tName");
    for series in &response.results {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            series.id,
            year_of(series.first_air_date.as_deref()),
            series.origin_country.join(","),
            series.name,
        );
    }
    Ok(())
}

/// Runs the `tv details` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_tv_details(args: &TvDetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let details = db
        .tv_details(args.id)
        .await
        .context("TMDB tv details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!("Name: {}", details.name);
    tracing::info!("Original Name: {}", details.original_name);
    tracing::info!(
        "First Air Date: {}",
        details.first_air_date.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Last Air Date: {}",
        details.last_air_date.as_deref().unwrap_or("-")
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    tracing::info!("Seasons: {}", details.number_of_seasons);
    tracing::info!("Episodes: {}", details.number_of_episodes);
    tracing::info!("Rating: {:.1}", details.vote_average);
    if let Some(path) = details.poster_path.as_deref() {
        tracing::info!("Poster: {}", db.poster_url(POSTER_SIZE, path));
    }
    Ok(())
}

/// Runs the `raw` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
async fn run_raw(args: &RawArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let db = build_movie_db(&config)?;

    let body = db
        .fetch_text(&args.path)
        .await
        .with_context(|| format!("TMDB request failed: {}", args.path))?;

    tracing::info!("{body}");
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Discover(args) => run_discover(&args, dir).await,
        Commands::Movie(args) => run_movie(&args, dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::Countries(cmd) => match cmd.command {
            CountriesSubcommands::List => run_countries_list(dir).await,
            CountriesSubcommands::Probe => run_countries_probe(dir).await,
        },
        Commands::SortTypes => run_sort_types(dir),
        Commands::Years => {
            run_years();
            Ok(())
        }
        Commands::Filters(cmd) => run_filters(&cmd.command, dir),
        Commands::Tv(cmd) => match cmd.command {
            TvSubcommands::Discover(args) => run_tv_discover(&args, dir).await,
            TvSubcommands::Details(args) => run_tv_details(&args, dir).await,
        },
        Commands::Raw(args) => run_raw(&args, dir).await,
    }
}
