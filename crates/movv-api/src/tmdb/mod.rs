//! TMDB API client module.
//!
//! Holds the discover state (request parameters, filters, sort order),
//! builds v3 resource URLs from it, and fetches movie, genre, country
//! and TV data.

mod api;
mod client;
mod filters;
mod params;
mod rate_limiter;
mod types;
mod util;

pub use api::{LocalMovieDbApi, MovieDbApi};
pub use client::{MovieDb, MovieDbBuilder};
pub use filters::{FIRST_YEAR, FilterError, MovieFilters, YearRange, year_list};
pub use params::{DEFAULT_LANGUAGE, DEFAULT_SORT_BY, RequestParams, SORT_TYPES, SortType};
pub use types::{
    CastMember, Country, Credits, CrewMember, Genre, GenreList, MovieDetails, MovieListResponse,
    MovieSummary, PagedResponse, ProductionCountry, TvDetails, TvListResponse, TvSummary,
};
pub use util::find_no_movie_countries;
