//! API client library for movv.
//!
//! Provides the TMDB movie discovery client and its filter state.

/// TMDB API client.
pub mod tmdb;
