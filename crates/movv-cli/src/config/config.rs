//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use movv_api::tmdb::{DEFAULT_LANGUAGE, DEFAULT_SORT_BY, MovieFilters, RequestParams};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB credentials and request parameters.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Persisted discover filters.
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// TMDB credentials and default request parameters.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// v3 API key (overridden by `TMDB_API_KEY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language.
    pub language: String,
    /// Include adult titles.
    pub include_adult: bool,
    /// Include video-only releases.
    pub include_video: bool,
    /// Sort order.
    pub sort_by: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: String::from(DEFAULT_LANGUAGE),
            include_adult: false,
            include_video: false,
            sort_by: String::from(DEFAULT_SORT_BY),
        }
    }
}

impl TmdbConfig {
    /// Converts to client request parameters.
    #[must_use]
    pub fn request_params(&self) -> RequestParams {
        RequestParams::default()
            .language(&self.language)
            .include_adult(self.include_adult)
            .include_video(self.include_video)
            .sort_by(&self.sort_by)
    }
}

/// Persisted discover filters.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FiltersConfig {
    /// Selected genre IDs.
    #[serde(default)]
    pub genres: Vec<u32>,
    /// Release year range as `[from, to]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<[i32; 2]>,
    /// Selected origin country codes.
    #[serde(default)]
    pub countries: Vec<String>,
    /// Countries found to have no movies by `countries probe`.
    #[serde(default)]
    pub no_movie_countries: Vec<String>,
}

impl FiltersConfig {
    /// Builds validated filter state.
    ///
    /// # Errors
    ///
    /// Returns an error if `years` is not ascending.
    pub fn to_filters(&self) -> Result<MovieFilters> {
        let mut filters = MovieFilters::default();
        filters.add_genres(&self.genres);
        if let Some(years) = self.years {
            filters
                .set_years_from_slice(&years)
                .context("invalid [filters] years")?;
        }
        filters.update_countries(&self.countries);
        Ok(filters)
    }

    /// Stores filter state, keeping the cached no-result countries.
    pub fn store(&mut self, filters: &MovieFilters) {
        self.genres = filters.genres().to_vec();
        self.years = filters.years().map(|range| [range.start(), range.end()]);
        self.countries = filters.countries().to_vec();
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.api_key.is_none());
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.tmdb.sort_by, "popularity.desc");
        assert!(config.filters.genres.is_empty());
        assert!(config.filters.years.is_none());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_key: Some(String::from("abc123")),
                language: String::from("fr-FR"),
                ..TmdbConfig::default()
            },
            filters: FiltersConfig {
                genres: vec![18, 35],
                years: Some([1970, 1977]),
                countries: vec![String::from("FR")],
                no_movie_countries: vec![String::from("AQ")],
            },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\nlanguage = \"ja-JP\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.language, "ja-JP");
        assert_eq!(config.tmdb.sort_by, "popularity.desc");
        assert_eq!(config.filters, FiltersConfig::default());
    }

    #[test]
    fn test_request_params_from_config() {
        // Arrange
        let tmdb = TmdbConfig {
            include_adult: true,
            sort_by: String::from("title.asc"),
            ..TmdbConfig::default()
        };

        // Act
        let params = tmdb.request_params();

        // Assert
        assert!(params.include_adult);
        assert_eq!(params.sort_by, "title.asc");
        assert_eq!(params.language, "en-US");
    }

    #[test]
    fn test_to_filters_rejects_descending_years() {
        // Arrange
        let filters = FiltersConfig {
            years: Some([1990, 1980]),
            ..FiltersConfig::default()
        };

        // Act
        let result = filters.to_filters();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("invalid [filters] years")
        );
    }

    #[test]
    fn test_store_keeps_no_movie_countries() {
        // Arrange
        let mut config = FiltersConfig {
            no_movie_countries: vec![String::from("AQ")],
            ..FiltersConfig::default()
        };
        let mut filters = MovieFilters::default();
        filters.add_genres(&[18]);
        filters.set_years(2000, 2010).unwrap();

        // Act
        config.store(&filters);

        // Assert
        assert_eq!(config.genres, vec![18]);
        assert_eq!(config.years, Some([2000, 2010]));
        assert_eq!(config.no_movie_countries, vec![String::from("AQ")]);
        assert_eq!(config.to_filters().unwrap(), filters);
    }
}
