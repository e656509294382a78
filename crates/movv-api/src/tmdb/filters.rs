//! Discover filter state: genres, release years and origin countries.

use chrono::{Datelike, Local};

/// First year offered by [`year_list`].
pub const FIRST_YEAR: i32 = 1900;

/// Errors raised when a filter value is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilterError {
    /// A year filter must contain exactly two years.
    InvalidYearCount(usize),
    /// The start year is after the end year.
    DescendingYears {
        /// Requested start year.
        from: i32,
        /// Requested end year.
        to: i32,
    },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidYearCount(count) => {
                write!(f, "years filter must contain exactly 2 years, got {count}")
            }
            Self::DescendingYears { from, to } => {
                write!(f, "years filter must be ascending, got {from} > {to}")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Inclusive primary release year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    from: i32,
    to: i32,
}

impl YearRange {
    /// Creates a range covering `from` through `to`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DescendingYears`] if `from > to`.
    pub const fn new(from: i32, to: i32) -> Result<Self, FilterError> {
        if from > to {
            return Err(FilterError::DescendingYears { from, to });
        }
        Ok(Self { from, to })
    }

    /// Creates a range covering a single year.
    #[must_use]
    pub const fn single(year: i32) -> Self {
        Self {
            from: year,
            to: year,
        }
    }

    /// First year of the range.
    #[must_use]
    pub const fn start(&self) -> i32 {
        self.from
    }

    /// Last year of the range.
    #[must_use]
    pub const fn end(&self) -> i32 {
        self.to
    }

    /// Value for `primary_release_date.gte`.
    #[must_use]
    pub fn gte_date(&self) -> String {
        format!("{}-01-01", self.from)
    }

    /// Value for `primary_release_date.lte`.
    #[must_use]
    pub fn lte_date(&self) -> String {
        format!("{}-12-31", self.to)
    }
}

impl TryFrom<&[i32]> for YearRange {
    type Error = FilterError;

    fn try_from(years: &[i32]) -> Result<Self, Self::Error> {
        match years {
            [from, to] => Self::new(*from, *to),
            _ => Err(FilterError::InvalidYearCount(years.len())),
        }
    }
}

/// Filters applied to `discover/movie`.
///
/// Genre and country lists keep insertion order and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilters {
    genres: Vec<u32>,
    years: Option<YearRange>,
    countries: Vec<String>,
}

impl MovieFilters {
    /// Selected genre IDs.
    #[must_use]
    pub fn genres(&self) -> &[u32] {
        &self.genres
    }

    /// Appends genre IDs to the selection.
    pub fn add_genres(&mut self, ids: &[u32]) {
        self.genres.extend_from_slice(ids);
    }

    /// Removes every occurrence of the given genre IDs.
    pub fn remove_genres(&mut self, ids: &[u32]) {
        self.genres.retain(|id| !ids.contains(id));
    }

    /// Clears the genre selection.
    pub fn reset_genres(&mut self) {
        self.genres.clear();
    }

    /// Selected year range.
    #[must_use]
    pub const fn years(&self) -> Option<YearRange> {
        self.years
    }

    /// Sets the year range. The previous range is kept on error.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DescendingYears`] if `from > to`.
    pub fn set_years(&mut self, from: i32, to: i32) -> Result<(), FilterError> {
        self.years = Some(YearRange::new(from, to)?);
        Ok(())
    }

    /// Sets the year range from a `[from, to]` slice.
    ///
    /// # Errors
    ///
    /// Returns an error unless `years` holds exactly two ascending years.
    pub fn set_years_from_slice(&mut self, years: &[i32]) -> Result<(), FilterError> {
        self.years = Some(YearRange::try_from(years)?);
        Ok(())
    }

    /// Clears the year range.
    pub const fn reset_years(&mut self) {
        self.years = None;
    }

    /// Selected origin country codes (ISO 3166-1).
    #[must_use]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Replaces the country selection.
    pub fn update_countries<S: AsRef<str>>(&mut self, codes: &[S]) {
        self.countries = codes
            .iter()
            .map(|code| String::from(code.as_ref()))
            .collect();
    }

    /// Clears the country selection.
    pub fn reset_countries(&mut self) {
        self.countries.clear();
    }

    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.years.is_none() && self.countries.is_empty()
    }

    /// `with_genres` pair; multiple genres are AND-ed.
    pub(crate) fn genre_pair(&self) -> Option<(&'static str, String)> {
        if self.genres.is_empty() {
            return None;
        }
        let joined = self
            .genres
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Some(("with_genres", joined))
    }

    /// `with_origin_country` pair; multiple countries are OR-ed.
    pub(crate) fn country_pair(&self) -> Option<(&'static str, String)> {
        if self.countries.is_empty() {
            return None;
        }
        Some(("with_origin_country", self.countries.join("|")))
    }

    /// `primary_release_date.gte` / `.lte` pairs.
    pub(crate) fn year_pairs(&self) -> Vec<(&'static str, String)> {
        self.years.map_or_else(Vec::new, |range| {
            vec![
                ("primary_release_date.gte", range.gte_date()),
                ("primary_release_date.lte", range.lte_date()),
            ]
        })
    }
}

/// Every selectable year from [`FIRST_YEAR`] through the current year.
#[must_use]
pub fn year_list() -> Vec<i32> {
    years_through(Local::now().year())
}

fn years_through(last: i32) -> Vec<i32> {
    (FIRST_YEAR..=last).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_add_genres_keeps_duplicates() {
        // Arrange
        let mut filters = MovieFilters::default();

        // Act
        filters.add_genres(&[18, 35]);
        filters.add_genres(&[18]);

        // Assert
        assert_eq!(filters.genres(), &[18, 35, 18]);
    }

    #[test]
    fn test_remove_genres_drops_every_occurrence() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.add_genres(&[18, 35, 18, 99]);

        // Act
        filters.remove_genres(&[18, 12]);

        // Assert
        assert_eq!(filters.genres(), &[35, 99]);
    }

    #[test]
    fn test_reset_genres() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.add_genres(&[18]);

        // Act
        filters.reset_genres();

        // Assert
        assert!(filters.genres().is_empty());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_set_years_ascending() {
        // Arrange
        let mut filters = MovieFilters::default();

        // Act
        filters.set_years(1970, 1977).unwrap();

        // Assert
        let range = filters.years().unwrap();
        assert_eq!(range.start(), 1970);
        assert_eq!(range.end(), 1977);
    }

    #[test]
    fn test_set_years_same_year_allowed() {
        // Arrange
        let mut filters = MovieFilters::default();

        // Act
        filters.set_years(1999, 1999).unwrap();

        // Assert
        assert_eq!(filters.years(), Some(YearRange::single(1999)));
    }

    #[test]
    fn test_set_years_descending_keeps_previous() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.set_years(1970, 1977).unwrap();

        // Act
        let result = filters.set_years(2000, 1990);

        // Assert
        assert_eq!(
            result,
            Err(FilterError::DescendingYears {
                from: 2000,
                to: 1990
            })
        );
        assert_eq!(filters.years(), Some(YearRange::new(1970, 1977).unwrap()));
    }

    #[test]
    fn test_set_years_from_slice_wrong_length() {
        // Arrange
        let mut filters = MovieFilters::default();

        // Act
        let one = filters.set_years_from_slice(&[1970]);
        let three = filters.set_years_from_slice(&[1970, 1980, 1990]);

        // Assert
        assert_eq!(one, Err(FilterError::InvalidYearCount(1)));
        assert_eq!(three, Err(FilterError::InvalidYearCount(3)));
        assert!(filters.years().is_none());
    }

    #[test]
    fn test_set_years_from_slice_descending_keeps_previous() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.set_years_from_slice(&[1970, 1977]).unwrap();

        // Act
        let result = filters.set_years_from_slice(&[1990, 1980]);

        // Assert
        assert_eq!(
            result,
            Err(FilterError::DescendingYears {
                from: 1990,
                to: 1980
            })
        );
        assert_eq!(filters.years(), Some(YearRange::new(1970, 1977).unwrap()));
    }

    #[test]
    fn test_reset_years() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.set_years_from_slice(&[1970, 1977]).unwrap();

        // Act
        filters.reset_years();

        // Assert
        assert!(filters.years().is_none());
    }

    #[test]
    fn test_update_countries_replaces() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.update_countries(&["FR", "BE"]);

        // Act
        filters.update_countries(&[String::from("JP")]);

        // Assert
        assert_eq!(filters.countries(), &[String::from("JP")]);
    }

    #[test]
    fn test_reset_countries() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.update_countries(&["FR"]);

        // Act
        filters.reset_countries();

        // Assert
        assert!(filters.countries().is_empty());
    }

    #[test]
    fn test_year_range_dates() {
        // Arrange
        let range = YearRange::new(1970, 1977).unwrap();

        // Act & Assert
        assert_eq!(range.gte_date(), "1970-01-01");
        assert_eq!(range.lte_date(), "1977-12-31");
    }

    #[test]
    fn test_query_pairs_empty_filters() {
        // Arrange
        let filters = MovieFilters::default();

        // Act & Assert
        assert!(filters.genre_pair().is_none());
        assert!(filters.country_pair().is_none());
        assert!(filters.year_pairs().is_empty());
    }

    #[test]
    fn test_query_pairs_joined() {
        // Arrange
        let mut filters = MovieFilters::default();
        filters.add_genres(&[18, 35]);
        filters.update_countries(&["FR", "IT"]);

        // Act
        let genres = filters.genre_pair().unwrap();
        let countries = filters.country_pair().unwrap();

        // Assert
        assert_eq!(genres, ("with_genres", String::from("18,35")));
        assert_eq!(countries, ("with_origin_country", String::from("FR|IT")));
    }

    #[test]
    fn test_years_through_bounds() {
        // Arrange & Act
        let years = years_through(2024);

        // Assert
        assert_eq!(years[0], 1900);
        assert_eq!(*years.last().unwrap(), 2024);
        assert_eq!(years.len(), 125);
    }

    #[test]
    fn test_year_list_ends_at_current_year() {
        // Arrange & Act
        let years = year_list();

        // Assert
        assert_eq!(*years.last().unwrap(), Local::now().year());
    }

    #[test]
    fn test_filter_error_display() {
        assert_eq!(
            FilterError::InvalidYearCount(3).to_string(),
            "years filter must contain exactly 2 years, got 3"
        );
        assert_eq!(
            FilterError::DescendingYears {
                from: 2000,
                to: 1990
            }
            .to_string(),
            "years filter must be ascending, got 2000 > 1990"
        );
    }
}
