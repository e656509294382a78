//! Default request parameters and the sort-type catalog.

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default discover sort order.
pub const DEFAULT_SORT_BY: &str = "popularity.desc";

/// Request parameters sent with every discover call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Include adult titles (default: `false`).
    pub include_adult: bool,
    /// Include video-only releases (default: `false`).
    pub include_video: bool,
    /// Initial sort order (default: "popularity.desc").
    pub sort_by: String,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            include_adult: false,
            include_video: false,
            sort_by: String::from(DEFAULT_SORT_BY),
        }
    }
}

impl RequestParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the adult content flag.
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Sets the video flag.
    #[must_use]
    pub const fn include_video(mut self, include: bool) -> Self {
        self.include_video = include;
        self
    }

    /// Sets the initial sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }
}

/// A sort order accepted by `discover/movie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortType {
    /// Query value (e.g. "popularity.desc").
    pub value: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

impl SortType {
    /// Looks up a catalog entry by its query value.
    #[must_use]
    pub fn find(value: &str) -> Option<&'static Self> {
        SORT_TYPES.iter().find(|sort_type| sort_type.value == value)
    }
}

/// Every sort order offered to users, in display order.
pub static SORT_TYPES: [SortType; 14] = [
    SortType {
        value: "original_title.asc",
        label: "Original title asc",
    },
    SortType {
        value: "original_title.desc",
        label: "Original title desc",
    },
    SortType {
        value: "popularity.asc",
        label: "Popularity asc",
    },
    SortType {
        value: "popularity.desc",
        label: "Popularity desc",
    },
    SortType {
        value: "revenue.asc",
        label: "Revenue asc",
    },
    SortType {
        value: "revenue.desc",
        label: "Revenue desc",
    },
    SortType {
        value: "primary_release_date.asc",
        label: "Primary release date asc",
    },
    SortType {
        value: "primary_release_date.desc",
        label: "Primary release date desc",
    },
    SortType {
        value: "title.asc",
        label: "Title asc",
    },
    SortType {
        value: "title.desc",
        label: "Title desc",
    },
    SortType {
        value: "vote_average.asc",
        label: "Vote average asc",
    },
    SortType {
        value: "vote_average.desc",
        label: "Vote average desc",
    },
    SortType {
        value: "vote_count.asc",
        label: "Vote count asc",
    },
    SortType {
        value: "vote_count.desc",
        label: "Vote count desc",
    },
];
