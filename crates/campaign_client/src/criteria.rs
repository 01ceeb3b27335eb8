//! User-controlled listing criteria: search text, status filter, sort key and
//! view mode.

use std::{fmt, str::FromStr};

use shared::domain::CampaignStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaParseError {
    #[error("unknown status filter '{0}'")]
    StatusFilter(String),
    #[error("unknown view mode '{0}' (expected grid or table)")]
    ViewMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CampaignStatus),
}

impl StatusFilter {
    pub fn admits(self, status: CampaignStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CriteriaParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        raw.parse::<CampaignStatus>()
            .map(Self::Only)
            .map_err(|_| CriteriaParseError::StatusFilter(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    NameAsc,
    NameDesc,
    AudienceDesc,
    AudienceAsc,
    /// Keeps the filtered order as-is.
    Unsorted,
}

impl SortKey {
    /// Never fails: anything unrecognized selects [`SortKey::Unsorted`].
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim() {
            "date-desc" => Self::DateDesc,
            "date-asc" => Self::DateAsc,
            "name-asc" => Self::NameAsc,
            "name-desc" => Self::NameDesc,
            "audience-desc" => Self::AudienceDesc,
            "audience-asc" => Self::AudienceAsc,
            _ => Self::Unsorted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::AudienceDesc => "audience-desc",
            Self::AudienceAsc => "audience-asc",
            Self::Unsorted => "unsorted",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Table,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::Table => f.write_str("table"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = CriteriaParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "table" => Ok(Self::Table),
            _ => Err(CriteriaParseError::ViewMode(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCriteria {
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
    pub view_mode: ViewMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let criteria = ListCriteria::default();
        assert_eq!(criteria.search_term, "");
        assert_eq!(criteria.status_filter, StatusFilter::All);
        assert_eq!(criteria.sort_key, SortKey::DateDesc);
        assert_eq!(criteria.view_mode, ViewMode::Grid);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_unsorted() {
        assert_eq!(SortKey::parse_lenient("audience-asc"), SortKey::AudienceAsc);
        assert_eq!(SortKey::parse_lenient("popularity"), SortKey::Unsorted);
        assert_eq!(SortKey::parse_lenient(SortKey::NameDesc.as_str()), SortKey::NameDesc);
    }

    #[test]
    fn parses_status_filter_and_view_mode() {
        assert_eq!("ALL".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "draft".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(CampaignStatus::Draft))
        );
        assert!("paused".parse::<StatusFilter>().is_err());
        assert_eq!("Table".parse::<ViewMode>(), Ok(ViewMode::Table));
        assert!("list".parse::<ViewMode>().is_err());
    }
}
