//! Raw list-query parameters and the typed values parsed out of them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::pagination::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("`{0}` must be \"true\" or \"false\"")]
    InvalidFlag(&'static str),
    #[error("`{0}` must be a positive integer")]
    InvalidNumber(&'static str),
    #[error("`{0}` has an unsupported value")]
    InvalidValue(&'static str),
    #[error("`{0}` must be a date in YYYY-MM-DD format")]
    InvalidDate(&'static str),
    #[error("`{0}` must be a UUID")]
    InvalidId(&'static str),
}

/// Parse a boolean flag. Absent or empty means "no filter", never `false`.
///
/// ```
/// use stillwater_domain::query::parse_flag;
///
/// assert_eq!(parse_flag("active", Some("true")), Ok(Some(true)));
/// assert_eq!(parse_flag("active", Some("false")), Ok(Some(false)));
/// assert_eq!(parse_flag("active", Some("")), Ok(None));
/// assert_eq!(parse_flag("active", None), Ok(None));
/// assert!(parse_flag("active", Some("yes")).is_err());
/// ```
pub fn parse_flag(name: &'static str, value: Option<&str>) -> Result<Option<bool>, QueryError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(QueryError::InvalidFlag(name)),
    }
}

/// Every query parameter a list endpoint recognizes, as raw strings.
///
/// Each resource picks the subset it supports when building its filter;
/// unrecognized parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub active: Option<String>,
    pub archived: Option<String>,
    pub published: Option<String>,
    pub flagged: Option<String>,
    pub mine: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
    pub question_id: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn page_request(&self) -> Result<Option<PageRequest>, QueryError> {
        PageRequest::from_params(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn search(&self) -> Option<String> {
        trimmed(&self.search)
    }

    pub fn tag(&self) -> Option<String> {
        trimmed(&self.tag)
    }

    pub fn author(&self) -> Option<String> {
        trimmed(&self.author)
    }

    pub fn active(&self) -> Result<Option<bool>, QueryError> {
        parse_flag("active", self.active.as_deref())
    }

    pub fn archived(&self) -> Result<Option<bool>, QueryError> {
        parse_flag("archived", self.archived.as_deref())
    }

    pub fn published(&self) -> Result<Option<bool>, QueryError> {
        parse_flag("published", self.published.as_deref())
    }

    pub fn flagged(&self) -> Result<Option<bool>, QueryError> {
        parse_flag("flagged", self.flagged.as_deref())
    }

    pub fn mine(&self) -> Result<Option<bool>, QueryError> {
        parse_flag("mine", self.mine.as_deref())
    }

    pub fn date(&self) -> Result<Option<NaiveDate>, QueryError> {
        trimmed(&self.date)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate("date"))
            })
            .transpose()
    }

    pub fn question_id(&self) -> Result<Option<Uuid>, QueryError> {
        parse_uuid("question_id", &self.question_id)
    }

    pub fn user_id(&self) -> Result<Option<Uuid>, QueryError> {
        parse_uuid("user_id", &self.user_id)
    }
}

/// Parse an enum-valued parameter with the given parser.
pub fn parse_choice<T>(
    name: &'static str,
    value: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, QueryError> {
    trimmed(value)
        .map(|v| parse(&v).ok_or(QueryError::InvalidValue(name)))
        .transpose()
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn parse_uuid(name: &'static str, value: &Option<String>) -> Result<Option<Uuid>, QueryError> {
    trimmed(value)
        .map(|v| v.parse::<Uuid>().map_err(|_| QueryError::InvalidId(name)))
        .transpose()
}

// ── Current-period windows ───────────────────────────────────────────────────

/// A scheduling period relative to the server clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    ThisWeek,
}

/// Inclusive-exclusive UTC window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

impl Period {
    /// Day windows run midnight to midnight; week windows Monday to Monday.
    pub fn window(self, now: DateTime<Utc>) -> Window {
        let today = now.date_naive();
        let (first, days) = match self {
            Period::Today => (today, 1),
            Period::ThisWeek => {
                let offset = i64::from(today.weekday().num_days_from_monday());
                (today - TimeDelta::days(offset), 7)
            }
        };
        let start = first.and_time(NaiveTime::MIN).and_utc();
        Window {
            start,
            end: start + TimeDelta::days(days),
        }
    }
}
