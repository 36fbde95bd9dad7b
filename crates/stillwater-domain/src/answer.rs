//! Questions and the answers users give to them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Which questionnaire a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Onboarding,
    Checkin,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Checkin => "checkin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "onboarding" => Some(Self::Onboarding),
            "checkin" => Some(Self::Checkin),
            _ => None,
        }
    }
}

/// Declared answer shape of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Number,
    Date,
    SingleChoice,
    MultiChoice,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "single_choice" => Some(Self::SingleChoice),
            "multi_choice" => Some(Self::MultiChoice),
            _ => None,
        }
    }

    pub fn has_options(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("expected a non-empty string")]
    ExpectedText,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expected a date in YYYY-MM-DD format")]
    ExpectedDate,
    #[error("expected one of the question's options")]
    ExpectedOption,
    #[error("expected a non-empty list of the question's options")]
    ExpectedOptionList,
}

/// An answer value, tagged by the shape the question declared.
///
/// Stored and returned as `{ "type": ..., "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Choice(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Validate a raw submitted value against the question's type and options.
    pub fn from_json(
        question_type: QuestionType,
        options: &[String],
        raw: &Value,
    ) -> Result<Self, AnswerError> {
        match question_type {
            QuestionType::Text => match raw.as_str().map(str::trim) {
                Some(s) if !s.is_empty() => Ok(Self::Text(s.to_owned())),
                _ => Err(AnswerError::ExpectedText),
            },
            QuestionType::Number => raw
                .as_f64()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or(AnswerError::ExpectedNumber),
            QuestionType::Date => raw
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
                .map(Self::Date)
                .ok_or(AnswerError::ExpectedDate),
            QuestionType::SingleChoice => match raw.as_str() {
                Some(s) if options.iter().any(|o| o == s) => Ok(Self::Choice(s.to_owned())),
                _ => Err(AnswerError::ExpectedOption),
            },
            QuestionType::MultiChoice => {
                let items = raw.as_array().ok_or(AnswerError::ExpectedOptionList)?;
                if items.is_empty() {
                    return Err(AnswerError::ExpectedOptionList);
                }
                let mut choices = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(s) if options.iter().any(|o| o == s) => {
                            if !choices.iter().any(|c| c == s) {
                                choices.push(s.to_owned());
                            }
                        }
                        _ => return Err(AnswerError::ExpectedOptionList),
                    }
                }
                Ok(Self::Choices(choices))
            }
        }
    }
}

/// An answer embedded in a user's onboarding or check-in collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedAnswer {
    pub question_id: Uuid,
    pub value: AnswerValue,
    pub answered_at: DateTime<Utc>,
    /// Set for check-in answers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkin_date: Option<NaiveDate>,
}

impl EmbeddedAnswer {
    /// Calendar date the answer counts for.
    pub fn effective_date(&self) -> NaiveDate {
        self.checkin_date
            .unwrap_or_else(|| self.answered_at.date_naive())
    }
}

/// Merge new answers into an existing collection.
///
/// An incoming answer replaces any existing answer with the same question id
/// and the same effective date (onboarding answers carry no check-in date,
/// so they replace by question id alone).
pub fn merge_answers(existing: Vec<EmbeddedAnswer>, incoming: Vec<EmbeddedAnswer>) -> Vec<EmbeddedAnswer> {
    let mut merged: Vec<EmbeddedAnswer> = existing
        .into_iter()
        .filter(|old| {
            !incoming.iter().any(|new| {
                new.question_id == old.question_id && new.checkin_date == old.checkin_date
            })
        })
        .collect();
    merged.extend(incoming);
    merged
}

/// Streak after checking in on `today`.
///
/// Checking in again on the same day keeps the streak; checking in the day
/// after the previous check-in extends it; any gap restarts it at 1.
pub fn next_streak(current: i32, last_checkin: Option<NaiveDate>, today: NaiveDate) -> i32 {
    match last_checkin {
        Some(last) if last == today => current.max(1),
        Some(last) if last.succ_opt() == Some(today) => current + 1,
        _ => 1,
    }
}
