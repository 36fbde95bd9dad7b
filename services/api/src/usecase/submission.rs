//! Onboarding and check-in answers: submission, history, and the admin
//! aggregator that flattens embedded answers into reportable rows.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use stillwater_domain::answer::{
    AnswerValue, EmbeddedAnswer, QuestionKind, merge_answers, next_streak,
};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::SubmissionFilter;
use crate::domain::repository::{AppUserRepository, QuestionRepository};
use crate::domain::types::{AnswerSet, AppUser, Submission, SubmissionRow};
use crate::error::ApiError;

pub const DELETED_QUESTION_TITLE: &str = "Deleted question";

/// A submitted answer before validation.
#[derive(Debug, Clone)]
pub struct RawAnswer {
    pub question_id: Uuid,
    pub value: Value,
}

/// Validate every answer against its question. Any unknown, inactive or
/// wrong-kind question rejects the whole submission.
pub async fn validate_answers<Q: QuestionRepository>(
    questions: &Q,
    kind: QuestionKind,
    raw: &[RawAnswer],
    answered_at: DateTime<Utc>,
    checkin_date: Option<NaiveDate>,
) -> Result<Vec<EmbeddedAnswer>, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::validation("answers must not be empty"));
    }
    let mut seen = HashSet::with_capacity(raw.len());
    for answer in raw {
        if !seen.insert(answer.question_id) {
            return Err(ApiError::validation(format!(
                "question {} answered more than once",
                answer.question_id
            )));
        }
    }

    let ids: Vec<Uuid> = seen.into_iter().collect();
    let known: HashMap<Uuid, _> = questions
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .filter(|q| q.is_active && q.kind == kind)
        .map(|q| (q.id, q))
        .collect();

    raw.iter()
        .map(|answer| {
            let question = known
                .get(&answer.question_id)
                .ok_or(ApiError::InvalidQuestion(answer.question_id))?;
            let value =
                AnswerValue::from_json(question.question_type, &question.options, &answer.value)
                    .map_err(|source| ApiError::InvalidAnswer {
                        question_id: answer.question_id,
                        source,
                    })?;
            Ok(EmbeddedAnswer {
                question_id: answer.question_id,
                value,
                answered_at,
                checkin_date,
            })
        })
        .collect()
}

async fn existing_answers<U: AppUserRepository>(
    users: &U,
    kind: QuestionKind,
    user_id: Uuid,
) -> Result<Vec<EmbeddedAnswer>, ApiError> {
    Ok(users
        .load_answer_sets(kind, Some(user_id))
        .await?
        .into_iter()
        .next()
        .map(|set| set.answers)
        .unwrap_or_default())
}

// ── Onboarding ───────────────────────────────────────────────────────────────

pub struct SubmitOnboardingUseCase<U: AppUserRepository, Q: QuestionRepository> {
    pub users: U,
    pub questions: Q,
}

impl<U: AppUserRepository, Q: QuestionRepository> SubmitOnboardingUseCase<U, Q> {
    /// Returns the user's full onboarding collection after the merge.
    pub async fn execute(
        &self,
        user: &AppUser,
        raw: &[RawAnswer],
    ) -> Result<Vec<EmbeddedAnswer>, ApiError> {
        let incoming =
            validate_answers(&self.questions, QuestionKind::Onboarding, raw, Utc::now(), None)
                .await?;
        let existing = existing_answers(&self.users, QuestionKind::Onboarding, user.id).await?;
        let merged = merge_answers(existing, incoming);
        self.users.save_onboarding_answers(user.id, &merged).await?;
        Ok(merged)
    }
}

// ── Check-in ─────────────────────────────────────────────────────────────────

pub struct CheckinResult {
    pub date: NaiveDate,
    pub answers: Vec<EmbeddedAnswer>,
    pub streak: i32,
}

pub struct SubmitCheckinUseCase<U: AppUserRepository, Q: QuestionRepository> {
    pub users: U,
    pub questions: Q,
}

impl<U: AppUserRepository, Q: QuestionRepository> SubmitCheckinUseCase<U, Q> {
    pub async fn execute(&self, user: &AppUser, raw: &[RawAnswer]) -> Result<CheckinResult, ApiError> {
        self.execute_at(user, raw, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        user: &AppUser,
        raw: &[RawAnswer],
        now: DateTime<Utc>,
    ) -> Result<CheckinResult, ApiError> {
        let today = now.date_naive();
        let incoming =
            validate_answers(&self.questions, QuestionKind::Checkin, raw, now, Some(today)).await?;
        let existing = existing_answers(&self.users, QuestionKind::Checkin, user.id).await?;
        let merged = merge_answers(existing, incoming);

        let streak = next_streak(user.streak, user.last_checkin_date, today);
        self.users
            .save_checkin(user.id, &merged, streak, today)
            .await?;

        let answers = merged
            .into_iter()
            .filter(|a| a.checkin_date == Some(today))
            .collect();
        Ok(CheckinResult {
            date: today,
            answers,
            streak,
        })
    }
}

// ── Aggregator ───────────────────────────────────────────────────────────────

/// One row per (user × answer), filtered and sorted newest first.
pub fn flatten_submissions(sets: Vec<AnswerSet>, filter: &SubmissionFilter) -> Vec<SubmissionRow> {
    let mut rows: Vec<SubmissionRow> = sets
        .into_iter()
        .filter(|set| filter.user_id.is_none_or(|id| id == set.user_id))
        .flat_map(|set| {
            let AnswerSet {
                user_id,
                name,
                email,
                answers,
            } = set;
            answers.into_iter().map(move |answer| SubmissionRow {
                user_id,
                user_name: name.clone(),
                user_email: email.clone(),
                question_id: answer.question_id,
                answered_at: answer.answered_at,
                checkin_date: answer.checkin_date,
                value: answer.value,
            })
        })
        .filter(|row| filter.question_id.is_none_or(|id| id == row.question_id))
        .filter(|row| {
            filter.date.is_none_or(|date| {
                row.checkin_date
                    .unwrap_or_else(|| row.answered_at.date_naive())
                    == date
            })
        })
        .collect();
    rows.sort_by(|a, b| b.answered_at.cmp(&a.answered_at));
    rows
}

/// Attach question titles and types to one page of rows, looking up only the
/// questions that appear on the page.
pub async fn enrich_page<Q: QuestionRepository>(
    questions: &Q,
    page: Paginated<SubmissionRow>,
) -> Result<Paginated<Submission>, ApiError> {
    let mut ids: Vec<Uuid> = page.items.iter().map(|row| row.question_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let found: HashMap<Uuid, _> = if ids.is_empty() {
        HashMap::new()
    } else {
        questions
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|q| (q.id, q))
            .collect()
    };

    Ok(page.map(|row| match found.get(&row.question_id) {
        Some(q) => Submission {
            question_title: q.title.clone(),
            question_type: Some(q.question_type),
            row,
        },
        None => Submission {
            question_title: DELETED_QUESTION_TITLE.to_owned(),
            question_type: None,
            row,
        },
    }))
}

pub struct ListSubmissionsUseCase<U: AppUserRepository, Q: QuestionRepository> {
    pub users: U,
    pub questions: Q,
}

impl<U: AppUserRepository, Q: QuestionRepository> ListSubmissionsUseCase<U, Q> {
    pub async fn execute(
        &self,
        kind: QuestionKind,
        filter: &SubmissionFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Submission>, ApiError> {
        let sets = self.users.load_answer_sets(kind, filter.user_id).await?;
        let rows = flatten_submissions(sets, filter);
        enrich_page(&self.questions, Paginated::slice(rows, page)).await
    }
}
