use chrono::Utc;
use uuid::Uuid;

use stillwater_domain::answer::{QuestionKind, QuestionType};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::QuestionFilter;
use crate::domain::repository::QuestionRepository;
use crate::domain::types::{Question, QuestionPatch};
use crate::error::ApiError;

/// Trim option labels, drop blanks, and require at least one option for
/// choice questions. Free-form questions carry no options.
fn normalize_options(
    question_type: QuestionType,
    options: Vec<String>,
) -> Result<Vec<String>, ApiError> {
    if !question_type.has_options() {
        return Ok(Vec::new());
    }
    let mut cleaned: Vec<String> = Vec::with_capacity(options.len());
    for option in options {
        let option = option.trim().to_owned();
        if !option.is_empty() && !cleaned.contains(&option) {
            cleaned.push(option);
        }
    }
    if cleaned.is_empty() {
        return Err(ApiError::validation(
            "choice questions need at least one option",
        ));
    }
    Ok(cleaned)
}

fn require_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    Ok(title.to_owned())
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListQuestionsUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> ListQuestionsUseCase<R> {
    pub async fn execute(
        &self,
        filter: &QuestionFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Question>, ApiError> {
        self.repo.list(filter, page).await
    }
}

pub struct GetQuestionUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> GetQuestionUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Question, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::QuestionNotFound)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateQuestionInput {
    pub kind: QuestionKind,
    pub title: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct CreateQuestionUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> CreateQuestionUseCase<R> {
    /// Without an explicit `order` the question goes last within its kind.
    pub async fn execute(&self, input: CreateQuestionInput) -> Result<Question, ApiError> {
        let title = require_title(&input.title)?;
        let options = normalize_options(input.question_type, input.options)?;

        let order = match input.order {
            Some(order) => order,
            None => self
                .repo
                .max_order(input.kind)
                .await?
                .map_or(0, |max| max + 1),
        };

        let now = Utc::now();
        let question = Question {
            id: Uuid::now_v7(),
            kind: input.kind,
            title,
            question_type: input.question_type,
            options,
            order,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&question).await?;
        Ok(question)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateQuestionUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> UpdateQuestionUseCase<R> {
    pub async fn execute(&self, id: Uuid, mut patch: QuestionPatch) -> Result<Question, ApiError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::QuestionNotFound)?;

        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(require_title(title)?);
        }
        if patch.question_type.is_some() || patch.options.is_some() {
            let question_type = patch.question_type.unwrap_or(existing.question_type);
            let options = patch.options.take().unwrap_or(existing.options);
            patch.options = Some(normalize_options(question_type, options)?);
        }

        self.repo
            .update(id, &patch)
            .await?
            .ok_or(ApiError::QuestionNotFound)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteQuestionUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> DeleteQuestionUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::QuestionNotFound);
        }
        Ok(())
    }
}

// ── Reorder ──────────────────────────────────────────────────────────────────

pub struct ReorderItem {
    pub id: Uuid,
    pub order: i32,
}

pub struct ReorderQuestionsUseCase<R: QuestionRepository> {
    pub repo: R,
}

impl<R: QuestionRepository> ReorderQuestionsUseCase<R> {
    /// Applies each item as its own update. Unknown ids are skipped; a store
    /// failure stops the loop and leaves earlier updates in place.
    /// Returns the number of questions updated.
    pub async fn execute(&self, items: &[ReorderItem]) -> Result<u64, ApiError> {
        if items.is_empty() {
            return Err(ApiError::validation("items must not be empty"));
        }
        let mut updated = 0;
        for item in items {
            if self.repo.set_order(item.id, item.order).await? {
                updated += 1;
            }
        }
        Ok(updated)
    }
}
