use uuid::Uuid;

use stillwater_api::domain::filter::QuestionFilter;
use stillwater_api::domain::types::QuestionPatch;
use stillwater_api::error::ApiError;
use stillwater_api::usecase::question::{
    CreateQuestionInput, CreateQuestionUseCase, DeleteQuestionUseCase, ListQuestionsUseCase,
    ReorderItem, ReorderQuestionsUseCase, UpdateQuestionUseCase,
};
use stillwater_domain::answer::{QuestionKind, QuestionType};

use crate::helpers::{MockQuestionRepo, test_question};

fn input(kind: QuestionKind, order: Option<i32>) -> CreateQuestionInput {
    CreateQuestionInput {
        kind,
        title: "How did you sleep?".to_owned(),
        question_type: QuestionType::Number,
        options: Vec::new(),
        order,
        is_active: None,
    }
}

// ── CreateQuestionUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_append_question_after_highest_order_of_its_kind() {
    let repo = MockQuestionRepo::new(vec![
        test_question(QuestionKind::Checkin, QuestionType::Text, 4),
        test_question(QuestionKind::Onboarding, QuestionType::Text, 9),
    ]);
    let usecase = CreateQuestionUseCase { repo: repo.clone() };

    let question = usecase
        .execute(input(QuestionKind::Checkin, None))
        .await
        .unwrap();

    assert_eq!(question.order, 5);
    assert!(question.is_active);
    assert!(repo.get(question.id).is_some());
}

#[tokio::test]
async fn should_start_order_at_zero_for_empty_kind() {
    let usecase = CreateQuestionUseCase {
        repo: MockQuestionRepo::default(),
    };

    let question = usecase
        .execute(input(QuestionKind::Onboarding, None))
        .await
        .unwrap();
    assert_eq!(question.order, 0);
}

#[tokio::test]
async fn should_keep_explicit_order() {
    let usecase = CreateQuestionUseCase {
        repo: MockQuestionRepo::new(vec![test_question(
            QuestionKind::Checkin,
            QuestionType::Text,
            4,
        )]),
    };

    let question = usecase
        .execute(input(QuestionKind::Checkin, Some(2)))
        .await
        .unwrap();
    assert_eq!(question.order, 2);
}

#[tokio::test]
async fn should_reject_choice_question_without_options() {
    let usecase = CreateQuestionUseCase {
        repo: MockQuestionRepo::default(),
    };

    let result = usecase
        .execute(CreateQuestionInput {
            question_type: QuestionType::MultiChoice,
            ..input(QuestionKind::Checkin, None)
        })
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── UpdateQuestionUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_validate_options_against_existing_type() {
    let question = test_question(QuestionKind::Checkin, QuestionType::SingleChoice, 0);
    let repo = MockQuestionRepo::new(vec![question.clone()]);
    let usecase = UpdateQuestionUseCase { repo: repo.clone() };

    let result = usecase
        .execute(
            question.id,
            QuestionPatch {
                options: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(repo.get(question.id).unwrap().options, question.options);
}

#[tokio::test]
async fn should_drop_options_when_switching_to_free_form() {
    let question = test_question(QuestionKind::Checkin, QuestionType::SingleChoice, 0);
    let usecase = UpdateQuestionUseCase {
        repo: MockQuestionRepo::new(vec![question.clone()]),
    };

    let updated = usecase
        .execute(
            question.id,
            QuestionPatch {
                question_type: Some(QuestionType::Text),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.question_type, QuestionType::Text);
    assert!(updated.options.is_empty());
}

#[tokio::test]
async fn should_report_missing_question_on_update_and_delete() {
    let repo = MockQuestionRepo::default();

    let update = UpdateQuestionUseCase { repo: repo.clone() }
        .execute(Uuid::new_v4(), QuestionPatch::default())
        .await;
    let delete = DeleteQuestionUseCase { repo }
        .execute(Uuid::new_v4())
        .await;

    assert!(matches!(update, Err(ApiError::QuestionNotFound)));
    assert!(matches!(delete, Err(ApiError::QuestionNotFound)));
}

// ── ReorderQuestionsUseCase ──────────────────────────────────────────────────

#[tokio::test]
async fn should_apply_reorder_and_skip_unknown_ids() {
    let a = test_question(QuestionKind::Checkin, QuestionType::Text, 0);
    let b = test_question(QuestionKind::Checkin, QuestionType::Text, 1);
    let repo = MockQuestionRepo::new(vec![a.clone(), b.clone()]);
    let usecase = ReorderQuestionsUseCase { repo: repo.clone() };

    let updated = usecase
        .execute(&[
            ReorderItem { id: a.id, order: 1 },
            ReorderItem { id: b.id, order: 0 },
            ReorderItem {
                id: Uuid::new_v4(),
                order: 7,
            },
        ])
        .await
        .unwrap();

    assert_eq!(updated, 2);
    let listed = ListQuestionsUseCase { repo }
        .execute(&QuestionFilter::active_of(QuestionKind::Checkin), None)
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.items.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[tokio::test]
async fn should_reject_empty_reorder() {
    let usecase = ReorderQuestionsUseCase {
        repo: MockQuestionRepo::default(),
    };

    let result = usecase.execute(&[]).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}
