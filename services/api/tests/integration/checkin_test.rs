use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use stillwater_api::domain::filter::SubmissionFilter;
use stillwater_api::error::ApiError;
use stillwater_api::usecase::submission::{
    DELETED_QUESTION_TITLE, ListSubmissionsUseCase, RawAnswer, SubmitCheckinUseCase,
    SubmitOnboardingUseCase,
};
use stillwater_domain::answer::{AnswerValue, QuestionKind, QuestionType};

use crate::helpers::{MockQuestionRepo, MockUserRepo, StoredUser, test_question, test_user};

fn raw(question_id: Uuid, value: serde_json::Value) -> RawAnswer {
    RawAnswer { question_id, value }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

// ── SubmitOnboardingUseCase ──────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_onboarding_answer_for_same_question() {
    let user = test_user();
    let question = test_question(QuestionKind::Onboarding, QuestionType::Text, 0);
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SubmitOnboardingUseCase {
        users: users.clone(),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    usecase
        .execute(&user, &[raw(question.id, json!("first"))])
        .await
        .unwrap();
    let answers = usecase
        .execute(&user, &[raw(question.id, json!("  second "))])
        .await
        .unwrap();

    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].value, AnswerValue::Text("second".to_owned()));
    assert_eq!(users.stored(user.id).unwrap().onboarding, answers);
}

#[tokio::test]
async fn should_reject_whole_submission_when_one_question_is_unknown() {
    let user = test_user();
    let known = test_question(QuestionKind::Onboarding, QuestionType::Text, 0);
    let unknown = Uuid::new_v4();
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SubmitOnboardingUseCase {
        users: users.clone(),
        questions: MockQuestionRepo::new(vec![known.clone()]),
    };

    let result = usecase
        .execute(
            &user,
            &[raw(known.id, json!("fine")), raw(unknown, json!("lost"))],
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidQuestion(id)) if id == unknown),
        "expected InvalidQuestion, got {result:?}"
    );
    assert!(users.stored(user.id).unwrap().onboarding.is_empty());
}

#[tokio::test]
async fn should_reject_checkin_question_in_onboarding_submission() {
    let user = test_user();
    let question = test_question(QuestionKind::Checkin, QuestionType::Text, 0);
    let usecase = SubmitOnboardingUseCase {
        users: MockUserRepo::new(vec![StoredUser::new(user.clone())]),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let result = usecase
        .execute(&user, &[raw(question.id, json!("wrong kind"))])
        .await;
    assert!(matches!(result, Err(ApiError::InvalidQuestion(_))));
}

#[tokio::test]
async fn should_reject_answer_that_does_not_fit_question_type() {
    let user = test_user();
    let question = test_question(QuestionKind::Onboarding, QuestionType::SingleChoice, 0);
    let usecase = SubmitOnboardingUseCase {
        users: MockUserRepo::new(vec![StoredUser::new(user.clone())]),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let result = usecase
        .execute(&user, &[raw(question.id, json!("not an option"))])
        .await;
    assert!(matches!(
        result,
        Err(ApiError::InvalidAnswer { question_id, .. }) if question_id == question.id
    ));
}

#[tokio::test]
async fn should_reject_duplicate_question_ids() {
    let user = test_user();
    let question = test_question(QuestionKind::Onboarding, QuestionType::Number, 0);
    let usecase = SubmitOnboardingUseCase {
        users: MockUserRepo::new(vec![StoredUser::new(user.clone())]),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let result = usecase
        .execute(
            &user,
            &[raw(question.id, json!(1)), raw(question.id, json!(2))],
        )
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── SubmitCheckinUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_extend_streak_on_consecutive_days() {
    let mut user = test_user();
    user.streak = 3;
    user.last_checkin_date = Some(day(9));
    let question = test_question(QuestionKind::Checkin, QuestionType::Number, 0);
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SubmitCheckinUseCase {
        users: users.clone(),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    let result = usecase
        .execute_at(&user, &[raw(question.id, json!(7))], now)
        .await
        .unwrap();

    assert_eq!(result.date, day(10));
    assert_eq!(result.streak, 4);
    let stored = users.stored(user.id).unwrap();
    assert_eq!(stored.user.streak, 4);
    assert_eq!(stored.user.last_checkin_date, Some(day(10)));
    assert_eq!(stored.checkins[0].checkin_date, Some(day(10)));
}

#[tokio::test]
async fn should_restart_streak_after_a_gap() {
    let mut user = test_user();
    user.streak = 12;
    user.last_checkin_date = Some(day(1));
    let question = test_question(QuestionKind::Checkin, QuestionType::Number, 0);
    let usecase = SubmitCheckinUseCase {
        users: MockUserRepo::new(vec![StoredUser::new(user.clone())]),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    let result = usecase
        .execute_at(&user, &[raw(question.id, json!(5))], now)
        .await
        .unwrap();
    assert_eq!(result.streak, 1);
}

#[tokio::test]
async fn should_keep_history_and_replace_same_day_answers() {
    let user = test_user();
    let question = test_question(QuestionKind::Checkin, QuestionType::Number, 0);
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let usecase = SubmitCheckinUseCase {
        users: users.clone(),
        questions: MockQuestionRepo::new(vec![question.clone()]),
    };

    let monday = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
    let tuesday_morning = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    let tuesday_evening = Utc.with_ymd_and_hms(2026, 3, 10, 20, 0, 0).unwrap();

    usecase
        .execute_at(&user, &[raw(question.id, json!(1))], monday)
        .await
        .unwrap();
    let after_monday = users.stored(user.id).unwrap().user;
    usecase
        .execute_at(&after_monday, &[raw(question.id, json!(2))], tuesday_morning)
        .await
        .unwrap();
    let after_morning = users.stored(user.id).unwrap().user;
    let result = usecase
        .execute_at(&after_morning, &[raw(question.id, json!(3))], tuesday_evening)
        .await
        .unwrap();

    assert_eq!(result.streak, 2);
    assert_eq!(result.answers.len(), 1);
    assert_eq!(result.answers[0].value, AnswerValue::Number(3.0));
    assert_eq!(users.stored(user.id).unwrap().checkins.len(), 2);
}

// ── ListSubmissionsUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_flatten_and_label_deleted_questions() {
    let user = test_user();
    let kept = test_question(QuestionKind::Checkin, QuestionType::Number, 0);
    let doomed = test_question(QuestionKind::Checkin, QuestionType::Number, 1);
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let questions = MockQuestionRepo::new(vec![kept.clone(), doomed.clone()]);

    SubmitCheckinUseCase {
        users: users.clone(),
        questions: questions.clone(),
    }
    .execute_at(
        &user,
        &[raw(kept.id, json!(1)), raw(doomed.id, json!(2))],
        Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap(),
    )
    .await
    .unwrap();
    questions.questions.lock().unwrap().retain(|q| q.id != doomed.id);

    let listed = ListSubmissionsUseCase { users, questions }
        .execute(QuestionKind::Checkin, &SubmissionFilter::default(), None)
        .await
        .unwrap();

    assert_eq!(listed.items.len(), 2);
    let deleted = listed
        .items
        .iter()
        .find(|s| s.row.question_id == doomed.id)
        .unwrap();
    assert_eq!(deleted.question_title, DELETED_QUESTION_TITLE);
    assert_eq!(deleted.question_type, None);
    let live = listed
        .items
        .iter()
        .find(|s| s.row.question_id == kept.id)
        .unwrap();
    assert_eq!(live.question_title, kept.title);
    assert_eq!(live.row.user_email, user.email);
}

#[tokio::test]
async fn should_filter_submissions_by_date() {
    let user = test_user();
    let question = test_question(QuestionKind::Checkin, QuestionType::Number, 0);
    let users = MockUserRepo::new(vec![StoredUser::new(user.clone())]);
    let questions = MockQuestionRepo::new(vec![question.clone()]);
    let submit = SubmitCheckinUseCase {
        users: users.clone(),
        questions: questions.clone(),
    };

    submit
        .execute_at(
            &user,
            &[raw(question.id, json!(1))],
            Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    let updated = users.stored(user.id).unwrap().user;
    submit
        .execute_at(
            &updated,
            &[raw(question.id, json!(2))],
            Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let listed = ListSubmissionsUseCase { users, questions }
        .execute(
            QuestionKind::Checkin,
            &SubmissionFilter {
                date: Some(day(9)),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].row.value, AnswerValue::Number(1.0));
}
