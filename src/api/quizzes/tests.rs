use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::types::{ContentType, CourseStatus, UserRole};
use crate::repositories;
use crate::test_support;

async fn insert_free_content(pool: &PgPool, course_id: &str) -> String {
    insert_content(pool, course_id, true).await
}

async fn insert_content(pool: &PgPool, course_id: &str, published: bool) -> String {
    let now = primitive_now_utc();
    let module = repositories::modules::create(
        pool,
        repositories::modules::CreateModule {
            id: &Uuid::new_v4().to_string(),
            course_id,
            title: "Quiz Module",
            description: None,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert module");

    let content = repositories::contents::create(
        pool,
        repositories::contents::CreateContent {
            id: &Uuid::new_v4().to_string(),
            module_id: &module.id,
            title: "Quiz Content",
            description: None,
            content_type: ContentType::Quiz,
            video_url: None,
            pdf_url: None,
            content_url: None,
            thumbnail_url: None,
            duration_seconds: None,
            file_size: None,
            is_free: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert content");

    if published {
        repositories::contents::set_published(pool, &content.id, true, now)
            .await
            .expect("publish content");
    }

    content.id
}

#[tokio::test]
async fn quiz_attempt_scores_and_passes() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "quiz1@example.com", UserRole::Instructor).await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Quiz Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let content_id = insert_free_content(ctx.state.db(), &course.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/content/{content_id}"),
            Some(&owner_token),
            Some(json!({"title": "Checkpoint", "passing_score": 70, "max_attempts": 3})),
        ))
        .await
        .expect("create quiz");
    let status = response.status();
    let quiz = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {quiz}");
    let quiz_id = quiz["id"].as_str().expect("quiz id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/questions"),
            Some(&owner_token),
            Some(json!({
                "question_text": "What does ? do in Rust?",
                "points": 2,
                "options": [
                    {"option_text": "Propagates errors", "is_correct": true},
                    {"option_text": "Panics", "is_correct": false}
                ]
            })),
        ))
        .await
        .expect("add question");
    let question = test_support::read_json(response).await;
    let question_id = question["id"].as_str().expect("question id").to_string();
    let correct_option_id = question["options"]
        .as_array()
        .expect("options")
        .iter()
        .find(|option| option["is_correct"] == true)
        .and_then(|option| option["id"].as_str())
        .expect("correct option")
        .to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/publish"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("publish quiz");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let student =
        test_support::insert_user(ctx.state.db(), "quizstudent1@example.com", UserRole::Student)
            .await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/attempts/start"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("start attempt");
    let status = response.status();
    let attempt = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {attempt}");
    let attempt_id = attempt["id"].as_str().expect("attempt id").to_string();

    // Starting again resumes the same open attempt.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/attempts/start"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("resume attempt");
    let status = response.status();
    let resumed = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {resumed}");
    assert_eq!(resumed["id"].as_str(), Some(attempt_id.as_str()));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/attempts/{attempt_id}/answers"),
            Some(&student_token),
            Some(json!({"question_id": question_id, "selected_option_id": correct_option_id})),
        ))
        .await
        .expect("submit answer");
    let answered = test_support::read_json(response).await;
    assert_eq!(answered["is_correct"], true, "response: {answered}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/attempts/{attempt_id}/complete"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("complete attempt");
    let result = test_support::read_json(response).await;
    assert_eq!(result["score"], 100, "response: {result}");
    assert_eq!(result["passed"], true);
    assert_eq!(result["earned_points"], 2);
    assert_eq!(result["status"], "completed");
}

#[tokio::test]
async fn attempt_cap_returns_conflict() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "quiz2@example.com", UserRole::Instructor).await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "One Shot Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let content_id = insert_free_content(ctx.state.db(), &course.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/content/{content_id}"),
            Some(&owner_token),
            Some(json!({"title": "One Shot", "max_attempts": 1})),
        ))
        .await
        .expect("create quiz");
    let quiz = test_support::read_json(response).await;
    let quiz_id = quiz["id"].as_str().expect("quiz id").to_string();

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/publish"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("publish quiz");

    let student =
        test_support::insert_user(ctx.state.db(), "quizstudent2@example.com", UserRole::Student)
            .await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/attempts/start"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("start attempt");
    let attempt = test_support::read_json(response).await;
    let attempt_id = attempt["id"].as_str().expect("attempt id").to_string();

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/attempts/{attempt_id}/complete"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("complete attempt");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/attempts/start"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("start over cap");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn question_without_correct_option_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "quiz3@example.com", UserRole::Instructor).await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Strict Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let content_id = insert_free_content(ctx.state.db(), &course.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/content/{content_id}"),
            Some(&owner_token),
            Some(json!({"title": "Strict"})),
        ))
        .await
        .expect("create quiz");
    let quiz = test_support::read_json(response).await;
    let quiz_id = quiz["id"].as_str().expect("quiz id").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/quizzes/{quiz_id}/questions"),
            Some(&owner_token),
            Some(json!({
                "question_text": "No right answer here",
                "options": [
                    {"option_text": "Nope", "is_correct": false},
                    {"option_text": "Also nope", "is_correct": false}
                ]
            })),
        ))
        .await
        .expect("add bad question");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quiz_by_content_is_public_behind_published_content() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "quiz4@example.com", UserRole::Instructor).await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Open Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let published_content = insert_content(ctx.state.db(), &course.id, true).await;
    let hidden_content = insert_content(ctx.state.db(), &course.id, false).await;

    for content_id in [&published_content, &hidden_content] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/quizzes/content/{content_id}"),
                Some(&owner_token),
                Some(json!({"title": "Checkpoint"})),
            ))
            .await
            .expect("create quiz");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // No token needed once the content is published.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/content/{published_content}"),
            None,
            None,
        ))
        .await
        .expect("fetch quiz anonymously");
    let status = response.status();
    let quiz = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {quiz}");
    assert_eq!(quiz["title"], "Checkpoint");

    // Unpublished content hides its quiz from everyone but the owner.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/content/{hidden_content}"),
            None,
            None,
        ))
        .await
        .expect("fetch hidden quiz anonymously");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let student =
        test_support::insert_user(ctx.state.db(), "quizstudent3@example.com", UserRole::Student)
            .await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/content/{hidden_content}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("fetch hidden quiz as student");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/quizzes/content/{hidden_content}"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("fetch hidden quiz as owner");
    assert_eq!(response.status(), StatusCode::OK);
}
