use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Interview;
use crate::db::types::{CourseStatus, UserRole};
use crate::repositories;
use crate::test_support;

async fn seed_interview(pool: &PgPool, course_id: &str, published: bool) -> Interview {
    let now = primitive_now_utc();
    let interview = repositories::interviews::create(
        pool,
        repositories::interviews::CreateInterview {
            id: &Uuid::new_v4().to_string(),
            course_id,
            title: "Backend Mock Interview",
            description: None,
            job_role: "Backend Engineer",
            difficulty: "medium",
            time_limit_minutes: 30,
            ai_generated: true,
            created_at: now,
        },
    )
    .await
    .expect("insert interview");

    repositories::interviews::create_question(
        pool,
        repositories::interviews::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            interview_id: &interview.id,
            question_text: "Explain ownership in Rust.",
            sample_answer: "Every value has a single owner; moves transfer it.",
            key_points: &["ownership".to_string(), "moves".to_string()],
            difficulty: "medium",
            question_order: 1,
            created_at: now,
        },
    )
    .await
    .expect("insert question");

    if published {
        repositories::interviews::set_published(pool, &interview.id, true, now)
            .await
            .expect("publish interview");
    }

    interview
}

#[tokio::test]
async fn generate_without_ai_key_returns_service_unavailable() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "iv1@example.com", UserRole::Instructor).await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Interview Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/interviews/generate",
            Some(&token),
            Some(json!({
                "course_id": course.id,
                "title": "Mock Round",
                "job_role": "Backend Engineer"
            })),
        ))
        .await
        .expect("generate interview");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "response: {body}");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn attempt_completes_without_answers_as_unscored() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "iv2@example.com", UserRole::Instructor).await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Paid Interview Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let interview = seed_interview(ctx.state.db(), &course.id, true).await;

    let student =
        test_support::insert_user(ctx.state.db(), "ivstudent2@example.com", UserRole::Student)
            .await;
    test_support::enroll_paid(ctx.state.db(), &student.id, &course.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/interviews/{}/attempts/start", interview.id),
            Some(&token),
            None,
        ))
        .await
        .expect("start attempt");
    let status = response.status();
    let attempt = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {attempt}");
    assert_eq!(attempt["total_questions"], 1);
    let attempt_id = attempt["id"].as_str().expect("attempt id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/interviews/attempts/{attempt_id}/complete"),
            Some(&token),
            None,
        ))
        .await
        .expect("complete attempt");
    let result = test_support::read_json(response).await;
    assert_eq!(result["status"], "completed", "response: {result}");
    assert!(result["overall_score"].is_null());
    assert_eq!(result["answers"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn unpaid_student_cannot_start_attempt() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "iv3@example.com", UserRole::Instructor).await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Gated Interview Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let interview = seed_interview(ctx.state.db(), &course.id, true).await;

    let student =
        test_support::insert_user(ctx.state.db(), "ivstudent3@example.com", UserRole::Student)
            .await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/interviews/{}/attempts/start", interview.id),
            Some(&token),
            None,
        ))
        .await
        .expect("start attempt without payment");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unpublished_interview_is_hidden_from_students() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "iv4@example.com", UserRole::Instructor).await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Draft Interview Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;
    let interview = seed_interview(ctx.state.db(), &course.id, false).await;

    let student =
        test_support::insert_user(ctx.state.db(), "ivstudent4@example.com", UserRole::Student)
            .await;
    test_support::enroll_paid(ctx.state.db(), &student.id, &course.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/interviews/{}", interview.id),
            Some(&token),
            None,
        ))
        .await
        .expect("get draft interview");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees it, with the sample answers.
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/interviews/{}/manage", interview.id),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("get manage view");
    let body = test_support::read_json(response).await;
    assert!(body["questions"][0]["sample_answer"].is_string(), "response: {body}");
}
