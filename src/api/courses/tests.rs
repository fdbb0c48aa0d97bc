use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{CourseStatus, UserRole};
use crate::test_support;

#[tokio::test]
async fn instructor_creates_and_publishes_course() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach1@example.com", UserRole::Instructor)
            .await;
    let token = test_support::bearer_token(&instructor.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/courses",
            Some(&token),
            Some(json!({
                "title": "Rust for Backend Engineers",
                "description": "Ownership and onwards",
                "price": 99.0
            })),
        ))
        .await
        .expect("create course");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["status"], "draft");
    let course_id = created["id"].as_str().expect("course id").to_string();

    // Drafts never show in the public catalog.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/courses", None, None))
        .await
        .expect("list courses");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/courses/{course_id}/publish"),
            Some(&token),
            None,
        ))
        .await
        .expect("publish course");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/courses", None, None))
        .await
        .expect("list courses after publish");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed[0]["id"].as_str(), Some(course_id.as_str()));
    assert!(listed[0]["instructor"]["first_name"].is_string());
}

#[tokio::test]
async fn draft_course_is_hidden_from_non_owners() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach2@example.com", UserRole::Instructor)
            .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Hidden Draft",
        &instructor.id,
        CourseStatus::Draft,
    )
    .await;

    let student =
        test_support::insert_user(ctx.state.db(), "student2@example.com", UserRole::Student).await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/courses/{}", course.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get draft as student");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/courses/{}", course.id),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("get draft as owner");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_owner_instructor_cannot_update_course() {
    let ctx = test_support::setup_test_context().await;

    let owner =
        test_support::insert_user(ctx.state.db(), "owner3@example.com", UserRole::Instructor)
            .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Owned Course",
        &owner.id,
        CourseStatus::Published,
    )
    .await;

    let other =
        test_support::insert_user(ctx.state.db(), "other3@example.com", UserRole::Instructor)
            .await;
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/courses/{}", course.id),
            Some(&other_token),
            Some(json!({"title": "Hijacked"})),
        ))
        .await
        .expect("update as non-owner");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn paid_content_requires_completed_payment() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach4@example.com", UserRole::Instructor)
            .await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Paid Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/courses/{}/modules", course.id),
            Some(&owner_token),
            Some(json!({"title": "Module One"})),
        ))
        .await
        .expect("create module");
    let module = test_support::read_json(response).await;
    let module_id = module["id"].as_str().expect("module id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/modules/{module_id}/content"),
            Some(&owner_token),
            Some(json!({
                "title": "Lesson One",
                "content_type": "video",
                "video_url": "https://example.com/lesson1.mp4",
                "is_free": false
            })),
        ))
        .await
        .expect("create content");
    let content = test_support::read_json(response).await;
    let content_id = content["id"].as_str().expect("content id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/content/{content_id}/publish"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("publish content");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let student =
        test_support::insert_user(ctx.state.db(), "student4@example.com", UserRole::Student).await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/content/{content_id}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get paid content without payment");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    test_support::enroll_paid(ctx.state.db(), &student.id, &course.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/content/{content_id}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get paid content after payment");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_enrollment_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach5@example.com", UserRole::Instructor)
            .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Enroll Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let student =
        test_support::insert_user(ctx.state.db(), "student5@example.com", UserRole::Student).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/enrollments/course/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("first enrollment");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/enrollments/course/{}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("duplicate enrollment");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_cannot_modify_foreign_course() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach6@example.com", UserRole::Instructor)
            .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Instructor Property",
        &instructor.id,
        CourseStatus::Draft,
    )
    .await;

    let admin =
        test_support::insert_user(ctx.state.db(), "admin1@example.com", UserRole::Admin).await;
    let admin_token = test_support::bearer_token(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/courses/{}", course.id),
            Some(&admin_token),
            Some(json!({"title": "Hijacked"})),
        ))
        .await
        .expect("admin update");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/courses/{}/publish", course.id),
            Some(&admin_token),
            None,
        ))
        .await
        .expect("admin publish");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Read bypass stays: drafts remain visible to admins.
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/courses/{}", course.id),
            Some(&admin_token),
            None,
        ))
        .await
        .expect("admin read");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["title"], "Instructor Property");
}

#[tokio::test]
async fn unpublished_module_is_hidden_from_non_owners() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "teach7@example.com", UserRole::Instructor)
            .await;
    let owner_token = test_support::bearer_token(&instructor.id, ctx.state.settings());
    let course = test_support::insert_course(
        ctx.state.db(),
        "Module Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/courses/{}/modules", course.id),
            Some(&owner_token),
            Some(json!({"title": "Hidden Module"})),
        ))
        .await
        .expect("create module");
    let module = test_support::read_json(response).await;
    let module_id = module["id"].as_str().expect("module id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/modules/{module_id}"),
            None,
            None,
        ))
        .await
        .expect("anonymous module fetch");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/modules/{module_id}"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("owner module fetch");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/modules/{module_id}/publish"),
            Some(&owner_token),
            None,
        ))
        .await
        .expect("publish module");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/modules/{module_id}"),
            None,
            None,
        ))
        .await
        .expect("anonymous module fetch after publish");
    assert_eq!(response.status(), StatusCode::OK);
}
