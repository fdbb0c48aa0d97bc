use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::types::{CourseStatus, UserRole, VideoStatus, VideoType};
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn interrupted_upload_is_marked_failed() {
    let ctx = test_support::setup_test_context().await;

    let instructor =
        test_support::insert_user(ctx.state.db(), "video1@example.com", UserRole::Instructor)
            .await;
    let course = test_support::insert_course(
        ctx.state.db(),
        "Video Course",
        &instructor.id,
        CourseStatus::Published,
    )
    .await;

    let video = repositories::videos::create(
        ctx.state.db(),
        repositories::videos::CreateVideo {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            title: "Interrupted Lesson",
            description: None,
            video_url: None,
            video_type: VideoType::Lesson,
            status: VideoStatus::Processing,
            is_preview: false,
            duration_seconds: None,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("create video");
    assert_eq!(video.status, VideoStatus::Processing);

    let failed = repositories::videos::mark_failed(ctx.state.db(), &video.id, primitive_now_utc())
        .await
        .expect("mark failed")
        .expect("video exists");
    assert_eq!(failed.status, VideoStatus::Failed);

    let reloaded = repositories::videos::find_by_id(ctx.state.db(), &video.id)
        .await
        .expect("reload video")
        .expect("video exists");
    assert_eq!(reloaded.status, VideoStatus::Failed);
    assert!(reloaded.storage_key.is_none());
}
