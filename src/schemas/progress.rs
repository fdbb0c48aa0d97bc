use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::StudentProgress;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProgressUpdate {
    #[serde(default)]
    #[serde(alias = "progressPercentage")]
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "progress_percentage must be between 0 and 100"
    ))]
    pub(crate) progress_percentage: Option<f64>,
    #[serde(default)]
    #[serde(alias = "timeSpentSeconds")]
    #[validate(range(min = 0, message = "time_spent_seconds must be non-negative"))]
    pub(crate) time_spent_seconds: Option<i64>,
    #[serde(default)]
    pub(crate) completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) id: String,
    pub(crate) enrollment_id: String,
    pub(crate) material_id: String,
    pub(crate) completed: bool,
    pub(crate) progress_percentage: f64,
    pub(crate) time_spent_seconds: i64,
    pub(crate) started_at: Option<String>,
    pub(crate) completed_at: Option<String>,
    pub(crate) updated_at: String,
}

impl ProgressResponse {
    pub(crate) fn from_db(progress: StudentProgress) -> Self {
        Self {
            id: progress.id,
            enrollment_id: progress.enrollment_id,
            material_id: progress.material_id,
            completed: progress.completed,
            progress_percentage: progress.progress_percentage,
            time_spent_seconds: progress.time_spent_seconds,
            started_at: progress.started_at.map(format_primitive),
            completed_at: progress.completed_at.map(format_primitive),
            updated_at: format_primitive(progress.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentProgressResponse {
    pub(crate) enrollment_id: String,
    pub(crate) completed_count: i64,
    pub(crate) average_progress: f64,
    pub(crate) materials: Vec<ProgressResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseProgressSummary {
    pub(crate) enrollment_id: String,
    pub(crate) course_id: String,
    pub(crate) total_materials: i64,
    pub(crate) completed_materials: i64,
    pub(crate) progress_percentage: f64,
    pub(crate) total_time_spent_seconds: i64,
    pub(crate) materials: Vec<ProgressResponse>,
}
