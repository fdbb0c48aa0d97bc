use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{
    AttemptStatus, ContentType, CourseStatus, EnrollmentStatus, MaterialType, PaymentStatus,
    QuestionType, UserRole, VideoStatus, VideoType,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) price: f64,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) instructor_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseModule {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) module_order: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ModuleContent {
    pub(crate) id: String,
    pub(crate) module_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) content_type: ContentType,
    pub(crate) content_order: i32,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) content_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) is_published: bool,
    pub(crate) is_free: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Topic {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) order_index: i32,
    pub(crate) is_published: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct LearningMaterial {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) material_type: MaterialType,
    pub(crate) content_url: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) pdf_url: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) order_index: i32,
    pub(crate) is_published: bool,
    pub(crate) is_free: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) payment_amount: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) progress_percentage: f64,
    pub(crate) overall_score: Option<f64>,
    pub(crate) status: EnrollmentStatus,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) last_accessed_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentProgress {
    pub(crate) id: String,
    pub(crate) enrollment_id: String,
    pub(crate) material_id: String,
    pub(crate) completed: bool,
    pub(crate) progress_percentage: f64,
    pub(crate) time_spent_seconds: i64,
    pub(crate) started_at: Option<PrimitiveDateTime>,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) content_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) passing_score: i32,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) max_attempts: i32,
    pub(crate) is_published: bool,
    pub(crate) show_results_immediately: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizQuestion {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionType,
    pub(crate) question_order: i32,
    pub(crate) points: i32,
    pub(crate) explanation: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuestionOption {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) option_text: String,
    pub(crate) option_order: i32,
    pub(crate) is_correct: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizAttempt {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) attempt_number: i32,
    pub(crate) status: AttemptStatus,
    pub(crate) score: Option<i32>,
    pub(crate) total_points: Option<i32>,
    pub(crate) earned_points: Option<i32>,
    pub(crate) passed: Option<bool>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
    pub(crate) time_spent_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentAnswer {
    pub(crate) id: String,
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) selected_option_id: String,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
    pub(crate) answered_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Interview {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) job_role: String,
    pub(crate) difficulty: String,
    pub(crate) time_limit_minutes: i32,
    pub(crate) is_published: bool,
    pub(crate) ai_generated: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct InterviewQuestion {
    pub(crate) id: String,
    pub(crate) interview_id: String,
    pub(crate) question_text: String,
    pub(crate) sample_answer: String,
    pub(crate) key_points: Json<Vec<String>>,
    pub(crate) difficulty: String,
    pub(crate) question_order: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct InterviewAttempt {
    pub(crate) id: String,
    pub(crate) interview_id: String,
    pub(crate) student_id: String,
    pub(crate) status: AttemptStatus,
    pub(crate) total_questions: i32,
    pub(crate) overall_score: Option<i32>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) completed_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct InterviewAnswer {
    pub(crate) id: String,
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) answer_text: String,
    pub(crate) ai_score: Option<i32>,
    pub(crate) ai_feedback: Option<String>,
    pub(crate) strengths: Json<Vec<String>>,
    pub(crate) improvements: Json<Vec<String>>,
    pub(crate) answered_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Video {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) video_url: Option<String>,
    pub(crate) storage_key: Option<String>,
    pub(crate) video_type: VideoType,
    pub(crate) status: VideoStatus,
    pub(crate) is_preview: bool,
    pub(crate) order_index: i32,
    pub(crate) duration_seconds: Option<i32>,
    pub(crate) file_size: Option<i64>,
    pub(crate) content_hash: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
