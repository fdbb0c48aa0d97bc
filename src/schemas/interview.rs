use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Interview, InterviewAnswer, InterviewAttempt, InterviewQuestion};
use crate::db::types::AttemptStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct InterviewGenerateRequest {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "jobRole")]
    #[validate(length(min = 1, message = "job_role must not be empty"))]
    pub(crate) job_role: String,
    #[serde(default = "default_difficulty")]
    pub(crate) difficulty: String,
    #[serde(default = "default_question_count")]
    #[serde(alias = "questionCount")]
    #[validate(range(min = 1, max = 20, message = "question_count must be between 1 and 20"))]
    pub(crate) question_count: u8,
    #[serde(default = "default_time_limit")]
    #[serde(alias = "timeLimitMinutes")]
    #[validate(range(min = 1, message = "time_limit_minutes must be positive"))]
    pub(crate) time_limit_minutes: i32,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_question_count() -> u8 {
    5
}

fn default_time_limit() -> i32 {
    30
}

#[derive(Debug, Serialize)]
pub(crate) struct InterviewResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) job_role: String,
    pub(crate) difficulty: String,
    pub(crate) time_limit_minutes: i32,
    pub(crate) is_published: bool,
    pub(crate) ai_generated: bool,
    pub(crate) question_count: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl InterviewResponse {
    pub(crate) fn from_db(interview: Interview, question_count: i64) -> Self {
        Self {
            id: interview.id,
            course_id: interview.course_id,
            title: interview.title,
            description: interview.description,
            job_role: interview.job_role,
            difficulty: interview.difficulty,
            time_limit_minutes: interview.time_limit_minutes,
            is_published: interview.is_published,
            ai_generated: interview.ai_generated,
            question_count,
            created_at: format_primitive(interview.created_at),
            updated_at: format_primitive(interview.updated_at),
        }
    }
}

/// Question as presented to the candidate. The sample answer and key points
/// stay server-side until evaluation.
#[derive(Debug, Serialize)]
pub(crate) struct InterviewQuestionPublicResponse {
    pub(crate) id: String,
    pub(crate) interview_id: String,
    pub(crate) question_text: String,
    pub(crate) difficulty: String,
    pub(crate) question_order: i32,
}

impl InterviewQuestionPublicResponse {
    pub(crate) fn from_db(question: InterviewQuestion) -> Self {
        Self {
            id: question.id,
            interview_id: question.interview_id,
            question_text: question.question_text,
            difficulty: question.difficulty,
            question_order: question.question_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InterviewQuestionManageResponse {
    pub(crate) id: String,
    pub(crate) interview_id: String,
    pub(crate) question_text: String,
    pub(crate) sample_answer: String,
    pub(crate) key_points: Vec<String>,
    pub(crate) difficulty: String,
    pub(crate) question_order: i32,
}

impl InterviewQuestionManageResponse {
    pub(crate) fn from_db(question: InterviewQuestion) -> Self {
        Self {
            id: question.id,
            interview_id: question.interview_id,
            question_text: question.question_text,
            sample_answer: question.sample_answer,
            key_points: question.key_points.0,
            difficulty: question.difficulty,
            question_order: question.question_order,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct InterviewAnswerSubmit {
    #[serde(alias = "questionId")]
    pub(crate) question_id: String,
    #[serde(alias = "answerText")]
    #[validate(length(min = 1, message = "answer_text must not be empty"))]
    pub(crate) answer_text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct InterviewAttemptResponse {
    pub(crate) id: String,
    pub(crate) interview_id: String,
    pub(crate) student_id: String,
    pub(crate) status: AttemptStatus,
    pub(crate) total_questions: i32,
    pub(crate) overall_score: Option<i32>,
    pub(crate) started_at: String,
    pub(crate) completed_at: Option<String>,
}

impl InterviewAttemptResponse {
    pub(crate) fn from_db(attempt: InterviewAttempt) -> Self {
        Self {
            id: attempt.id,
            interview_id: attempt.interview_id,
            student_id: attempt.student_id,
            status: attempt.status,
            total_questions: attempt.total_questions,
            overall_score: attempt.overall_score,
            started_at: format_primitive(attempt.started_at),
            completed_at: attempt.completed_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InterviewAnswerResponse {
    pub(crate) id: String,
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) answer_text: String,
    pub(crate) ai_score: Option<i32>,
    pub(crate) ai_feedback: Option<String>,
    pub(crate) strengths: Vec<String>,
    pub(crate) improvements: Vec<String>,
    pub(crate) answered_at: String,
}

impl InterviewAnswerResponse {
    pub(crate) fn from_db(answer: InterviewAnswer) -> Self {
        Self {
            id: answer.id,
            attempt_id: answer.attempt_id,
            question_id: answer.question_id,
            answer_text: answer.answer_text,
            ai_score: answer.ai_score,
            ai_feedback: answer.ai_feedback,
            strengths: answer.strengths.0,
            improvements: answer.improvements.0,
            answered_at: format_primitive(answer.answered_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InterviewResultResponse {
    #[serde(flatten)]
    pub(crate) attempt: InterviewAttemptResponse,
    pub(crate) answers: Vec<InterviewAnswerResponse>,
}
