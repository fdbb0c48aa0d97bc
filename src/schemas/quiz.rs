use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{QuestionOption, Quiz, QuizAttempt, QuizQuestion, StudentAnswer};
use crate::db::types::{AttemptStatus, QuestionType};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default = "default_passing_score")]
    #[serde(alias = "passingScore")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: i32,
    #[serde(default)]
    #[serde(alias = "timeLimitMinutes")]
    #[validate(range(min = 1, message = "time_limit_minutes must be positive"))]
    pub(crate) time_limit_minutes: Option<i32>,
    #[serde(default = "default_max_attempts")]
    #[serde(alias = "maxAttempts")]
    #[validate(range(min = 1, message = "max_attempts must be positive"))]
    pub(crate) max_attempts: i32,
    #[serde(default = "default_true")]
    #[serde(alias = "showResultsImmediately")]
    pub(crate) show_results_immediately: bool,
}

fn default_passing_score() -> i32 {
    70
}

fn default_max_attempts() -> i32 {
    3
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[serde(alias = "passingScore")]
    #[validate(range(min = 0, max = 100, message = "passing_score must be between 0 and 100"))]
    pub(crate) passing_score: Option<i32>,
    #[serde(default)]
    #[serde(alias = "timeLimitMinutes")]
    pub(crate) time_limit_minutes: Option<i32>,
    #[serde(default)]
    #[serde(alias = "maxAttempts")]
    #[validate(range(min = 1, message = "max_attempts must be positive"))]
    pub(crate) max_attempts: Option<i32>,
    #[serde(default)]
    #[serde(alias = "showResultsImmediately")]
    pub(crate) show_results_immediately: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct OptionCreate {
    #[serde(alias = "optionText")]
    #[validate(length(min = 1, message = "option_text must not be empty"))]
    pub(crate) option_text: String,
    #[serde(default)]
    #[serde(alias = "isCorrect")]
    pub(crate) is_correct: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub(crate) question_text: String,
    #[serde(default = "default_question_type")]
    #[serde(alias = "questionType")]
    pub(crate) question_type: QuestionType,
    #[serde(default = "default_points")]
    #[validate(range(min = 1, message = "points must be positive"))]
    pub(crate) points: i32,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) options: Vec<OptionCreate>,
}

fn default_question_type() -> QuestionType {
    QuestionType::SingleChoice
}

fn default_points() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub(crate) question_text: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "points must be positive"))]
    pub(crate) points: Option<i32>,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) content_id: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) passing_score: i32,
    pub(crate) time_limit_minutes: Option<i32>,
    pub(crate) max_attempts: i32,
    pub(crate) is_published: bool,
    pub(crate) show_results_immediately: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            content_id: quiz.content_id,
            title: quiz.title,
            description: quiz.description,
            passing_score: quiz.passing_score,
            time_limit_minutes: quiz.time_limit_minutes,
            max_attempts: quiz.max_attempts,
            is_published: quiz.is_published,
            show_results_immediately: quiz.show_results_immediately,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
        }
    }
}

/// Option as a student taking the quiz sees it. Correctness stays server-side.
#[derive(Debug, Serialize)]
pub(crate) struct OptionPublicResponse {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) option_text: String,
    pub(crate) option_order: i32,
}

impl OptionPublicResponse {
    pub(crate) fn from_db(option: QuestionOption) -> Self {
        Self {
            id: option.id,
            question_id: option.question_id,
            option_text: option.option_text,
            option_order: option.option_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionManageResponse {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) option_text: String,
    pub(crate) option_order: i32,
    pub(crate) is_correct: bool,
}

impl OptionManageResponse {
    pub(crate) fn from_db(option: QuestionOption) -> Self {
        Self {
            id: option.id,
            question_id: option.question_id,
            option_text: option.option_text,
            option_order: option.option_order,
            is_correct: option.is_correct,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionPublicResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionType,
    pub(crate) question_order: i32,
    pub(crate) points: i32,
    pub(crate) options: Vec<OptionPublicResponse>,
}

impl QuestionPublicResponse {
    pub(crate) fn from_db(question: QuizQuestion, options: Vec<OptionPublicResponse>) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            question_text: question.question_text,
            question_type: question.question_type,
            question_order: question.question_order,
            points: question.points,
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionManageResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionType,
    pub(crate) question_order: i32,
    pub(crate) points: i32,
    pub(crate) explanation: Option<String>,
    pub(crate) options: Vec<OptionManageResponse>,
}

impl QuestionManageResponse {
    pub(crate) fn from_db(question: QuizQuestion, options: Vec<OptionManageResponse>) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            question_text: question.question_text,
            question_type: question.question_type,
            question_order: question.question_order,
            points: question.points,
            explanation: question.explanation,
            options,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailResponse {
    #[serde(flatten)]
    pub(crate) quiz: QuizResponse,
    pub(crate) questions: Vec<QuestionPublicResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizManageDetailResponse {
    #[serde(flatten)]
    pub(crate) quiz: QuizResponse,
    pub(crate) questions: Vec<QuestionManageResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerSubmit {
    #[serde(alias = "questionId")]
    pub(crate) question_id: String,
    #[serde(alias = "selectedOptionId")]
    pub(crate) selected_option_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) student_id: String,
    pub(crate) attempt_number: i32,
    pub(crate) status: AttemptStatus,
    pub(crate) score: Option<i32>,
    pub(crate) total_points: Option<i32>,
    pub(crate) earned_points: Option<i32>,
    pub(crate) passed: Option<bool>,
    pub(crate) started_at: String,
    pub(crate) completed_at: Option<String>,
    pub(crate) time_spent_minutes: Option<i32>,
}

impl AttemptResponse {
    pub(crate) fn from_db(attempt: QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            student_id: attempt.student_id,
            attempt_number: attempt.attempt_number,
            status: attempt.status,
            score: attempt.score,
            total_points: attempt.total_points,
            earned_points: attempt.earned_points,
            passed: attempt.passed,
            started_at: format_primitive(attempt.started_at),
            completed_at: attempt.completed_at.map(format_primitive),
            time_spent_minutes: attempt.time_spent_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentAnswerResponse {
    pub(crate) id: String,
    pub(crate) attempt_id: String,
    pub(crate) question_id: String,
    pub(crate) selected_option_id: String,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i32,
    pub(crate) answered_at: String,
}

impl StudentAnswerResponse {
    pub(crate) fn from_db(answer: StudentAnswer) -> Self {
        Self {
            id: answer.id,
            attempt_id: answer.attempt_id,
            question_id: answer.question_id,
            selected_option_id: answer.selected_option_id,
            is_correct: answer.is_correct,
            points_earned: answer.points_earned,
            answered_at: format_primitive(answer.answered_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResultResponse {
    #[serde(flatten)]
    pub(crate) attempt: AttemptResponse,
    pub(crate) answers: Vec<StudentAnswerResponse>,
}
