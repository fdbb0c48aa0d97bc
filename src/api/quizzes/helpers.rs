use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::{Quiz, User};
use crate::repositories;
use crate::schemas::quiz::{
    OptionManageResponse, OptionPublicResponse, QuestionManageResponse, QuestionPublicResponse,
};

/// Percentage score, truncating. An empty quiz scores zero.
pub(super) fn compute_score(earned_points: i32, total_points: i32) -> i32 {
    if total_points <= 0 {
        return 0;
    }
    (earned_points * 100) / total_points
}

pub(super) fn is_passing(score: i32, passing_score: i32) -> bool {
    score >= passing_score
}

pub(super) async fn fetch_quiz(state: &AppState, quiz_id: &str) -> Result<Quiz, ApiError> {
    repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz {quiz_id} not found")))
}

pub(super) async fn require_quiz_owner(
    state: &AppState,
    user: &User,
    quiz_id: &str,
) -> Result<Quiz, ApiError> {
    let quiz = fetch_quiz(state, quiz_id).await?;
    let course_id = repositories::quizzes::find_course_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve course"))?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz {quiz_id} not found")))?;

    crate::api::guards::require_course_owner(state, user, &course_id).await?;
    Ok(quiz)
}

/// Questions with options, correctness stripped, for a student taking the quiz.
pub(super) async fn load_public_questions(
    state: &AppState,
    quiz_id: &str,
) -> Result<Vec<QuestionPublicResponse>, ApiError> {
    let questions = repositories::quizzes::list_questions(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let options = repositories::quizzes::list_options_for_quiz(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list options"))?;

    Ok(questions
        .into_iter()
        .map(|question| {
            let question_options = options
                .iter()
                .filter(|option| option.question_id == question.id)
                .cloned()
                .map(OptionPublicResponse::from_db)
                .collect();
            QuestionPublicResponse::from_db(question, question_options)
        })
        .collect())
}

pub(super) async fn load_manage_questions(
    state: &AppState,
    quiz_id: &str,
) -> Result<Vec<QuestionManageResponse>, ApiError> {
    let questions = repositories::quizzes::list_questions(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;
    let options = repositories::quizzes::list_options_for_quiz(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list options"))?;

    Ok(questions
        .into_iter()
        .map(|question| {
            let question_options = options
                .iter()
                .filter(|option| option.question_id == question.id)
                .cloned()
                .map(OptionManageResponse::from_db)
                .collect();
            QuestionManageResponse::from_db(question, question_options)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{compute_score, is_passing};

    #[test]
    fn score_truncates_toward_zero() {
        assert_eq!(compute_score(2, 3), 66);
        assert_eq!(compute_score(1, 3), 33);
        assert_eq!(compute_score(3, 3), 100);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(compute_score(0, 0), 0);
        assert_eq!(compute_score(5, 0), 0);
    }

    #[test]
    fn passing_is_inclusive() {
        assert!(is_passing(70, 70));
        assert!(!is_passing(69, 70));
    }
}
