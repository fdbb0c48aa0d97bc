use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::config::Settings;

const QUESTION_GENERATION_PROMPT: &str = r#"You are an experienced technical interviewer.
Generate interview questions for the given job role and difficulty.

Respond with strict JSON only, no prose around it:
{
  "questions": [
    {
      "question": "the interview question",
      "sample_answer": "a strong reference answer",
      "key_points": ["point the answer should cover", "..."],
      "difficulty": "easy|medium|hard"
    }
  ]
}
"#;

const ANSWER_EVALUATION_PROMPT: &str = r#"You are an experienced technical interviewer
evaluating a candidate's answer against a reference answer and its key points.

Respond with strict JSON only, no prose around it:
{
  "score": <integer 0-100>,
  "feedback": "overall feedback for the candidate",
  "strengths": ["what the answer did well", "..."],
  "improvements": ["what to improve", "..."]
}
"#;

#[derive(Debug, Error)]
pub(crate) enum AiError {
    #[error("AI provider is not configured")]
    NotConfigured,
    #[error("AI provider request failed: {0}")]
    Upstream(String),
    #[error("AI provider returned malformed output: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedQuestion {
    pub(crate) question: String,
    pub(crate) sample_answer: String,
    #[serde(default)]
    pub(crate) key_points: Vec<String>,
    #[serde(default)]
    pub(crate) difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnswerEvaluation {
    pub(crate) score: i32,
    pub(crate) feedback: String,
    #[serde(default)]
    pub(crate) strengths: Vec<String>,
    #[serde(default)]
    pub(crate) improvements: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestionSet {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone)]
pub(crate) struct AiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl AiService {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.ai().connect_timeout_seconds))
            .timeout(Duration::from_secs(settings.ai().request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.ai().gemini_api_key.clone(),
            base_url: settings.ai().gemini_base_url.trim_end_matches('/').to_string(),
            model: settings.ai().model.clone(),
            max_output_tokens: settings.ai().max_output_tokens,
        })
    }

    pub(crate) async fn generate_interview_questions(
        &self,
        job_role: &str,
        difficulty: &str,
        question_count: u8,
    ) -> Result<Vec<GeneratedQuestion>, AiError> {
        let prompt = format!(
            "{QUESTION_GENERATION_PROMPT}\nJob role: {job_role}\nDifficulty: {difficulty}\n\
             Number of questions: {question_count}\n",
        );

        let text = self.generate(&prompt).await?;
        let set: GeneratedQuestionSet = serde_json::from_str(strip_json_fences(&text))
            .map_err(|err| AiError::Malformed(format!("question set did not parse: {err}")))?;

        if set.questions.is_empty() {
            return Err(AiError::Malformed("question set is empty".to_string()));
        }
        for question in &set.questions {
            if question.question.trim().is_empty() || question.sample_answer.trim().is_empty() {
                return Err(AiError::Malformed(
                    "question or sample answer is empty".to_string(),
                ));
            }
        }

        Ok(set.questions)
    }

    pub(crate) async fn evaluate_answer(
        &self,
        question: &str,
        sample_answer: &str,
        key_points: &[String],
        answer: &str,
    ) -> Result<AnswerEvaluation, AiError> {
        let prompt = format!(
            "{ANSWER_EVALUATION_PROMPT}\nQuestion:\n{question}\n\nReference answer:\n\
             {sample_answer}\n\nKey points:\n{}\n\nCandidate answer:\n{answer}\n",
            key_points.join("\n"),
        );

        let text = self.generate(&prompt).await?;
        let evaluation: AnswerEvaluation = serde_json::from_str(strip_json_fences(&text))
            .map_err(|err| AiError::Malformed(format!("evaluation did not parse: {err}")))?;

        if !(0..=100).contains(&evaluation.score) {
            return Err(AiError::Malformed(format!(
                "evaluation score {} is out of range",
                evaluation.score
            )));
        }

        Ok(evaluation)
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::NotConfigured);
        }

        let timer = Instant::now();
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
                "responseMimeType": "application/json"
            }
        });

        let mut last_error = None;
        let mut body = Value::Null;

        for attempt in 0..=3 {
            let response = self.client.post(&url).json(&payload).send().await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    body = resp.json().await.unwrap_or(Value::Null);
                    if status.is_success() {
                        last_error = None;
                        break;
                    }
                    last_error = Some(AiError::Upstream(format!("Gemini API error: {body}")));
                }
                Err(err) => {
                    last_error = Some(AiError::Upstream(format!("Gemini request failed: {err}")));
                }
            }

            if attempt < 3 {
                tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt as u32))).await;
            }
        }

        if let Some(err) = last_error {
            return Err(err);
        }

        let text = body
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|value| value.as_str())
            .ok_or_else(|| AiError::Malformed("missing Gemini response text".to_string()))?;

        tracing::debug!(
            model = %self.model,
            duration_seconds = timer.elapsed().as_secs_f64(),
            "Gemini request completed"
        );

        Ok(text.to_string())
    }
}

/// Gemini sometimes wraps its JSON in a markdown code fence despite the
/// response mime type.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

#[cfg(test)]
mod tests {
    use super::{strip_json_fences, AnswerEvaluation, GeneratedQuestionSet};

    #[test]
    fn strip_json_fences_handles_plain_and_fenced_text() {
        assert_eq!(strip_json_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_json_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_json_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn question_set_parses_with_optional_fields() {
        let raw = r#"{
            "questions": [
                {"question": "What is ownership?", "sample_answer": "Values have one owner."}
            ]
        }"#;
        let set: GeneratedQuestionSet = serde_json::from_str(raw).unwrap();
        assert_eq!(set.questions.len(), 1);
        assert!(set.questions[0].key_points.is_empty());
        assert!(set.questions[0].difficulty.is_none());
    }

    #[test]
    fn evaluation_parses_full_payload() {
        let raw = r#"{
            "score": 85,
            "feedback": "Solid answer.",
            "strengths": ["clear"],
            "improvements": ["add examples"]
        }"#;
        let evaluation: AnswerEvaluation = serde_json::from_str(raw).unwrap();
        assert_eq!(evaluation.score, 85);
        assert_eq!(evaluation.strengths, vec!["clear".to_string()]);
    }

    #[test]
    fn malformed_evaluation_is_rejected() {
        let raw = r#"{"feedback": "missing score"}"#;
        assert!(serde_json::from_str::<AnswerEvaluation>(raw).is_err());
    }
}
