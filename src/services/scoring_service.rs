use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::result::QuizResult;
use crate::models::subject::Subject;
use crate::services::quiz_service::QuizService;
use crate::store::{TableStore, RESULT_TABLE};
use crate::utils::normalize::canon;
use crate::utils::time::sheet_timestamp;

/// Grades a submission against the authoritative question order and logs the
/// outcome. The answer map keys are question ordinals as decimal strings;
/// letters compare exactly, so a lowercase submission does not score.
#[derive(Clone)]
pub struct ScoringService {
    quiz_service: QuizService,
    store: Arc<dyn TableStore>,
}

impl ScoringService {
    pub fn new(quiz_service: QuizService, store: Arc<dyn TableStore>) -> Self {
        Self {
            quiz_service,
            store,
        }
    }

    pub async fn score_and_record(
        &self,
        username: &str,
        subject: Subject,
        quiz_id: &str,
        answers: &HashMap<String, String>,
    ) -> Result<(u32, u32)> {
        let questions = self.quiz_service.questions_for(subject, quiz_id).await?;
        let total = questions.len() as u32;
        let mut score = 0u32;
        for (position, question) in questions.iter().enumerate() {
            if answers.get(&position.to_string()) == Some(&question.correct_answer) {
                score += 1;
            }
        }

        let quiz_name = match questions.first() {
            Some(question) => question.quiz_name.clone(),
            None => self
                .quiz_service
                .find_listing(subject, quiz_id)
                .await?
                .map(|listing| listing.quiz_name)
                .unwrap_or_default(),
        };
        let result = QuizResult {
            username: username.to_string(),
            subject: subject.slug().to_string(),
            quiz_id: canon(quiz_id),
            quiz_name,
            answers: serde_json::to_string(answers)?,
            score,
            total,
            created_at: sheet_timestamp(),
        };
        // The score already belongs to the user at this point; a result sheet
        // hiccup must not turn it into an error response.
        if let Err(err) = self.store.append_row(RESULT_TABLE, result.to_row()).await {
            tracing::error!(
                error = %err,
                username,
                quiz = %result.quiz_id,
                "failed to append quiz result"
            );
        }
        Ok((score, total))
    }
}
