use std::sync::Arc;

use crate::error::Result;
use crate::models::result::QuizResult;
use crate::models::subject::Subject;
use crate::store::{TableStore, RESULT_TABLE};
use crate::utils::normalize::canon_eq;

/// Read access to the append-only result log. The log is small and written
/// rarely, so it is read straight from the store rather than cached.
#[derive(Clone)]
pub struct ResultService {
    store: Arc<dyn TableStore>,
}

impl ResultService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn results_for_user(&self, username: &str) -> Result<Vec<QuizResult>> {
        let records = self.store.read_table(RESULT_TABLE).await?;
        Ok(records
            .iter()
            .map(QuizResult::from_record)
            .filter(|result| result.username == username)
            .collect())
    }

    /// Most recent submission for (user, subject, quiz). Rows are appended in
    /// order, so the last match wins.
    pub async fn latest_for(
        &self,
        username: &str,
        subject: Subject,
        quiz_id: &str,
    ) -> Result<Option<QuizResult>> {
        let records = self.store.read_table(RESULT_TABLE).await?;
        Ok(records
            .iter()
            .rev()
            .map(QuizResult::from_record)
            .find(|result| {
                result.username == username
                    && canon_eq(&result.subject, subject.slug())
                    && canon_eq(&result.quiz_id, quiz_id)
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn seeded() -> ResultService {
        let store = MemoryStore::new();
        store
            .seed(
                "RESULT",
                &QuizResult::HEADER,
                vec![
                    vec![
                        "alice",
                        "hoa",
                        "h8-hhcb",
                        "Hóa học Cơ bản",
                        r#"{"0":"A"}"#,
                        "1",
                        "2",
                        "2026-01-10 09:00:00",
                    ],
                    vec![
                        "bob",
                        "hoa",
                        "h8-hhcb",
                        "Hóa học Cơ bản",
                        r#"{"0":"B"}"#,
                        "0",
                        "2",
                        "2026-01-10 09:05:00",
                    ],
                    vec![
                        "alice",
                        "hoa",
                        "h8-hhcb",
                        "Hóa học Cơ bản",
                        r#"{"0":"A","1":"C"}"#,
                        "2",
                        "2",
                        "2026-01-10 09:30:00",
                    ],
                ],
            )
            .await;
        ResultService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn results_for_user_filters_by_exact_username() {
        let svc = seeded().await;
        let results = svc.results_for_user("alice").await.expect("results");
        assert_eq!(results.len(), 2);
        assert!(svc
            .results_for_user("ALICE")
            .await
            .expect("results")
            .is_empty());
    }

    #[tokio::test]
    async fn latest_for_returns_the_most_recent_match() {
        let svc = seeded().await;
        let latest = svc
            .latest_for("alice", Subject::Hoa, "H8-HHCB")
            .await
            .expect("latest")
            .expect("present");
        assert_eq!(latest.score, 2);
        assert_eq!(latest.created_at, "2026-01-10 09:30:00");
    }

    #[tokio::test]
    async fn latest_for_is_none_when_no_match() {
        let svc = seeded().await;
        assert!(svc
            .latest_for("alice", Subject::Toan, "h8-hhcb")
            .await
            .expect("latest")
            .is_none());
    }
}
