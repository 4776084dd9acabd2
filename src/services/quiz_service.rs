use crate::cache::{CacheKey, QuizCache};
use crate::error::Result;
use crate::models::question::Question;
use crate::models::quiz::QuizListing;
use crate::models::subject::Subject;
use crate::utils::normalize::canon_eq;

/// Read side of the quiz catalog. Everything here works off the cache
/// snapshot; filters match on canonicalized values so sheet typos in casing
/// or padding do not hide rows.
#[derive(Clone)]
pub struct QuizService {
    cache: QuizCache,
}

impl QuizService {
    pub fn new(cache: QuizCache) -> Self {
        Self { cache }
    }

    pub async fn listings_for(&self, subject: Subject) -> Result<Vec<QuizListing>> {
        let records = self.cache.get(CacheKey::List).await?;
        Ok(records
            .iter()
            .map(QuizListing::from_record)
            .filter(|listing| canon_eq(&listing.subject, subject.slug()))
            .collect())
    }

    pub async fn find_listing(
        &self,
        subject: Subject,
        quiz_id: &str,
    ) -> Result<Option<QuizListing>> {
        Ok(self
            .listings_for(subject)
            .await?
            .into_iter()
            .find(|listing| canon_eq(&listing.quiz_id, quiz_id)))
    }

    /// Unknown quiz ids yield an empty list, not an error.
    pub async fn questions_for(&self, subject: Subject, quiz_id: &str) -> Result<Vec<Question>> {
        let records = self.cache.get(CacheKey::Questions(subject)).await?;
        Ok(records
            .iter()
            .map(Question::from_record)
            .filter(|question| canon_eq(&question.quiz_id, quiz_id))
            .collect())
    }

    pub async fn all_listings(&self) -> Result<Vec<QuizListing>> {
        let records = self.cache.get(CacheKey::List).await?;
        Ok(records.iter().map(QuizListing::from_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    async fn service() -> QuizService {
        let store = MemoryStore::new();
        store
            .seed(
                "LIST",
                &QuizListing::HEADER,
                vec![
                    vec!["hoa", "lop 8", "h8-hhcb", "Hóa học Cơ bản", "15"],
                    vec!["HOA ", "lop 9", "h9-nc", "Nâng cao", "20"],
                    vec!["toan", "lop 8", "t8-ds", "Đại số", "15"],
                ],
            )
            .await;
        store
            .seed(
                "HOA",
                &Question::HEADER,
                vec![
                    vec!["h8-hhcb", "Hóa học Cơ bản", "Q1", "a", "b", "c", "d", "A"],
                    vec!["H8-HHCB ", "Hóa học Cơ bản", "Q2", "a", "b", "c", "d", "C"],
                    vec!["h9-nc", "Nâng cao", "Q3", "a", "b", "c", "d", "B"],
                ],
            )
            .await;
        for table in ["TOAN", "LY", "CHINA"] {
            store.seed(table, &Question::HEADER, vec![]).await;
        }
        let cache = QuizCache::new(Arc::new(store), Duration::from_secs(300));
        QuizService::new(cache)
    }

    #[tokio::test]
    async fn listings_match_subject_ignoring_case_and_padding() {
        let svc = service().await;
        let listings = svc.listings_for(Subject::Hoa).await.expect("listings");
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].quiz_id, "h8-hhcb");
        assert_eq!(listings[1].quiz_id, "h9-nc");
    }

    #[tokio::test]
    async fn find_listing_normalizes_the_quiz_id() {
        let svc = service().await;
        let listing = svc
            .find_listing(Subject::Hoa, " H8-HHCB ")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(listing.quiz_name, "Hóa học Cơ bản");
        assert!(svc
            .find_listing(Subject::Hoa, "h8-zzz")
            .await
            .expect("find")
            .is_none());
    }

    #[tokio::test]
    async fn questions_for_unknown_id_is_empty_not_error() {
        let svc = service().await;
        let questions = svc.questions_for(Subject::Hoa, "h8-hhcb").await.expect("questions");
        assert_eq!(questions.len(), 2);
        let none = svc.questions_for(Subject::Hoa, "missing").await.expect("questions");
        assert!(none.is_empty());
    }
}
