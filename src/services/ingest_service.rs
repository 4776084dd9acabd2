use std::sync::Arc;

use calamine::{Reader, Xls, Xlsx};

use crate::cache::{CacheKey, QuizCache};
use crate::dto::admin_dto::{AdminQuizQuery, BulkUploadPayload, UpdateTimePayload};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::quiz::{QuizListing, DEFAULT_TIME_LIMIT_MINUTES};
use crate::models::subject::Subject;
use crate::store::{TableStore, LIST_TABLE};
use crate::utils::normalize::canon_eq;

pub const QUESTION_FIELDS: usize = 6;

#[derive(Debug, Clone)]
pub struct ParsedQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: String,
}

/// Quiz ids are derived, never chosen: subject initial, the first number in
/// the class label, a dash, then the initial of every word in the quiz name.
/// ("hoa", "lop 8", "Hóa học Cơ bản") becomes "h8-hhcb".
pub fn derive_quiz_id(subject: Subject, class: &str, quiz_name: &str) -> String {
    let subject_initial = &subject.slug()[..1];
    let class_number: String = class
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let initials: String = quiz_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_lowercase())
        .collect();
    format!("{}{}-{}", subject_initial, class_number, initials)
}

/// One question per line, six '|'-separated fields. The whole batch parses
/// or nothing is accepted.
pub fn parse_bulk_text(text: &str) -> Result<Vec<ParsedQuestion>> {
    let mut parsed = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        if fields.len() != QUESTION_FIELDS {
            return Err(Error::BadRequest(format!(
                "line {}: expected {} '|'-separated fields, found {}",
                idx + 1,
                QUESTION_FIELDS,
                fields.len()
            )));
        }
        parsed.push(build_question(&fields, &format!("line {}", idx + 1))?);
    }
    if parsed.is_empty() {
        return Err(Error::BadRequest("no questions found in upload".to_string()));
    }
    Ok(parsed)
}

/// First worksheet only; the first row is treated as a header and skipped,
/// fully blank rows are ignored.
pub fn parse_excel(data: &[u8]) -> Result<Vec<ParsedQuestion>> {
    // xlsx first, falling back to the legacy xls container.
    let range = match Xlsx::new(std::io::Cursor::new(data)) {
        Ok(mut workbook) => {
            let sheet_name = first_sheet_name(&workbook.sheet_names())?;
            workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| Error::BadRequest(format!("could not read worksheet: {}", e)))?
        }
        Err(_) => {
            let mut workbook = Xls::new(std::io::Cursor::new(data))
                .map_err(|e| Error::BadRequest(format!("could not open workbook: {}", e)))?;
            let sheet_name = first_sheet_name(&workbook.sheet_names())?;
            workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| Error::BadRequest(format!("could not read worksheet: {}", e)))?
        }
    };

    let mut parsed = Vec::new();
    for (idx, row) in range.rows().enumerate() {
        if idx == 0 {
            continue;
        }
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let fields: Vec<&str> = (0..QUESTION_FIELDS)
            .map(|i| cells.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        parsed.push(build_question(&fields, &format!("row {}", idx + 1))?);
    }
    if parsed.is_empty() {
        return Err(Error::BadRequest("no questions found in upload".to_string()));
    }
    Ok(parsed)
}

fn first_sheet_name(names: &[String]) -> Result<String> {
    names
        .first()
        .cloned()
        .ok_or_else(|| Error::BadRequest("workbook has no sheets".to_string()))
}

fn build_question(fields: &[&str], position: &str) -> Result<ParsedQuestion> {
    if fields.iter().take(QUESTION_FIELDS - 1).any(|f| f.is_empty()) {
        return Err(Error::BadRequest(format!(
            "{}: question text and all four options are required",
            position
        )));
    }
    let letter = fields[5].to_uppercase();
    if !matches!(letter.as_str(), "A" | "B" | "C" | "D") {
        return Err(Error::BadRequest(format!(
            "{}: correct answer must be one of A, B, C, D",
            position
        )));
    }
    Ok(ParsedQuestion {
        question: fields[0].to_string(),
        options: [
            fields[1].to_string(),
            fields[2].to_string(),
            fields[3].to_string(),
            fields[4].to_string(),
        ],
        correct_answer: letter,
    })
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Admin-side writes: validated batches in, listing registration, question
/// appends, and a cache invalidation at the end of every mutation.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn TableStore>,
    cache: QuizCache,
}

impl IngestService {
    pub fn new(store: Arc<dyn TableStore>, cache: QuizCache) -> Self {
        Self { store, cache }
    }

    pub async fn bulk_upload(&self, payload: &BulkUploadPayload) -> Result<(String, usize)> {
        let subject = Subject::parse(&payload.subject)
            .ok_or_else(|| Error::BadRequest(format!("unknown subject '{}'", payload.subject)))?;
        let questions = parse_bulk_text(&payload.questions)?;
        self.upload_questions(
            subject,
            &payload.class,
            &payload.quiz_name,
            payload.time_limit,
            questions,
        )
        .await
    }

    pub async fn excel_upload(
        &self,
        subject_raw: &str,
        class: &str,
        quiz_name: &str,
        time_limit: Option<u32>,
        data: &[u8],
    ) -> Result<(String, usize)> {
        let subject = Subject::parse(subject_raw)
            .ok_or_else(|| Error::BadRequest(format!("unknown subject '{}'", subject_raw)))?;
        let questions = parse_excel(data)?;
        self.upload_questions(subject, class, quiz_name, time_limit, questions)
            .await
    }

    async fn upload_questions(
        &self,
        subject: Subject,
        class: &str,
        quiz_name: &str,
        time_limit: Option<u32>,
        questions: Vec<ParsedQuestion>,
    ) -> Result<(String, usize)> {
        let quiz_id = derive_quiz_id(subject, class, quiz_name);
        self.ensure_listing(subject, class, &quiz_id, quiz_name, time_limit)
            .await?;
        for parsed in &questions {
            let question = Question {
                quiz_id: quiz_id.clone(),
                quiz_name: quiz_name.trim().to_string(),
                question: parsed.question.clone(),
                option_a: parsed.options[0].clone(),
                option_b: parsed.options[1].clone(),
                option_c: parsed.options[2].clone(),
                option_d: parsed.options[3].clone(),
                correct_answer: parsed.correct_answer.clone(),
            };
            self.store
                .append_row(subject.sheet_name(), question.to_row())
                .await?;
        }
        self.cache.invalidate().await;
        let added = questions.len();
        tracing::info!(
            quiz = %quiz_id,
            subject = subject.slug(),
            added,
            "questions uploaded"
        );
        Ok((quiz_id, added))
    }

    /// Registers the quiz in LIST when its derived id is new for the subject.
    /// Reads the listing from the store, not the cache, so a just-uploaded
    /// quiz cannot be double-registered by a stale snapshot.
    async fn ensure_listing(
        &self,
        subject: Subject,
        class: &str,
        quiz_id: &str,
        quiz_name: &str,
        time_limit: Option<u32>,
    ) -> Result<()> {
        let records = self.store.read_table(LIST_TABLE).await?;
        let exists = records.iter().map(QuizListing::from_record).any(|listing| {
            canon_eq(&listing.subject, subject.slug()) && canon_eq(&listing.quiz_id, quiz_id)
        });
        if exists {
            return Ok(());
        }
        let listing = QuizListing {
            subject: subject.slug().to_string(),
            class: class.trim().to_string(),
            quiz_id: quiz_id.to_string(),
            quiz_name: quiz_name.trim().to_string(),
            time_limit: time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
        };
        self.store.append_row(LIST_TABLE, listing.to_row()).await?;
        Ok(())
    }

    pub async fn update_time_limit(&self, payload: &UpdateTimePayload) -> Result<QuizListing> {
        let subject = Subject::parse(&payload.subject)
            .ok_or_else(|| Error::NotFound(format!("unknown subject '{}'", payload.subject)))?;
        let records = self.store.read_table(LIST_TABLE).await?;
        let mut listings: Vec<QuizListing> =
            records.iter().map(QuizListing::from_record).collect();

        let mut updated = None;
        for listing in listings.iter_mut() {
            if canon_eq(&listing.subject, subject.slug())
                && canon_eq(&listing.quiz_id, &payload.quiz_id)
            {
                listing.time_limit = payload.time_limit;
                updated = Some(listing.clone());
            }
        }
        let updated = updated.ok_or_else(|| {
            Error::NotFound(format!(
                "quiz '{}' not found for subject '{}'",
                payload.quiz_id,
                subject.slug()
            ))
        })?;

        let mut rows = vec![header_row(&QuizListing::HEADER)];
        rows.extend(listings.iter().map(QuizListing::to_row));
        self.store.clear_and_rewrite(LIST_TABLE, rows).await?;
        self.cache.invalidate().await;
        tracing::info!(
            quiz = %updated.quiz_id,
            time_limit = updated.time_limit,
            "time limit updated"
        );
        Ok(updated)
    }

    /// Removes the listing row and every question row of the quiz.
    pub async fn delete_quiz(&self, subject: Subject, quiz_id: &str) -> Result<()> {
        let records = self.store.read_table(LIST_TABLE).await?;
        let index = records
            .iter()
            .map(QuizListing::from_record)
            .position(|listing| {
                canon_eq(&listing.subject, subject.slug()) && canon_eq(&listing.quiz_id, quiz_id)
            })
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "quiz '{}' not found for subject '{}'",
                    quiz_id,
                    subject.slug()
                ))
            })?;
        self.store.delete_row(LIST_TABLE, index).await?;

        let table = subject.sheet_name();
        let question_records = self.store.read_table(table).await?;
        let kept: Vec<Question> = question_records
            .iter()
            .map(Question::from_record)
            .filter(|question| !canon_eq(&question.quiz_id, quiz_id))
            .collect();
        let mut rows = vec![header_row(&Question::HEADER)];
        rows.extend(kept.iter().map(Question::to_row));
        self.store.clear_and_rewrite(table, rows).await?;
        self.cache.invalidate().await;
        tracing::info!(quiz = quiz_id, subject = subject.slug(), "quiz deleted");
        Ok(())
    }

    pub async fn admin_listings(&self, query: &AdminQuizQuery) -> Result<Vec<QuizListing>> {
        let records = self.cache.get(CacheKey::List).await?;
        Ok(records
            .iter()
            .map(QuizListing::from_record)
            .filter(|listing| {
                query
                    .subject
                    .as_ref()
                    .map_or(true, |s| canon_eq(&listing.subject, s))
                    && query
                        .class
                        .as_ref()
                        .map_or(true, |c| canon_eq(&listing.class, c))
                    && query
                        .quiz_id
                        .as_ref()
                        .map_or(true, |q| canon_eq(&listing.quiz_id, q))
            })
            .collect())
    }
}

fn header_row(header: &[&str]) -> Vec<String> {
    header.iter().map(|cell| cell.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::time::Duration;

    #[test]
    fn derive_matches_the_documented_example() {
        assert_eq!(
            derive_quiz_id(Subject::Hoa, "lop 8", "Hóa học Cơ bản"),
            "h8-hhcb"
        );
    }

    #[test]
    fn derive_takes_the_first_digit_run_only() {
        assert_eq!(derive_quiz_id(Subject::Toan, "lop 10A2", "Đại số"), "t10-đs");
        assert_eq!(derive_quiz_id(Subject::Ly, "chuyen", "Quang học"), "l-qh");
    }

    #[test]
    fn parse_bulk_text_reads_every_line() {
        let text = "Q1|a1|b1|c1|d1|A\n\nQ2|a2|b2|c2|d2| c \n";
        let parsed = parse_bulk_text(text).expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].question, "Q1");
        assert_eq!(parsed[1].correct_answer, "C");
    }

    #[test]
    fn parse_bulk_text_rejects_wrong_field_counts_by_line() {
        let text = "Q1|a|b|c|d|A\nQ2|a|b|c|d\nQ3|a|b|c|d|B";
        let err = parse_bulk_text(text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn parse_bulk_text_rejects_bad_letters_and_blanks() {
        let err = parse_bulk_text("Q1|a|b|c|d|E").unwrap_err();
        assert!(err.to_string().contains("A, B, C, D"));

        let err = parse_bulk_text("Q1|a||c|d|A").unwrap_err();
        assert!(err.to_string().contains("required"));

        assert!(parse_bulk_text("\n  \n").is_err());
    }

    fn excel_fixture(rows: &[[&str; 6]]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header = ["question", "a", "b", "c", "d", "correct"];
        for (col, cell) in header.iter().enumerate() {
            worksheet.write(0, col as u16, *cell).expect("write header");
        }
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                worksheet
                    .write((row + 1) as u32, col as u16, *cell)
                    .expect("write cell");
            }
        }
        workbook.save_to_buffer().expect("save workbook")
    }

    #[test]
    fn parse_excel_skips_header_and_blank_rows() {
        let data = excel_fixture(&[
            ["Q1", "a1", "b1", "c1", "d1", "A"],
            ["", "", "", "", "", ""],
            ["Q2", "a2", "b2", "c2", "d2", "d"],
        ]);
        let parsed = parse_excel(&data).expect("parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].correct_answer, "D");
    }

    #[test]
    fn parse_excel_rejects_a_bad_row_with_its_position() {
        let data = excel_fixture(&[
            ["Q1", "a1", "b1", "c1", "d1", "A"],
            ["Q2", "a2", "b2", "c2", "d2", "X"],
        ]);
        let err = parse_excel(&data).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    async fn seeded_service() -> (Arc<MemoryStore>, IngestService) {
        let store = Arc::new(MemoryStore::new());
        store.seed("LIST", &QuizListing::HEADER, vec![]).await;
        for table in ["TOAN", "LY", "HOA", "CHINA"] {
            store.seed(table, &Question::HEADER, vec![]).await;
        }
        let cache = QuizCache::new(store.clone(), Duration::from_secs(300));
        let service = IngestService::new(store.clone(), cache);
        (store, service)
    }

    fn upload_payload(questions: &str) -> BulkUploadPayload {
        BulkUploadPayload {
            subject: "hoa".to_string(),
            class: "lop 8".to_string(),
            quiz_name: "Hóa học Cơ bản".to_string(),
            questions: questions.to_string(),
            time_limit: None,
        }
    }

    #[tokio::test]
    async fn bulk_upload_registers_listing_and_appends_questions() {
        let (store, service) = seeded_service().await;
        let (quiz_id, added) = service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A\nQ2|a|b|c|d|C"))
            .await
            .expect("upload");
        assert_eq!(quiz_id, "h8-hhcb");
        assert_eq!(added, 2);

        let list_rows = store.rows("LIST").await;
        assert_eq!(list_rows.len(), 1);
        assert_eq!(list_rows[0][2], "h8-hhcb");
        assert_eq!(list_rows[0][4], DEFAULT_TIME_LIMIT_MINUTES.to_string());
        assert_eq!(store.rows("HOA").await.len(), 2);
    }

    #[tokio::test]
    async fn second_upload_reuses_the_listing_row() {
        let (store, service) = seeded_service().await;
        service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A"))
            .await
            .expect("upload");
        service
            .bulk_upload(&upload_payload("Q2|a|b|c|d|B"))
            .await
            .expect("upload");

        assert_eq!(store.rows("LIST").await.len(), 1);
        assert_eq!(store.rows("HOA").await.len(), 2);
    }

    #[tokio::test]
    async fn malformed_batch_writes_nothing() {
        let (store, service) = seeded_service().await;
        let err = service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A\nbroken line"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(store.rows("LIST").await.is_empty());
        assert!(store.rows("HOA").await.is_empty());
    }

    #[tokio::test]
    async fn update_time_limit_rewrites_the_listing_table() {
        let (store, service) = seeded_service().await;
        service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A"))
            .await
            .expect("upload");

        let updated = service
            .update_time_limit(&UpdateTimePayload {
                subject: "HOA".to_string(),
                quiz_id: " H8-HHCB ".to_string(),
                time_limit: 45,
            })
            .await
            .expect("update");
        assert_eq!(updated.time_limit, 45);

        let rows = store.rows("LIST").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][4], "45");

        let err = service
            .update_time_limit(&UpdateTimePayload {
                subject: "hoa".to_string(),
                quiz_id: "h8-none".to_string(),
                time_limit: 45,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_quiz_cascades_to_its_questions() {
        let (store, service) = seeded_service().await;
        service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A\nQ2|a|b|c|d|B"))
            .await
            .expect("upload");
        let mut other = upload_payload("Q3|a|b|c|d|C");
        other.quiz_name = "Nâng cao".to_string();
        other.class = "lop 9".to_string();
        service.bulk_upload(&other).await.expect("upload");

        service
            .delete_quiz(Subject::Hoa, "h8-hhcb")
            .await
            .expect("delete");

        let list_rows = store.rows("LIST").await;
        assert_eq!(list_rows.len(), 1);
        assert_eq!(list_rows[0][2], "h9-nc");

        let question_rows = store.rows("HOA").await;
        assert_eq!(question_rows.len(), 1);
        assert_eq!(question_rows[0][0], "h9-nc");

        let err = service.delete_quiz(Subject::Hoa, "h8-hhcb").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn admin_listings_apply_each_filter() {
        let (_, service) = seeded_service().await;
        service
            .bulk_upload(&upload_payload("Q1|a|b|c|d|A"))
            .await
            .expect("upload");
        let mut other = upload_payload("Q2|a|b|c|d|B");
        other.subject = "toan".to_string();
        other.quiz_name = "Đại số".to_string();
        service.bulk_upload(&other).await.expect("upload");

        let all = service
            .admin_listings(&AdminQuizQuery::default())
            .await
            .expect("listings");
        assert_eq!(all.len(), 2);

        let hoa_only = service
            .admin_listings(&AdminQuizQuery {
                subject: Some("HOA".to_string()),
                ..Default::default()
            })
            .await
            .expect("listings");
        assert_eq!(hoa_only.len(), 1);
        assert_eq!(hoa_only[0].quiz_id, "h8-hhcb");

        let by_class = service
            .admin_listings(&AdminQuizQuery {
                class: Some(" LOP 8".to_string()),
                ..Default::default()
            })
            .await
            .expect("listings");
        assert_eq!(by_class.len(), 2);
    }
}
