//! Scope-bound exam listing.
//!
//! Each [`ExamScope`] variant maps to one query. The completion status is
//! computed inside the query, next to the predicate that bounds the rows:
//! it is a pure function of joined data and is never stored (entering marks
//! after a listing must flip the status on the next read).
//!
//! Status derivation per scope:
//! - student: at least one of the caller's own result rows under the exam
//! - parent: at least one result row of any of the caller's children
//! - teacher: every exam subject the caller teaches has marks entered
//! - admin: every exam subject has marks entered (and at least one exists)

use sqlx::PgPool;
use tracing::instrument;

use slate_core::errors::AppError;
use slate_models::exams::{ExamWithStatus, ExamWithStatusRow};
use slate_models::scope::ExamScope;

/// Listings sort newest first; insertion order breaks remaining ties.
const EXAM_ORDERING: &str = "ORDER BY e.year DESC, e.term DESC, e.exam_date DESC, e.created_at ASC";

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db))]
    pub async fn list_exams(db: &PgPool, scope: ExamScope) -> Result<Vec<ExamWithStatus>, AppError> {
        let rows = match scope {
            ExamScope::GradeOf(student_id) => {
                sqlx::query_as::<_, ExamWithStatusRow>(&format!(
                    r#"SELECT e.id, e.title, e.year, e.term, e.exam_date,
                              g.id AS grade_id, g.level AS grade_level,
                              CASE WHEN EXISTS (
                                  SELECT 1 FROM exam_results er
                                  JOIN exam_subjects es ON es.id = er.exam_subject_id
                                  WHERE es.exam_id = e.id AND er.student_id = $1
                              ) THEN 'completed' ELSE 'pending' END AS status
                       FROM exams e
                       JOIN grades g ON g.id = e.grade_id
                       JOIN students s ON s.grade_id = e.grade_id
                       WHERE s.id = $1
                       {EXAM_ORDERING}"#
                ))
                .bind(student_id)
                .fetch_all(db)
                .await?
            }
            ExamScope::ChildrenOf(parent_id) => {
                sqlx::query_as::<_, ExamWithStatusRow>(&format!(
                    r#"SELECT e.id, e.title, e.year, e.term, e.exam_date,
                              g.id AS grade_id, g.level AS grade_level,
                              CASE WHEN EXISTS (
                                  SELECT 1 FROM exam_results er
                                  JOIN exam_subjects es ON es.id = er.exam_subject_id
                                  JOIN students c ON c.id = er.student_id
                                  WHERE es.exam_id = e.id AND c.parent_id = $1
                              ) THEN 'completed' ELSE 'pending' END AS status
                       FROM exams e
                       JOIN grades g ON g.id = e.grade_id
                       WHERE e.grade_id IN (SELECT grade_id FROM students WHERE parent_id = $1)
                       {EXAM_ORDERING}"#
                ))
                .bind(parent_id)
                .fetch_all(db)
                .await?
            }
            ExamScope::TaughtBy(teacher_id) => {
                sqlx::query_as::<_, ExamWithStatusRow>(&format!(
                    r#"SELECT e.id, e.title, e.year, e.term, e.exam_date,
                              g.id AS grade_id, g.level AS grade_level,
                              CASE WHEN NOT EXISTS (
                                  SELECT 1 FROM exam_subjects es
                                  JOIN teacher_subjects ts ON ts.subject_id = es.subject_id
                                  WHERE es.exam_id = e.id
                                    AND ts.teacher_id = $1
                                    AND es.marks_entered = FALSE
                              ) THEN 'completed' ELSE 'pending' END AS status
                       FROM exams e
                       JOIN grades g ON g.id = e.grade_id
                       WHERE EXISTS (
                           SELECT 1 FROM exam_subjects es
                           JOIN teacher_subjects ts ON ts.subject_id = es.subject_id
                           WHERE es.exam_id = e.id AND ts.teacher_id = $1
                       )
                       {EXAM_ORDERING}"#
                ))
                .bind(teacher_id)
                .fetch_all(db)
                .await?
            }
            ExamScope::Published => {
                sqlx::query_as::<_, ExamWithStatusRow>(&format!(
                    r#"SELECT e.id, e.title, e.year, e.term, e.exam_date,
                              g.id AS grade_id, g.level AS grade_level,
                              CASE WHEN EXISTS (
                                  SELECT 1 FROM exam_subjects es WHERE es.exam_id = e.id
                              ) AND NOT EXISTS (
                                  SELECT 1 FROM exam_subjects es
                                  WHERE es.exam_id = e.id AND es.marks_entered = FALSE
                              ) THEN 'completed' ELSE 'pending' END AS status
                       FROM exams e
                       JOIN grades g ON g.id = e.grade_id
                       WHERE e.published = TRUE
                       {EXAM_ORDERING}"#
                ))
                .fetch_all(db)
                .await?
            }
        };

        Ok(rows.into_iter().map(ExamWithStatus::from).collect())
    }
}
