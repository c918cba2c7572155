//! Report-card listings and the generation lifecycle.
//!
//! Listings are scope-bound reads. The lifecycle operations (create,
//! publish, delete) each run inside a single transaction: a generation and
//! its cards move together or not at all. The generation row is locked with
//! `FOR UPDATE` while its batch is mutated.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use slate_core::errors::AppError;
use slate_core::pagination::PaginationMeta;
use slate_models::exams::{Exam, ExamSummary};
use slate_models::grading;
use slate_models::ids::{GenerationId, StudentId};
use slate_models::report_cards::{
    CreateGenerationDto, GenerationFilterParams, GenerationWithCount, ReportCardGeneration,
    ReportCardRow, ReportCardView,
};
use slate_models::roles::Role;
use slate_models::scope::{Identity, ReportCardScope};

use crate::modules::students::service::StudentService;

const REPORT_CARD_SELECT: &str = r#"
    SELECT rc.id, rc.student_id, rc.generation_id, rc.status, rc.generated_at,
           e.id AS exam_id, e.title AS exam_title, e.year AS exam_year, e.term AS exam_term,
           g.id AS grade_id, g.level AS grade_level,
           c.id AS class_id, c.name AS class_name,
           u.first_name AS student_first_name, u.last_name AS student_last_name
    FROM report_cards rc
    JOIN exams e ON e.id = rc.exam_id
    JOIN grades g ON g.id = e.grade_id
    JOIN classes c ON c.id = rc.class_id
    JOIN users u ON u.id = rc.student_id"#;

const REPORT_CARD_ORDERING: &str = "ORDER BY e.year DESC, e.term DESC, rc.generated_at DESC";

pub struct ReportCardService;

impl ReportCardService {
    /// List the report cards a scope may see, with display joins.
    #[instrument(skip(db))]
    pub async fn list_report_cards(
        db: &PgPool,
        scope: ReportCardScope,
    ) -> Result<Vec<ReportCardView>, AppError> {
        let (predicate, owner) = match scope {
            ReportCardScope::OwnPublished(user_id) => (
                "WHERE rc.student_id = $1 AND rc.status = 'PUBLISHED'",
                user_id,
            ),
            ReportCardScope::ChildrenPublished(parent_id) => (
                "WHERE rc.student_id IN (SELECT id FROM students WHERE parent_id = $1)
                 AND rc.status = 'PUBLISHED'",
                parent_id,
            ),
            ReportCardScope::OwnBatches(teacher_id) => (
                "WHERE rc.generation_id IN
                     (SELECT id FROM report_card_generations WHERE teacher_id = $1)",
                teacher_id,
            ),
        };

        let query = format!("{REPORT_CARD_SELECT} {predicate} {REPORT_CARD_ORDERING}");
        let rows = sqlx::query_as::<_, ReportCardRow>(&query)
            .bind(owner)
            .fetch_all(db)
            .await?;

        Ok(rows.into_iter().map(ReportCardView::from).collect())
    }

    /// The caller's summary rollups for the exams of their published cards.
    #[instrument(skip(db))]
    pub async fn list_summaries_for_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<ExamSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ExamSummary>(
            r#"SELECT es.id, es.student_id, es.exam_id, es.total_score, es.mean_score,
                      es.mean_grade, es.subject_count
               FROM exam_summaries es
               JOIN exams e ON e.id = es.exam_id
               WHERE es.student_id = $1
                 AND es.exam_id IN (
                     SELECT exam_id FROM report_cards
                     WHERE student_id = $1 AND status = 'PUBLISHED'
                 )
               ORDER BY e.year DESC, e.term DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(summaries)
    }

    /// List generation batches with card counts. Teachers see their own,
    /// admins see everything.
    #[instrument(skip(db))]
    pub async fn list_generations(
        db: &PgPool,
        identity: &Identity,
        filters: GenerationFilterParams,
    ) -> Result<(Vec<GenerationWithCount>, PaginationMeta), AppError> {
        let owner_filter: Option<Uuid> = match identity.role {
            Role::Admin => None,
            Role::Teacher => Some(identity.user_id.into_inner()),
            _ => {
                return Err(AppError::forbidden(anyhow::anyhow!(
                    "Only teachers and admins can list report card generations"
                )));
            }
        };

        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM report_card_generations rg
               WHERE ($1::uuid IS NULL OR rg.teacher_id = $1)
                 AND ($2::uuid IS NULL OR rg.exam_id = $2)"#,
        )
        .bind(owner_filter)
        .bind(filters.exam_id)
        .fetch_one(db)
        .await?;

        let generations = sqlx::query_as::<_, GenerationWithCount>(
            r#"SELECT rg.id, rg.teacher_id, rg.exam_id, rg.class_id, rg.created_at,
                      COUNT(rc.id) AS report_card_count
               FROM report_card_generations rg
               LEFT JOIN report_cards rc ON rc.generation_id = rg.id
               WHERE ($1::uuid IS NULL OR rg.teacher_id = $1)
                 AND ($2::uuid IS NULL OR rg.exam_id = $2)
               GROUP BY rg.id, rg.teacher_id, rg.exam_id, rg.class_id, rg.created_at
               ORDER BY rg.created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(owner_filter)
        .bind(filters.exam_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let meta = PaginationMeta {
            total,
            limit,
            offset: Some(offset),
            page: filters.pagination.page(),
            has_more: offset + limit < total,
        };

        Ok((generations, meta))
    }

    /// Create a generation batch: recompute summaries for the class roster
    /// and write one DRAFT card per enrolled student, atomically.
    #[instrument(skip(db))]
    pub async fn create_generation(
        db: &PgPool,
        identity: &Identity,
        dto: CreateGenerationDto,
    ) -> Result<(GenerationId, u64), AppError> {
        if !identity.role.is_staff() {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only teachers and admins can generate report cards"
            )));
        }

        let mut tx = db.begin().await?;

        let exam = sqlx::query_as::<_, Exam>(
            r#"SELECT id, title, term, year, exam_type, exam_date, grade_id, class_id,
                      published, created_at, updated_at
               FROM exams WHERE id = $1"#,
        )
        .bind(dto.exam_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))?;

        let class_grade = sqlx::query_scalar::<_, slate_models::ids::GradeId>(
            "SELECT grade_id FROM classes WHERE id = $1",
        )
        .bind(dto.class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        if class_grade != exam.grade_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Class does not belong to the exam's grade"
            )));
        }

        let roster = StudentService::class_roster(&mut *tx, dto.class_id).await?;
        if roster.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Class has no enrolled students"
            )));
        }

        for &student_id in &roster {
            Self::refresh_summary(&mut tx, student_id, &exam).await?;
        }

        let generation_id = sqlx::query_scalar::<_, GenerationId>(
            r#"INSERT INTO report_card_generations (id, teacher_id, exam_id, class_id)
               VALUES ($1, $2, $3, $4) RETURNING id"#,
        )
        .bind(Uuid::new_v4())
        .bind(identity.user_id)
        .bind(dto.exam_id)
        .bind(dto.class_id)
        .fetch_one(&mut *tx)
        .await?;

        for &student_id in &roster {
            sqlx::query(
                r#"INSERT INTO report_cards (id, student_id, class_id, exam_id, generation_id, status)
                   VALUES ($1, $2, $3, $4, $5, 'DRAFT')"#,
            )
            .bind(Uuid::new_v4())
            .bind(student_id)
            .bind(dto.class_id)
            .bind(dto.exam_id)
            .bind(generation_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            generation_id = %generation_id,
            cards = roster.len(),
            "report card generation created"
        );

        Ok((generation_id, roster.len() as u64))
    }

    /// Recompute one student's summary rollup from their results under an
    /// exam. Students with no results keep no summary row.
    async fn refresh_summary(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        student_id: StudentId,
        exam: &Exam,
    ) -> Result<(), AppError> {
        let totals = sqlx::query_as::<_, (f64, i64, i64)>(
            r#"SELECT COALESCE(SUM(er.score), 0)::float8,
                      COALESCE(SUM(es.max_marks), 0),
                      COUNT(*)
               FROM exam_results er
               JOIN exam_subjects es ON es.id = er.exam_subject_id
               WHERE es.exam_id = $1 AND er.student_id = $2"#,
        )
        .bind(exam.id)
        .bind(student_id)
        .fetch_one(&mut **tx)
        .await?;

        let (total_score, total_max, subject_count) = totals;
        if subject_count == 0 {
            return Ok(());
        }

        let mean_score = if total_max > 0 {
            total_score / total_max as f64 * 100.0
        } else {
            0.0
        };
        let mean_grade = grading::letter_for_percent(mean_score);

        sqlx::query(
            r#"INSERT INTO exam_summaries
                   (id, student_id, exam_id, total_score, mean_score, mean_grade, subject_count)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (student_id, exam_id) DO UPDATE
               SET total_score = EXCLUDED.total_score,
                   mean_score = EXCLUDED.mean_score,
                   mean_grade = EXCLUDED.mean_grade,
                   subject_count = EXCLUDED.subject_count,
                   updated_at = NOW()"#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(exam.id)
        .bind(total_score)
        .bind(mean_score)
        .bind(mean_grade)
        .bind(subject_count as i32)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Publish every card of a batch. Owner-teacher or admin only.
    #[instrument(skip(db))]
    pub async fn publish_generation(
        db: &PgPool,
        identity: &Identity,
        generation_id: GenerationId,
    ) -> Result<u64, AppError> {
        if !identity.role.is_staff() {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only teachers and admins can publish report cards"
            )));
        }

        let mut tx = db.begin().await?;

        let generation = Self::lock_generation(&mut tx, generation_id).await?;
        Self::check_ownership(identity, &generation)?;

        let published = sqlx::query(
            "UPDATE report_cards SET status = 'PUBLISHED' WHERE generation_id = $1 AND status <> 'PUBLISHED'",
        )
        .bind(generation_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(generation_id = %generation_id, published, "report cards published");

        Ok(published)
    }

    /// Delete a batch and all of its cards.
    ///
    /// Preconditions, in order: staff role, existing generation, ownership
    /// (teachers only; admins bypass ownership but not the role check).
    /// Both deletes run in one transaction; a failure between them rolls
    /// everything back.
    #[instrument(skip(db))]
    pub async fn delete_generation(
        db: &PgPool,
        identity: &Identity,
        generation_id: GenerationId,
    ) -> Result<u64, AppError> {
        if !identity.role.is_staff() {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only teachers and admins can delete report card generations"
            )));
        }

        let mut tx = db.begin().await?;

        let generation = Self::lock_generation(&mut tx, generation_id).await?;
        Self::check_ownership(identity, &generation)?;

        let deleted = sqlx::query("DELETE FROM report_cards WHERE generation_id = $1")
            .bind(generation_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM report_card_generations WHERE id = $1")
            .bind(generation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(generation_id = %generation_id, deleted, "report card generation deleted");

        Ok(deleted)
    }

    async fn lock_generation(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        generation_id: GenerationId,
    ) -> Result<ReportCardGeneration, AppError> {
        sqlx::query_as::<_, ReportCardGeneration>(
            r#"SELECT id, teacher_id, exam_id, class_id, created_at
               FROM report_card_generations WHERE id = $1 FOR UPDATE"#,
        )
        .bind(generation_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Report card generation not found")))
    }

    fn check_ownership(
        identity: &Identity,
        generation: &ReportCardGeneration,
    ) -> Result<(), AppError> {
        if identity.role == Role::Teacher && generation.teacher_id != identity.user_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You can only manage report card generations you created"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing;
    use axum::http::StatusCode;
    use slate_core::pagination::PaginationParams;
    use slate_models::ids::UserId;
    use slate_models::report_cards::ReportCardStatus;

    fn identity(user_id: UserId, role: Role) -> Identity {
        Identity::new(user_id, role)
    }

    fn no_filters() -> GenerationFilterParams {
        GenerationFilterParams {
            exam_id: None,
            pagination: PaginationParams {
                limit: None,
                offset: None,
                page: None,
            },
        }
    }

    /// One class of two students with an exam and a generated batch.
    struct Fixture {
        teacher: UserId,
        parent: UserId,
        student_a: StudentId,
        student_b: StudentId,
        class_id: slate_models::ids::ClassId,
        exam_id: slate_models::ids::ExamId,
        generation_id: GenerationId,
    }

    async fn setup(pool: &PgPool) -> Fixture {
        let grade = testing::create_grade(pool, 8).await;
        let class_id = testing::create_class(pool, grade, "8 Blue", None).await;
        let teacher = testing::create_user(pool, "teacher@school.test", "teacher").await;
        let parent = testing::create_user(pool, "parent@school.test", "parent").await;
        let student_a =
            testing::create_student(pool, "a@school.test", class_id, grade, Some(parent)).await;
        let student_b = testing::create_student(pool, "b@school.test", class_id, grade, None).await;
        let exam_id = testing::create_exam(pool, grade, "End of Term 2", 2, 2025, true).await;
        let generation_id = testing::create_generation(pool, teacher, exam_id, class_id).await;
        testing::create_report_card(pool, student_a, class_id, exam_id, generation_id, "DRAFT")
            .await;
        testing::create_report_card(pool, student_b, class_id, exam_id, generation_id, "DRAFT")
            .await;

        Fixture {
            teacher,
            parent,
            student_a,
            student_b,
            class_id,
            exam_id,
            generation_id,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_student_sees_published_only(pool: PgPool) {
        let f = setup(&pool).await;

        // All cards are drafts: nothing visible yet.
        let cards =
            ReportCardService::list_report_cards(&pool, ReportCardScope::OwnPublished(f.student_a.into_inner().into()))
                .await
                .unwrap();
        assert!(cards.is_empty());

        let teacher_id = identity(f.teacher, Role::Teacher);
        ReportCardService::publish_generation(&pool, &teacher_id, f.generation_id)
            .await
            .unwrap();

        let cards =
            ReportCardService::list_report_cards(&pool, ReportCardScope::OwnPublished(f.student_a.into_inner().into()))
                .await
                .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].status, ReportCardStatus::Published);
        assert_eq!(cards[0].exam.title, "End of Term 2");
        assert_eq!(cards[0].class.name, "8 Blue");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_parent_sees_children_published_never_drafts(pool: PgPool) {
        let f = setup(&pool).await;

        let scope = ReportCardScope::ChildrenPublished(f.parent);
        assert!(ReportCardService::list_report_cards(&pool, scope)
            .await
            .unwrap()
            .is_empty());

        ReportCardService::publish_generation(
            &pool,
            &identity(f.teacher, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap();

        // Add a fresh DRAFT card for the same child under a second batch; it
        // must stay invisible.
        let second = testing::create_generation(&pool, f.teacher, f.exam_id, f.class_id).await;
        testing::create_report_card(&pool, f.student_a, f.class_id, f.exam_id, second, "DRAFT")
            .await;

        let cards = ReportCardService::list_report_cards(&pool, scope).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].student.id.into_inner(), f.student_a.into_inner());
        assert_eq!(cards[0].status, ReportCardStatus::Published);
        // The unlinked classmate's card never appears.
        assert!(cards
            .iter()
            .all(|c| c.student.id.into_inner() != f.student_b.into_inner()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_teacher_batch_scope_includes_drafts(pool: PgPool) {
        let f = setup(&pool).await;
        let other_teacher = testing::create_user(&pool, "other@school.test", "teacher").await;
        let other_generation =
            testing::create_generation(&pool, other_teacher, f.exam_id, f.class_id).await;
        testing::create_report_card(
            &pool,
            f.student_b,
            f.class_id,
            f.exam_id,
            other_generation,
            "DRAFT",
        )
        .await;

        let cards =
            ReportCardService::list_report_cards(&pool, ReportCardScope::OwnBatches(f.teacher))
                .await
                .unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.generation_id == f.generation_id));
        assert!(cards.iter().all(|c| c.status == ReportCardStatus::Draft));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_generation_as_owner(pool: PgPool) {
        let f = setup(&pool).await;

        let deleted = ReportCardService::delete_generation(
            &pool,
            &identity(f.teacher, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 0);
        assert_eq!(testing::count_rows(&pool, "report_card_generations").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_generation_twice_is_not_found(pool: PgPool) {
        let f = setup(&pool).await;
        let owner = identity(f.teacher, Role::Teacher);

        ReportCardService::delete_generation(&pool, &owner, f.generation_id)
            .await
            .unwrap();

        let err = ReportCardService::delete_generation(&pool, &owner, f.generation_id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 0);
        assert_eq!(testing::count_rows(&pool, "report_card_generations").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_generation_non_owner_teacher_forbidden(pool: PgPool) {
        let f = setup(&pool).await;
        let outsider = testing::create_user(&pool, "outsider@school.test", "teacher").await;

        let err = ReportCardService::delete_generation(
            &pool,
            &identity(outsider, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::FORBIDDEN);
        // Nothing was touched.
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 2);
        assert_eq!(testing::count_rows(&pool, "report_card_generations").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_generation_student_forbidden(pool: PgPool) {
        let f = setup(&pool).await;

        let err = ReportCardService::delete_generation(
            &pool,
            &identity(f.student_a.into_inner().into(), Role::Student),
            f.generation_id,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_admin_bypasses_ownership_not_role(pool: PgPool) {
        let f = setup(&pool).await;
        let admin = testing::create_user(&pool, "admin@school.test", "admin").await;

        let deleted = ReportCardService::delete_generation(
            &pool,
            &identity(admin, Role::Admin),
            f.generation_id,
        )
        .await
        .unwrap();
        assert_eq!(deleted, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_generation_writes_drafts_and_summaries(pool: PgPool) {
        let grade = testing::create_grade(&pool, 10).await;
        let class_id = testing::create_class(&pool, grade, "10 Red", None).await;
        let teacher = testing::create_user(&pool, "teacher@school.test", "teacher").await;
        let with_results =
            testing::create_student(&pool, "wr@school.test", class_id, grade, None).await;
        testing::create_student(&pool, "nr@school.test", class_id, grade, None).await;

        let exam_id = testing::create_exam(&pool, grade, "Midterm", 1, 2025, true).await;
        let maths = testing::create_subject(&pool, "Mathematics", "MATH").await;
        let english = testing::create_subject(&pool, "English", "ENG").await;
        let es_maths = testing::create_exam_subject(&pool, exam_id, maths, 100, true).await;
        let es_english = testing::create_exam_subject(&pool, exam_id, english, 50, true).await;
        testing::record_result(&pool, with_results, es_maths, 80.0, "A").await;
        testing::record_result(&pool, with_results, es_english, 30.0, "B-").await;

        let (generation_id, cards) = ReportCardService::create_generation(
            &pool,
            &identity(teacher, Role::Teacher),
            CreateGenerationDto { exam_id, class_id },
        )
        .await
        .unwrap();

        assert_eq!(cards, 2);
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 2);

        let drafts = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM report_cards WHERE generation_id = $1 AND status = 'DRAFT'",
        )
        .bind(generation_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(drafts, 2);

        // Only the student with results gets a summary: 110/150 ≈ 73.3% → B+.
        let summaries = sqlx::query_as::<_, ExamSummary>(
            r#"SELECT id, student_id, exam_id, total_score, mean_score, mean_grade, subject_count
               FROM exam_summaries"#,
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].student_id, with_results);
        assert_eq!(summaries[0].total_score, 110.0);
        assert_eq!(summaries[0].subject_count, 2);
        assert_eq!(summaries[0].mean_grade, "B+");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_generation_rejects_mismatched_class(pool: PgPool) {
        let grade_a = testing::create_grade(&pool, 6).await;
        let grade_b = testing::create_grade(&pool, 7).await;
        let class_id = testing::create_class(&pool, grade_b, "7 Green", None).await;
        testing::create_student(&pool, "x@school.test", class_id, grade_b, None).await;
        let teacher = testing::create_user(&pool, "teacher@school.test", "teacher").await;
        let exam_id = testing::create_exam(&pool, grade_a, "Opener", 1, 2025, true).await;

        let err = ReportCardService::create_generation(
            &pool,
            &identity(teacher, Role::Teacher),
            CreateGenerationDto { exam_id, class_id },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(testing::count_rows(&pool, "report_card_generations").await, 0);
        assert_eq!(testing::count_rows(&pool, "report_cards").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_publish_generation_owner_only(pool: PgPool) {
        let f = setup(&pool).await;
        let outsider = testing::create_user(&pool, "outsider@school.test", "teacher").await;

        let err = ReportCardService::publish_generation(
            &pool,
            &identity(outsider, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let published = ReportCardService::publish_generation(
            &pool,
            &identity(f.teacher, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap();
        assert_eq!(published, 2);

        // Publishing again touches nothing.
        let republished = ReportCardService::publish_generation(
            &pool,
            &identity(f.teacher, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap();
        assert_eq!(republished, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_generations_scoping(pool: PgPool) {
        let f = setup(&pool).await;
        let other_teacher = testing::create_user(&pool, "other@school.test", "teacher").await;
        testing::create_generation(&pool, other_teacher, f.exam_id, f.class_id).await;

        let (own, _) = ReportCardService::list_generations(
            &pool,
            &identity(f.teacher, Role::Teacher),
            no_filters(),
        )
        .await
        .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, f.generation_id);
        assert_eq!(own[0].report_card_count, 2);

        let admin = testing::create_user(&pool, "admin@school.test", "admin").await;
        let (all, meta) = ReportCardService::list_generations(
            &pool,
            &identity(admin, Role::Admin),
            no_filters(),
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(meta.total, 2);

        let err = ReportCardService::list_generations(
            &pool,
            &identity(f.parent, Role::Parent),
            no_filters(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_summaries_follow_published_cards(pool: PgPool) {
        let f = setup(&pool).await;

        sqlx::query(
            r#"INSERT INTO exam_summaries
                   (id, student_id, exam_id, total_score, mean_score, mean_grade, subject_count)
               VALUES ($1, $2, $3, 320, 64, 'B-', 5)"#,
        )
        .bind(Uuid::new_v4())
        .bind(f.student_a)
        .bind(f.exam_id)
        .execute(&pool)
        .await
        .unwrap();

        // Cards still drafts: the summary stays hidden with them.
        let summaries = ReportCardService::list_summaries_for_student(&pool, f.student_a)
            .await
            .unwrap();
        assert!(summaries.is_empty());

        ReportCardService::publish_generation(
            &pool,
            &Identity::new(f.teacher, Role::Teacher),
            f.generation_id,
        )
        .await
        .unwrap();

        let summaries = ReportCardService::list_summaries_for_student(&pool, f.student_a)
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].mean_grade, "B-");
    }
}
