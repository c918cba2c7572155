//! Enrollment lookups shared by the exam and report-card modules.
//!
//! No routes of its own: parents and students never address student rows
//! directly, they reach them through the scoped listings.

use sqlx::PgPool;
use tracing::instrument;

use slate_core::errors::AppError;
use slate_models::ids::{ClassId, StudentId, UserId};
use slate_models::students::ChildInfo;

pub struct StudentService;

impl StudentService {
    /// The children linked to a parent account, with display fields joined.
    #[instrument(skip(db))]
    pub async fn get_children_of_parent(
        db: &PgPool,
        parent_id: UserId,
    ) -> Result<Vec<ChildInfo>, AppError> {
        let children = sqlx::query_as::<_, ChildInfo>(
            r#"SELECT s.id, u.first_name, u.last_name, s.admission_number, g.level AS grade_level
               FROM students s
               JOIN users u ON u.id = s.id
               JOIN grades g ON g.id = s.grade_id
               WHERE s.parent_id = $1
               ORDER BY u.first_name, u.last_name"#,
        )
        .bind(parent_id)
        .fetch_all(db)
        .await?;

        Ok(children)
    }

    /// Ids of every student enrolled in a class.
    #[instrument(skip(executor))]
    pub async fn class_roster<'e, E>(executor: E, class_id: ClassId) -> Result<Vec<StudentId>, AppError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let roster = sqlx::query_scalar::<_, StudentId>(
            "SELECT id FROM students WHERE class_id = $1 ORDER BY admission_number",
        )
        .bind(class_id)
        .fetch_all(executor)
        .await?;

        Ok(roster)
    }
}
