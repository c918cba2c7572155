//! Raw-SQL fixtures shared by the service test suites.
//!
//! Exam setup (exams, subjects, results) is owned by admin tooling and
//! marks-entry workflows outside this service, so tests write those rows
//! directly instead of going through an API.

use sqlx::PgPool;
use uuid::Uuid;

use slate_core::password::hash_password;
use slate_models::ids::{
    ClassId, ExamId, ExamSubjectId, GenerationId, GradeId, ReportCardId, StudentId, SubjectId,
    UserId,
};

pub async fn create_grade(pool: &PgPool, level: i32) -> GradeId {
    sqlx::query_scalar::<_, GradeId>(
        "INSERT INTO grades (id, level) VALUES ($1, $2) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(level)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_class(
    pool: &PgPool,
    grade_id: GradeId,
    name: &str,
    class_teacher_id: Option<UserId>,
) -> ClassId {
    sqlx::query_scalar::<_, ClassId>(
        r#"INSERT INTO classes (id, name, capacity, grade_id, class_teacher_id)
           VALUES ($1, $2, 40, $3, $4) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(grade_id)
    .bind(class_teacher_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a user with the given role. The password is always `testpass123`.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> UserId {
    let hashed = hash_password("testpass123").unwrap();
    sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (id, first_name, last_name, email, password, role)
           VALUES ($1, 'Test', 'User', $2, $3, $4) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a student user plus their enrollment row.
pub async fn create_student(
    pool: &PgPool,
    email: &str,
    class_id: ClassId,
    grade_id: GradeId,
    parent_id: Option<UserId>,
) -> StudentId {
    let user_id = create_user(pool, email, "student").await;
    sqlx::query_scalar::<_, StudentId>(
        r#"INSERT INTO students (id, class_id, grade_id, parent_id, admission_number)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind(user_id)
    .bind(class_id)
    .bind(grade_id)
    .bind(parent_id)
    .bind(format!("ADM-{}", &user_id.to_string()[..8]))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_subject(pool: &PgPool, name: &str, code: &str) -> SubjectId {
    sqlx::query_scalar::<_, SubjectId>(
        "INSERT INTO subjects (id, name, code) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn assign_subject_to_teacher(pool: &PgPool, teacher_id: UserId, subject_id: SubjectId) {
    sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
        .bind(teacher_id)
        .bind(subject_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_exam(
    pool: &PgPool,
    grade_id: GradeId,
    title: &str,
    term: i32,
    year: i32,
    published: bool,
) -> ExamId {
    sqlx::query_scalar::<_, ExamId>(
        r#"INSERT INTO exams (id, title, term, year, exam_type, exam_date, grade_id, published)
           VALUES ($1, $2, $3, $4, 'endterm', $5, $6, $7) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(term)
    .bind(year)
    .bind(
        chrono::NaiveDate::from_ymd_opt(year, (term * 3).min(12) as u32, 14).unwrap(),
    )
    .bind(grade_id)
    .bind(published)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_exam_subject(
    pool: &PgPool,
    exam_id: ExamId,
    subject_id: SubjectId,
    max_marks: i32,
    marks_entered: bool,
) -> ExamSubjectId {
    sqlx::query_scalar::<_, ExamSubjectId>(
        r#"INSERT INTO exam_subjects (id, exam_id, subject_id, max_marks, marks_entered)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(exam_id)
    .bind(subject_id)
    .bind(max_marks)
    .bind(marks_entered)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn record_result(
    pool: &PgPool,
    student_id: StudentId,
    exam_subject_id: ExamSubjectId,
    score: f64,
    grade: &str,
) {
    sqlx::query(
        r#"INSERT INTO exam_results (id, student_id, exam_subject_id, score, grade)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(exam_subject_id)
    .bind(score)
    .bind(grade)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_generation(
    pool: &PgPool,
    teacher_id: UserId,
    exam_id: ExamId,
    class_id: ClassId,
) -> GenerationId {
    sqlx::query_scalar::<_, GenerationId>(
        r#"INSERT INTO report_card_generations (id, teacher_id, exam_id, class_id)
           VALUES ($1, $2, $3, $4) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(teacher_id)
    .bind(exam_id)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_report_card(
    pool: &PgPool,
    student_id: StudentId,
    class_id: ClassId,
    exam_id: ExamId,
    generation_id: GenerationId,
    status: &str,
) -> ReportCardId {
    sqlx::query_scalar::<_, ReportCardId>(
        r#"INSERT INTO report_cards (id, student_id, class_id, exam_id, generation_id, status)
           VALUES ($1, $2, $3, $4, $5, $6) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(class_id)
    .bind(exam_id)
    .bind(generation_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
