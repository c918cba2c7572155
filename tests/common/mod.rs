#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use slate::config::cors::CorsConfig;
use slate::config::jwt::JwtConfig;
use slate::router::init_router;
use slate::slate_core::password::hash_password;
use slate::state::AppState;

pub async fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

/// Log in through the API and return the access token.
pub async fn get_auth_token(app: Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Create a user with the given role.
pub async fn create_user(pool: &PgPool, email: &str, password: &str, role: &str) -> Uuid {
    let hashed = hash_password(password).unwrap();
    sqlx::query_scalar::<_, Uuid>(
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

pub async fn create_grade(pool: &PgPool, level: i32) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO grades (id, level) VALUES ($1, $2) RETURNING id")
        .bind(Uuid::new_v4())
        .bind(level)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_class(pool: &PgPool, grade_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO classes (id, name, capacity, grade_id)
           VALUES ($1, $2, 40, $3) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(grade_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Create a student user (password `testpass123`) plus their enrollment.
pub async fn create_student(
    pool: &PgPool,
    email: &str,
    class_id: Uuid,
    grade_id: Uuid,
    parent_id: Option<Uuid>,
) -> Uuid {
    let user_id = create_user(pool, email, "testpass123", "student").await;
    sqlx::query(
        r#"INSERT INTO students (id, class_id, grade_id, parent_id, admission_number)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(user_id)
    .bind(class_id)
    .bind(grade_id)
    .bind(parent_id)
    .bind(format!("ADM-{}", &user_id.to_string()[..8]))
    .execute(pool)
    .await
    .unwrap();
    user_id
}

pub async fn create_subject(pool: &PgPool, name: &str, code: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO subjects (id, name, code) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_exam(
    pool: &PgPool,
    grade_id: Uuid,
    title: &str,
    term: i32,
    year: i32,
    published: bool,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO exams (id, title, term, year, exam_type, exam_date, grade_id, published)
           VALUES ($1, $2, $3, $4, 'endterm', $5, $6, $7) RETURNING id"#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(term)
    .bind(year)
    .bind(chrono::NaiveDate::from_ymd_opt(year, (term * 3).min(12) as u32, 14).unwrap())
    .bind(grade_id)
    .bind(published)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_exam_subject(
    pool: &PgPool,
    exam_id: Uuid,
    subject_id: Uuid,
    max_marks: i32,
    marks_entered: bool,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
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
    student_id: Uuid,
    exam_subject_id: Uuid,
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
    teacher_id: Uuid,
    exam_id: Uuid,
    class_id: Uuid,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
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
    student_id: Uuid,
    class_id: Uuid,
    exam_id: Uuid,
    generation_id: Uuid,
    status: &str,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
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
