mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    authed_get, create_class, create_exam, create_exam_subject, create_grade, create_student,
    create_subject, create_user, generate_unique_email, get_auth_token, read_json, record_result,
    setup_test_app,
};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_my_exams_requires_authentication(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/exams/my-exams")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_exams_rejects_unrecognized_role(pool: PgPool) {
    dotenvy::dotenv().ok();
    let app = setup_test_app(pool).await;

    // Mint a syntactically valid token whose role has no planning rule.
    let token = slate::utils::jwt::create_access_token(
        slate::slate_models::ids::UserId::new(),
        "odd@school.test",
        "librarian",
        &slate::config::jwt::JwtConfig::from_env(),
    )
    .unwrap();

    let response = app
        .oneshot(authed_get("/api/exams/my-exams", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_exam_listing_with_derived_status(pool: PgPool) {
    let grade = create_grade(&pool, 11).await;
    let other_grade = create_grade(&pool, 12).await;
    let class = create_class(&pool, grade, "11 East").await;
    let email = generate_unique_email();
    let student = create_student(&pool, &email, class, grade, None).await;

    let exam = create_exam(&pool, grade, "End of Term 2", 2, 2025, true).await;
    create_exam(&pool, other_grade, "Grade 12 Mock", 2, 2025, true).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_get("/api/exams/my-exams", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "student");
    let exams = body["exams"].as_array().unwrap();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0]["id"], exam.to_string());
    assert_eq!(exams[0]["status"], "pending");
    assert_eq!(exams[0]["grade"]["level"], 11);

    // Enter a result and list again: status is derived at read time.
    let subject = create_subject(&pool, "Mathematics", "MATH").await;
    let exam_subject = create_exam_subject(&pool, exam, subject, 100, true).await;
    record_result(&pool, student, exam_subject, 72.5, "B+").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_get("/api/exams/my-exams", &token))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["exams"][0]["status"], "completed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_sees_only_exams_with_taught_subjects(pool: PgPool) {
    let grade = create_grade(&pool, 9).await;
    let email = generate_unique_email();
    let teacher = create_user(&pool, &email, "testpass123", "teacher").await;
    let maths = create_subject(&pool, "Mathematics", "MATH").await;
    let art = create_subject(&pool, "Art", "ART").await;
    sqlx::query("INSERT INTO teacher_subjects (teacher_id, subject_id) VALUES ($1, $2)")
        .bind(teacher)
        .bind(maths)
        .execute(&pool)
        .await
        .unwrap();

    let taught = create_exam(&pool, grade, "Maths Midterm", 1, 2025, true).await;
    create_exam_subject(&pool, taught, maths, 100, false).await;
    let untaught = create_exam(&pool, grade, "Art Only", 2, 2025, true).await;
    create_exam_subject(&pool, untaught, art, 100, false).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_get("/api/exams/my-exams", &token))
        .await
        .unwrap();
    let body = read_json(response).await;

    assert_eq!(body["role"], "teacher");
    let exams = body["exams"].as_array().unwrap();
    assert_eq!(exams.len(), 1);
    assert_eq!(exams[0]["id"], taught.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_listing_is_published_only_and_ordered(pool: PgPool) {
    let grade = create_grade(&pool, 10).await;
    let email = generate_unique_email();
    create_user(&pool, &email, "testpass123", "admin").await;

    let older = create_exam(&pool, grade, "Term 1", 1, 2025, true).await;
    let newer = create_exam(&pool, grade, "Term 3", 3, 2025, true).await;
    create_exam(&pool, grade, "Hidden", 2, 2025, false).await;

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "testpass123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(authed_get("/api/exams/my-exams", &token))
        .await
        .unwrap();
    let body = read_json(response).await;

    let exams = body["exams"].as_array().unwrap();
    assert_eq!(exams.len(), 2);
    assert_eq!(exams[0]["id"], newer.to_string());
    assert_eq!(exams[1]["id"], older.to_string());
}
