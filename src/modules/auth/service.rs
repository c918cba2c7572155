use sqlx::PgPool;
use tracing::instrument;

use slate_core::errors::AppError;
use slate_core::password::verify_password;
use slate_models::users::User;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::LoginResponse;
use crate::utils::jwt::create_access_token;

/// Row fetched during login; the only place the password hash leaves the
/// database.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, password, jwt_config))]
    pub async fn login(
        db: &PgPool,
        email: &str,
        password: &str,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"SELECT id, first_name, last_name, email, role, created_at, updated_at, password
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        if !verify_password(password, &row.password)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let access_token = create_access_token(
            row.user.id,
            &row.user.email,
            row.user.role.as_str(),
            jwt_config,
        )?;

        Ok(LoginResponse {
            access_token,
            user: row.user,
        })
    }

    /// Fetch the profile of an authenticated user.
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: slate_models::ids::UserId) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, role, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }
}
