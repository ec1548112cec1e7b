use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::{
    dto::auth::{
        Claims, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
        ResetPasswordRequest, UpdateProfileRequest, VerifyEmailRequest,
    },
    email::{reset_email, send_best_effort, verification_email},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_LIFETIME_DAYS: i64 = 7;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email є обов'язковим".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Невірний формат email".to_string());
    }
    Ok(())
}

/// Password policy: at least 8 characters, one letter, one digit, one symbol.
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors: Vec<&str> = Vec::new();
    if password.len() < 8 {
        errors.push("Пароль має бути не менше 8 символів");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Пароль має містити хоча б одну літеру");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Пароль має містити хоча б одну цифру");
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        errors.push("Пароль має містити хоча б один спеціальний символ");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join(", "))
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Opaque single-use token for email verification and password reset links.
fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    phone: Option<String>,
    address: Option<String>,
    avatar: Option<String>,
    email_verified: bool,
    created_at: DateTime<Utc>,
}

fn user_from_row(row: &UserRow) -> User {
    User {
        id: row.id,
        email: row.email.clone(),
        name: row.name.clone(),
        role: row.role.clone(),
        phone: row.phone.clone(),
        address: row.address.clone(),
        avatar: row.avatar.clone(),
        email_verified: row.email_verified,
        created_at: row.created_at,
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, phone, address, avatar, \
     email_verified, created_at";

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload;

    if email.is_empty() || password.is_empty() || name.is_empty() {
        return Err(AppError::BadRequest(
            "Email, пароль та ім'я є обов'язковими".into(),
        ));
    }
    validate_email(&email).map_err(AppError::BadRequest)?;
    validate_password(&password).map_err(AppError::BadRequest)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict(
            "Користувач з таким email вже існує".into(),
        ));
    }

    let password_hash = hash_password(&password)?;
    let verification_token = generate_token();
    let token_expires = Utc::now() + Duration::hours(24);
    let id = Uuid::new_v4();

    let row: UserRow = sqlx::query_as(&format!(
        "INSERT INTO users (id, email, password_hash, name, verification_token, verification_token_expires) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}",
    ))
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(name.as_str())
    .bind(&verification_token)
    .bind(token_expires)
    .fetch_one(&state.pool)
    .await?;

    let verification_url = format!(
        "{}/verify-email?token={verification_token}",
        state.public_base_url
    );
    send_best_effort(
        &state.mailer,
        &email,
        "Підтвердіть вашу електронну адресу",
        verification_email(&name, &verification_url),
    )
    .await;

    Ok(ApiResponse::success(
        "Реєстрація успішна. Перевірте вашу електронну пошту для підтвердження.",
        user_from_row(&row),
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&state.pool)
            .await?;
    let row = match row {
        Some(r) => r,
        None => return Err(AppError::Unauthorized("Invalid credentials".into())),
    };

    if !verify_password(&password, &row.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = issue_token(&row)?;

    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(row.id)
        .execute(&state.pool)
        .await?;

    let resp = LoginResponse {
        user: user_from_row(&row),
        token,
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

fn issue_token(row: &UserRow) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::days(TOKEN_LIFETIME_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: row.id.to_string(),
        email: row.email.clone(),
        role: row.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn verify_email(
    state: &AppState,
    payload: VerifyEmailRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.token.is_empty() {
        return Err(AppError::BadRequest("Token is required".into()));
    }

    let result = sqlx::query(
        "UPDATE users SET email_verified = TRUE, verification_token = NULL, \
         verification_token_expires = NULL \
         WHERE verification_token = $1 AND verification_token_expires > now()",
    )
    .bind(&payload.token)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Invalid or expired token".into()));
    }

    Ok(ApiResponse::success(
        "Email підтверджено",
        serde_json::json!({}),
        None,
    ))
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let row = match row {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Profile", user_from_row(&row), None))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let existing: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut password_hash: Option<String> = None;
    if let Some(new_password) = payload.new_password.as_deref() {
        validate_password(new_password).map_err(AppError::BadRequest)?;
        let current = payload
            .current_password
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Поточний пароль є обов'язковим".into()))?;
        if !verify_password(current, &existing.password_hash)? {
            return Err(AppError::BadRequest("Невірний поточний пароль".into()));
        }
        password_hash = Some(hash_password(new_password)?);
    }

    if let Some(email) = payload.email.as_deref() {
        validate_email(email).map_err(AppError::BadRequest)?;
        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(user.user_id)
                .fetch_optional(&state.pool)
                .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Email вже зайнятий".into()));
        }
    }

    let row: UserRow = sqlx::query_as(&format!(
        "UPDATE users SET \
            name = COALESCE($2, name), \
            phone = COALESCE($3, phone), \
            address = COALESCE($4, address), \
            avatar = COALESCE($5, avatar), \
            email = COALESCE($6, email), \
            password_hash = COALESCE($7, password_hash), \
            updated_at = now() \
         WHERE id = $1 RETURNING {USER_COLUMNS}",
    ))
    .bind(user.user_id)
    .bind(payload.name)
    .bind(payload.phone)
    .bind(payload.address)
    .bind(payload.avatar)
    .bind(payload.email)
    .bind(password_hash)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Updated", user_from_row(&row), None))
}

/// Removes the account and everything keyed to it. Carts and favorites go
/// through the FK cascade; orders are deleted explicitly since they carry no
/// cascade.
pub async fn delete_account(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM orders WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Account deleted successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }

    // The response must not reveal whether the address is registered.
    let neutral = ApiResponse::success(
        "If the email exists, a reset link has been sent",
        serde_json::json!({}),
        None,
    );

    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(payload.email.as_str())
            .fetch_optional(&state.pool)
            .await?;
    let row = match row {
        Some(r) => r,
        None => return Ok(neutral),
    };

    let reset_token = generate_token();
    sqlx::query(
        "UPDATE users SET reset_token = $2, reset_token_expires = now() + interval '1 hour' \
         WHERE id = $1",
    )
    .bind(row.id)
    .bind(&reset_token)
    .execute(&state.pool)
    .await?;

    let reset_url = format!("{}/reset-password?token={reset_token}", state.public_base_url);
    send_best_effort(
        &state.mailer,
        &row.email,
        "Скидання паролю",
        reset_email(&row.name, &reset_url),
    )
    .await;

    Ok(neutral)
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.token.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "Token and new password are required".into(),
        ));
    }
    validate_password(&payload.new_password).map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&payload.new_password)?;
    let result = sqlx::query(
        "UPDATE users SET password_hash = $2, reset_token = NULL, reset_token_expires = NULL \
         WHERE reset_token = $1 AND reset_token_expires > now()",
    )
    .bind(&payload.token)
    .bind(password_hash)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest("Invalid or expired token".into()));
    }

    Ok(ApiResponse::success(
        "Password has been reset successfully",
        serde_json::json!({}),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes_all_rules() {
        assert!(validate_password("S3cure!pass").is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("S3c!").is_err());
    }

    #[test]
    fn password_without_letter_is_rejected() {
        assert!(validate_password("12345678!").is_err());
    }

    #[test]
    fn password_without_digit_is_rejected() {
        assert!(validate_password("Password!").is_err());
    }

    #[test]
    fn password_without_symbol_is_rejected() {
        assert!(validate_password("Password1").is_err());
    }

    #[test]
    fn email_format_is_checked() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn password_hash_round_trips() {
        let hash = hash_password("S3cure!pass").unwrap();
        assert!(verify_password("S3cure!pass", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn generated_tokens_are_opaque_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
