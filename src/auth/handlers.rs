use axum::{
    extract::{FromRef, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            DeleteAccountRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
            MessageResponse, RegisterRequest, UserListResponse,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/delete", delete(delete_account))
        .route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::BadRequest("Email already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    // The pre-insert lookup races with concurrent registrations; the unique
    // constraint on email settles the loser with the same 400.
    let user = match User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &hash,
        &payload.q1,
        &payload.q2,
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(db))
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            warn!(email = %payload.email, "lost duplicate-email race");
            return Err(ApiError::BadRequest("Email already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse {
        message: "Registered successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.name)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Logged in".into(),
        token,
        name: user.name,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Answers are compared verbatim; both must match exactly.
    if user.q1 != payload.q1 || user.q2 != payload.q2 {
        warn!(user_id = %user.id, "security answers mismatch");
        return Err(ApiError::Unauthorized(
            "Security answers do not match".into(),
        ));
    }

    let hash = hash_password(&payload.new_pass)?;
    User::update_password(&state.db, &payload.email, &hash).await?;

    info!(user_id = %user.id, "password reset via security answers");
    Ok(Json(MessageResponse {
        message: "Password updated successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::BadRequest("Email and password required".into())),
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "delete with invalid password");
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    }

    User::delete_by_id(&state.db, user.id).await?;

    info!(user_id = %user.id, "account deleted");
    Ok(Json(MessageResponse {
        message: "Account deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = User::list_public(&state.db).await?;
    info!(requested_by = %claims.sub, count = users.len(), "user list served");
    Ok(Json(UserListResponse {
        count: users.len(),
        users,
    }))
}
