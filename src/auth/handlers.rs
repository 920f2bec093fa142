use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            DeleteAccountRequest, LoginRequest, MessageResponse, PublicUser, RegisterRequest,
            UpdateProfileRequest, UserResponse,
        },
        extractors::{CurrentUser, SessionToken},
        password::{hash_password, verify_password},
        repo::User,
        sessions,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(profile))
        .route("/user/update-profile", post(update_profile))
        .route("/user/delete-account", delete(delete_account))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Treat absent and blank fields the same way.
fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn set_session_cookie(state: &AppState, token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        sessions::session_cookie(&state.config.session, token)
            .parse()
            .unwrap(),
    );
    headers
}

fn clear_session_cookie(state: &AppState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        sessions::clear_session_cookie(&state.config.session)
            .parse()
            .unwrap(),
    );
    headers
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), AppError> {
    let (Some(name), Some(email), Some(password)) = (
        provided(payload.name),
        provided(payload.email),
        provided(payload.password),
    ) else {
        return Err(AppError::Validation(
            "Name, email, and password are required.".into(),
        ));
    };
    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();

    let hash = hash_password(&password)?;

    // The unique constraint on users.email arbitrates duplicates
    let user = User::create(&state.db, &name, &email, &hash).await?;

    let token = sessions::create(&state.db, user.id).await?;
    let headers = set_session_cookie(&state, &token);

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(UserResponse {
            message: "User registered successfully!".into(),
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<UserResponse>), AppError> {
    let (Some(email), Some(password)) = (provided(payload.email), provided(payload.password))
    else {
        return Err(AppError::Validation(
            "Email and password are required.".into(),
        ));
    };
    let email = email.trim().to_lowercase();

    // One generic failure for unknown email and wrong password alike
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!("login with unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = sessions::create(&state.db, user.id).await?;
    let headers = set_session_cookie(&state, &token);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(UserResponse {
            message: "Login successful!".into(),
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, token))]
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    if let Some(token) = token {
        sessions::destroy(&state.db, &token).await?;
    }
    Ok((
        clear_session_cookie(&state),
        Json(MessageResponse {
            message: "Logged out successfully.".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let (Some(name), Some(email), Some(current_password)) = (
        provided(payload.name),
        provided(payload.email),
        provided(payload.current_password),
    ) else {
        return Err(AppError::Validation(
            "Name, email, and current password are required.".into(),
        ));
    };
    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    let new_password = provided(payload.new_password);
    if let Some(pw) = &new_password {
        if pw.len() < 6 {
            return Err(AppError::Validation(
                "New password must be at least 6 characters.".into(),
            ));
        }
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    // Nothing is mutated unless the current password verifies
    if !verify_password(&current_password, &user.password_hash)? {
        warn!(user_id = %user.id, "profile update with invalid password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let new_hash = match &new_password {
        Some(pw) => Some(hash_password(pw)?),
        None => None,
    };

    let updated = User::update(&state.db, user_id, &name, &email, new_hash.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(UserResponse {
        message: "Profile updated successfully!".into(),
        user: PublicUser {
            id: updated.id,
            name: updated.name,
            email: updated.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    let Some(password) = provided(payload.password) else {
        return Err(AppError::Unauthorized("Invalid password".into()));
    };

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "account deletion with invalid password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    // Sessions and stored QR codes go with the row via FK cascade
    User::delete(&state.db, user_id).await?;

    info!(user_id = %user_id, "account deleted");
    Ok((
        clear_session_cookie(&state),
        Json(MessageResponse {
            message: "Account deleted successfully.".into(),
        }),
    ))
}
