use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{CurrentUserQuery, LoginRequest, RegisterRequest, UserView},
        error::UserError,
        export::{self, CSV_CONTENT_TYPE, CSV_FILENAME},
        extractors::Payload,
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(login))
        .route("/users/register", post(register))
        .route("/users/me", get(current_user))
        .route("/users/export", get(export_users))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<Json<UserView>, ApiError> {
    services::login(state.users.as_ref(), payload.facebook_id.as_deref())
        .await
        .map(Json)
        .map_err(|e| match e {
            UserError::NotFound => ApiError::not_found("User not found. Please register first."),
            other => other.into(),
        })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    services::register(
        state.users.as_ref(),
        payload.full_name.as_deref(),
        payload.email.as_deref(),
        payload.facebook_id.as_deref(),
    )
    .await
    .map(|user| (StatusCode::CREATED, Json(user)))
    .map_err(|e| match e {
        UserError::MissingField => {
            ApiError::bad_request("Full name, email, and Facebook ID are required.")
        }
        other => other.into(),
    })
}

#[instrument(skip(state, query))]
pub async fn current_user(
    State(state): State<AppState>,
    query: Option<Query<CurrentUserQuery>>,
) -> Result<Json<UserView>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let user = services::current_user(state.users.as_ref(), query.facebook_id.as_deref()).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn export_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = export::export_users(state.users.as_ref()).await?;
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILENAME}\""),
            ),
        ],
        body,
    ))
}
