use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::MessageResponse,
        extractors::{CurrentUser, MaybeUser},
    },
    error::AppError,
    state::AppState,
};

use super::dto::{GenerateRequest, GenerateResponse, QrCodeItem};
use super::encode::encode_data_uri;
use super::repo::QrCodeRecord;

pub fn qr_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-qr", post(generate_qr))
        .route("/user/qr-codes", get(list_qr_codes))
        .route("/user/delete-qr/:id", delete(delete_qr_code))
}

#[instrument(skip(state, payload))]
pub async fn generate_qr(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Some(data) = payload.data.filter(|d| !d.is_empty()) else {
        return Err(AppError::Validation("No data provided".into()));
    };

    let qr_code = encode_data_uri(&data)?;

    // Anonymous callers get the image back but nothing is stored
    if let Some(user_id) = user_id {
        let record = QrCodeRecord::create(&state.db, user_id, &data, &qr_code).await?;
        info!(user_id = %user_id, record_id = %record.id, "qr code stored");
    }

    Ok(Json(GenerateResponse { qr_code }))
}

#[instrument(skip(state))]
pub async fn list_qr_codes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<QrCodeItem>>, AppError> {
    let records = QrCodeRecord::list_by_user(&state.db, user_id).await?;
    let items = records
        .into_iter()
        .map(|r| QrCodeItem {
            id: r.id,
            qr_text: r.qr_text,
            qr_image: r.qr_image,
            timestamp: r.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn delete_qr_code(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !QrCodeRecord::delete_owned(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("QR code not found".into()));
    }

    info!(user_id = %user_id, record_id = %id, "qr code deleted");
    Ok(Json(MessageResponse {
        message: "QR code deleted successfully.".into(),
    }))
}
