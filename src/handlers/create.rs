use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateObjectRequest, Envelope, CREATED_MESSAGE};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /object-store handler - Store a key and an arbitrary JSON value
///
/// Every call writes a new record stamped with the server's clock; keys are
/// not unique. The response is the canned creation envelope.
#[utoipa::path(
    post,
    path = routes::OBJECT_STORE,
    request_body = CreateObjectRequest,
    responses(
        (status = 201, description = "Record stored", body = Envelope),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Body is missing `key`"),
        (status = 500, description = "Storage write failed", body = ErrorResponse)
    ),
    tag = "object-store"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateObjectRequest>,
) -> Result<(StatusCode, Json<Envelope>), ApiError> {
    let record = state.service.create(request.key, request.value).await?;

    tracing::debug!("Created object record {} for key {:?}", record.id, record.key);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::message_with_data(CREATED_MESSAGE)),
    ))
}
