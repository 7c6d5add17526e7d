use crate::models::{Envelope, UPDATED_MESSAGE};
use crate::routes;
use axum::{extract::Path, http::StatusCode, Json};

/// PUT/PATCH /object-store/{id} handler - Update a record
///
/// The body is not read and storage is not touched.
#[utoipa::path(
    method(put, patch),
    path = routes::OBJECT_STORE_ITEM,
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "Update acknowledged", body = Envelope)
    ),
    tag = "object-store"
)]
pub async fn update_handler(Path(id): Path<String>) -> (StatusCode, Json<Envelope>) {
    tracing::debug!("Updating object record {} (static response)", id);
    (StatusCode::OK, Json(Envelope::message_with_data(UPDATED_MESSAGE)))
}
