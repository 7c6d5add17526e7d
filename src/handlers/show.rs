use crate::models::Envelope;
use crate::routes;
use axum::{extract::Path, http::StatusCode, Json};

/// GET /object-store/{id} handler - Show a record
///
/// Returns a fixed empty envelope for any id; storage is not read.
#[utoipa::path(
    get,
    path = routes::OBJECT_STORE_ITEM,
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "Empty record envelope", body = Envelope)
    ),
    tag = "object-store"
)]
pub async fn show_handler(Path(id): Path<String>) -> (StatusCode, Json<Envelope>) {
    tracing::debug!("Showing object record {} (static response)", id);
    (StatusCode::OK, Json(Envelope::empty_data()))
}
