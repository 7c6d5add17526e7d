use crate::models::Envelope;
use crate::routes;
use axum::{http::StatusCode, Json};

/// GET /object-store handler - List records
///
/// Returns a fixed empty envelope; storage is not read.
#[utoipa::path(
    get,
    path = routes::OBJECT_STORE,
    responses(
        (status = 200, description = "Empty listing", body = Envelope)
    ),
    tag = "object-store"
)]
pub async fn list_handler() -> (StatusCode, Json<Envelope>) {
    tracing::debug!("Listing object records (static response)");
    (StatusCode::OK, Json(Envelope::empty_data()))
}
