use crate::models::{Envelope, DELETED_MESSAGE};
use crate::routes;
use axum::{extract::Path, http::StatusCode, Json};

/// DELETE /object-store/{id} handler - Delete a record
///
/// Acknowledges without removing anything.
#[utoipa::path(
    delete,
    path = routes::OBJECT_STORE_ITEM,
    params(
        ("id" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "Deletion acknowledged", body = Envelope)
    ),
    tag = "object-store"
)]
pub async fn destroy_handler(Path(id): Path<String>) -> (StatusCode, Json<Envelope>) {
    tracing::debug!("Deleting object record {} (static response)", id);
    (StatusCode::OK, Json(Envelope::message(DELETED_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{read_json, send, test_app};
    use crate::store::ObjectRepository;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_delete_returns_message_without_data() {
        let (app, _) = test_app();

        let response = send(&app, "DELETE", "/object-store/3", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = read_json(response).await;
        assert_eq!(
            body,
            json!({"success": true, "message": "Resource deleted successfully"})
        );
    }

    #[tokio::test]
    async fn test_delete_keeps_record() {
        let (app, store) = test_app();

        send(&app, "POST", "/object-store", Some(json!({"key": "k", "value": 1}))).await;
        send(&app, "DELETE", "/object-store/1", None).await;

        assert_eq!(store.count().await.unwrap(), 1);
    }
}
