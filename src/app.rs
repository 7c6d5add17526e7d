use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_handler, destroy_handler, health_handler, list_handler, show_handler, update_handler,
};
use crate::routes;
use crate::state::AppState;

/// Assemble the HTTP surface: object-store endpoints, health, and API docs
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::OBJECT_STORE, get(list_handler).post(create_handler))
        .route(
            routes::OBJECT_STORE_ITEM,
            get(show_handler)
                .put(update_handler)
                .patch(update_handler)
                .delete(destroy_handler),
        )
        .with_state(state)
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
