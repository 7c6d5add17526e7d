use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateObjectRequest, Envelope};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "object-store-api",
        version = "1.0.0",
        description = "Key/value object store with server-assigned timestamps"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::show::show_handler,
        handlers::update::update_handler,
        handlers::destroy::destroy_handler
    ),
    components(
        schemas(
            CreateObjectRequest,
            Envelope,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "object-store", description = "Object store operations")
    )
)]
pub struct ApiDoc;
