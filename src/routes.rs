// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const OBJECT_STORE: &str = "/object-store";
pub const OBJECT_STORE_ITEM: &str = "/object-store/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
