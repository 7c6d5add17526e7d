use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const CREATED_MESSAGE: &str = "Resource created successfully";
pub const UPDATED_MESSAGE: &str = "Resource updated successfully";
pub const DELETED_MESSAGE: &str = "Resource deleted successfully";

/// Request body for POST /object-store
///
/// Unknown fields (a caller-supplied timestamp, for instance) are ignored.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateObjectRequest {
    pub key: String,
    /// Any JSON value; stored as `null` when omitted
    #[serde(default)]
    pub value: JsonValue,
}

/// Response wrapper returned by every object-store endpoint
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<JsonValue>>,
}

impl Envelope {
    /// `{success: true, data: []}`
    pub fn empty_data() -> Self {
        Self {
            success: true,
            message: None,
            data: Some(Vec::new()),
        }
    }

    /// `{success: true, message, data: []}`
    pub fn message_with_data(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(Vec::new()),
        }
    }

    /// `{success: true, message}`
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }
}
