use serde::Serialize;

/// Success envelope shared by every endpoint:
/// `{"status": "success", "data": ..., "message"?, "results"?}`.
///
/// `results` carries the item count on list responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            results: None,
            message: Some(message.into()),
            data,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            status: "success",
            results: Some(data.len()),
            message: None,
            data,
        }
    }
}
