use serde::{Deserialize, Serialize};

/// Uniform JSON envelope for every handler response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}
