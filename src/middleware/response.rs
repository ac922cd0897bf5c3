use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            message: None,
            status_code: None,
        }
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            message: None,
            status_code: Some(status_code),
        }
    }

    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    /// 201 when the record was just created, 200 otherwise
    pub fn created_if(data: T, created: bool) -> Self {
        if created {
            Self::created(data)
        } else {
            Self::success(data)
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn envelope(&self) -> Result<Value, serde_json::Error> {
        let mut envelope = json!({
            "success": true,
            "data": serde_json::to_value(&self.data)?
        });
        if let Some(message) = &self.message {
            envelope["message"] = json!(message);
        }
        Ok(envelope)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        match self.envelope() {
            Ok(envelope) => (status, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                crate::error::ApiError::internal_server_error("Failed to format response").into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_data_and_optional_message() {
        let plain = ApiResponse::success(vec![1, 2]).envelope().unwrap();
        assert_eq!(plain, json!({"success": true, "data": [1, 2]}));

        let with_message = ApiResponse::success(json!({"id": 1})).message("Enrolled").envelope().unwrap();
        assert_eq!(with_message["message"], "Enrolled");
    }

    #[test]
    fn created_if_picks_status() {
        assert_eq!(ApiResponse::created_if((), true).status_code, Some(StatusCode::CREATED));
        assert_eq!(ApiResponse::created_if((), false).status_code, None);
    }
}
