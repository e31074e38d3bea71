use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the success envelope.
///
/// Every endpoint speaks `{success, data?, error?}`; this type covers the
/// success half, `ApiError` the failure half.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with a data payload
    pub fn success(data: T) -> Self {
        Self { data: Some(data), status: StatusCode::OK }
    }

    /// 201 Created with the stored resource
    pub fn created(data: T) -> Self {
        Self { data: Some(data), status: StatusCode::CREATED }
    }
}

impl ApiResponse<()> {
    /// 200 OK with a bare `{success: true}` body (delete responses)
    pub fn empty() -> Self {
        Self { data: None, status: StatusCode::OK }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match self.data {
            None => json!({ "success": true }),
            Some(data) => match serde_json::to_value(&data) {
                Ok(value) => json!({ "success": true, "data": value }),
                Err(e) => {
                    tracing::error!("failed to serialize response data: {}", e);
                    return crate::error::ApiError::Internal.into_response();
                }
            },
        };

        (self.status, Json(body)).into_response()
    }
}

/// Handler result type: success envelope or taxonomy error
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_has_no_data_key() {
        let response = ApiResponse::empty().into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn created_sets_201() {
        let response = ApiResponse::created(json!({"id": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
