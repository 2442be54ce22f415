use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::JuryError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 由领域错误构造响应体
    pub fn from_error(err: &JuryError) -> Self {
        Self::error_empty(error_code_of(err), err.message())
    }
}

/// 领域错误对应的业务错误码
pub fn error_code_of(err: &JuryError) -> ErrorCode {
    match err {
        JuryError::Validation(_) => ErrorCode::BadRequest,
        JuryError::Authentication(_) => ErrorCode::Unauthorized,
        JuryError::Permission(_) => ErrorCode::Forbidden,
        JuryError::NotFound(_) => ErrorCode::NotFound,
        JuryError::Conflict(_) => ErrorCode::Conflict,
        _ => ErrorCode::InternalServerError,
    }
}

/// 领域错误对应的 HTTP 状态码
pub fn status_code_of(err: &JuryError) -> StatusCode {
    match err {
        JuryError::Validation(_) => StatusCode::BAD_REQUEST,
        JuryError::Authentication(_) => StatusCode::UNAUTHORIZED,
        JuryError::Permission(_) => StatusCode::FORBIDDEN,
        JuryError::NotFound(_) => StatusCode::NOT_FOUND,
        JuryError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err = JuryError::conflict("已提交");
        assert_eq!(status_code_of(&err), StatusCode::CONFLICT);
        assert_eq!(error_code_of(&err), ErrorCode::Conflict);

        let err = JuryError::storage("写入失败");
        assert_eq!(status_code_of(&err), StatusCode::INTERNAL_SERVER_ERROR);

        let body = ApiResponse::from_error(&JuryError::validation("分数越界"));
        assert_eq!(body.code, ErrorCode::BadRequest as i32);
        assert!(body.data.is_none());
    }
}
