use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::{serde_json, Json};
use rocket::Request;
use sea_orm::DbErr;
use std::io::Cursor;

/// アプリケーション全体で使用するエラー型。
/// Djangoの例外クラス (PermissionDenied, Http404 等) に相当します。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// データベースエラー
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 認証エラー (401 Unauthorized)
    #[error("Unauthorized")]
    Unauthorized,
    /// 権限エラー (403 Forbidden)
    #[error("Forbidden")]
    Forbidden,
    /// リソースが見つからない (404 Not Found)
    #[error("{0}")]
    NotFound(String),
    /// 不正なリクエスト (400 Bad Request)
    #[error("{0}")]
    BadRequest(String),
    /// 業務ルール違反 (重複割り当てなど)。HTML 側では警告 flash にする
    #[error("{0}")]
    Conflict(String),
    /// 内部エラー (500 Internal Server Error)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::Unauthorized => Status::Unauthorized,
            AppError::Forbidden => Status::Forbidden,
            AppError::NotFound(_) => Status::NotFound,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::Conflict(_) => Status::Conflict,
            AppError::Database(_) | AppError::Internal(_) => Status::InternalServerError,
        }
    }

    /// 利用者に見せてよいメッセージ (DB エラーの詳細は隠す)
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Error de base de datos".to_string(),
            other => other.to_string(),
        }
    }

    /// フォーム起因のエラー (flash で返せるもの) か
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::BadRequest(_) | AppError::Conflict(_) | AppError::NotFound(_)
        )
    }

    /// AJAX 用の `{"success": false, "error": ...}` 応答
    pub fn to_json(&self) -> (Status, Json<serde_json::Value>) {
        (
            self.status(),
            Json(serde_json::json!({
                "success": false,
                "error": self.public_message(),
            })),
        )
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        if let AppError::Database(e) = &self {
            tracing::error!(error = %e, "database error");
        }
        let status = self.status();
        let message = self.public_message();

        Response::build()
            .status(status)
            .sized_body(message.len(), Cursor::new(message))
            .ok()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), Status::NotFound);
        assert_eq!(AppError::Conflict("x".into()).status(), Status::Conflict);
        assert_eq!(
            AppError::Database(DbErr::Custom("boom".into())).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = AppError::Database(DbErr::Custom("secret table".into()));
        assert!(!err.public_message().contains("secret"));
        assert_eq!(AppError::BadRequest("Datos inválidos".into()).public_message(), "Datos inválidos");
    }
}
