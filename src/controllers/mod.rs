use chrono::NaiveDate;
use rocket::response::{Flash, Redirect};

use crate::domain::calendar;
use crate::errors::AppError;

pub mod admin_users;
pub mod api;
pub mod auth;
pub mod catalogo;
pub mod catalogo_detalle;
pub mod catchers;
pub mod home;
pub mod plantillas;
pub mod reportes;
pub mod rutas;
pub mod sop;

pub const MSG_CSRF: &str = "La sesión del formulario expiró. Intenta de nuevo.";

/// 本文が CSRF トークンだけの POST (削除ボタンなど)
#[derive(FromForm)]
pub struct CsrfForm {
    #[field(default = "")]
    pub csrf_token: String,
}

/// サービス層のエラーを画面用の flash に変換する。
/// 入力起因のものは warning、それ以外はログに残して汎用文言。
pub fn flash_err(url: String, e: AppError) -> Flash<Redirect> {
    if e.is_user_facing() {
        Flash::warning(Redirect::to(url), e.to_string())
    } else {
        tracing::error!(error = %e, %url, "request failed");
        Flash::error(Redirect::to(url), "Ocurrió un error inesperado.")
    }
}

/// URL の `YYYY-MM-DD`
pub fn fecha_param(raw: &str) -> Result<NaiveDate, AppError> {
    calendar::parse_fecha(raw).ok_or_else(|| AppError::BadRequest(format!("Fecha inválida: {}", raw)))
}

/// HTML フォームの `0`/`1` フラグ (チェックボックスは `1` を送る)
pub fn form_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "on")
}

pub fn csrf_expired(url: String) -> Flash<Redirect> {
    Flash::error(Redirect::to(url), MSG_CSRF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_flag() {
        assert!(form_flag("1"));
        assert!(form_flag(" on "));
        assert!(!form_flag("0"));
        assert!(!form_flag(""));
    }
}
