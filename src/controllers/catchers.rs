//! エラーページ (Django の `handler404` / `handler500` に相当)

use rocket::http::Status;
use rocket::response::Redirect;
use rocket::serde::json::{serde_json, Json};
use rocket::Request;
use rocket_dyn_templates::context;

use crate::views::app_template::AppTemplate;

#[derive(Responder)]
pub enum ErrorPage {
    Html(AppTemplate),
    Json((Status, Json<serde_json::Value>)),
    Login(Redirect),
}

fn is_api(req: &Request<'_>) -> bool {
    req.uri().path().starts_with("/api")
}

fn page(req: &Request<'_>, status: Status, mensaje: &str) -> ErrorPage {
    if is_api(req) {
        return ErrorPage::Json((status, Json(serde_json::json!({ "success": false, "error": mensaje }))));
    }
    ErrorPage::Html(AppTemplate::new(
        "errors",
        context! { code: status.code, mensaje },
    ))
}

/// 未ログインはログイン画面へ
#[catch(401)]
pub fn unauthorized(req: &Request<'_>) -> ErrorPage {
    if is_api(req) {
        return page(req, Status::Unauthorized, "No autenticado");
    }
    ErrorPage::Login(Redirect::to("/login"))
}

#[catch(403)]
pub fn forbidden(req: &Request<'_>) -> ErrorPage {
    page(req, Status::Forbidden, "No tienes permiso para ver esta página.")
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> ErrorPage {
    page(req, Status::NotFound, "Página no encontrada.")
}

#[catch(422)]
pub fn unprocessable(req: &Request<'_>) -> ErrorPage {
    page(req, Status::UnprocessableEntity, "Los datos enviados no son válidos.")
}

#[catch(500)]
pub fn internal_error(req: &Request<'_>) -> ErrorPage {
    tracing::error!(path = %req.uri().path(), "internal server error");
    page(req, Status::InternalServerError, "Ocurrió un error inesperado.")
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![unauthorized, forbidden, not_found, unprocessable, internal_error]
}
