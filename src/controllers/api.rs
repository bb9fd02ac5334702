//! fetch から呼ばれる JSON API (`/api`)

use rocket::http::Status;
use rocket::serde::json::{serde_json, Json};
use rocket::State;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::csrf::CsrfValidation;
use crate::domain::calendar;
use crate::domain::ids::CodePrefix;
use crate::domain::tipos::TipoSop;
use crate::errors::AppError;
use crate::guards::auth::{AdminUser, AuthenticatedUser};
use crate::services::catalog_service::{self, NextId};
use crate::services::check_service::{self, CheckError};
use crate::services::schedule_service;
use crate::services::sop_service::{self, SubareaSop};
use crate::services::template_service;

type JsonResponse = (Status, Json<Value>);

fn check_error(e: CheckError) -> JsonResponse {
    if let CheckError::Db(ref err) = e {
        tracing::error!(error = %err, "check api failed");
    }
    let body = match &e {
        CheckError::YaMarcada { checked_at } => json!({
            "success": false,
            "error": e.message(),
            "checked_at": checked_at,
        }),
        _ => json!({ "success": false, "error": e.message() }),
    };
    (e.status(), Json(body))
}

/// operativo が自分の今日のタスクを完了にする
#[post("/tarea/<tarea_id>/check")]
pub async fn marcar(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _csrf: CsrfValidation,
    auth: AuthenticatedUser,
    tarea_id: i32,
) -> JsonResponse {
    let now = calendar::now(config.offset());
    match check_service::mark(db.inner(), &auth.user, tarea_id, now).await {
        Ok(check) => (
            Status::Ok,
            Json(json!({
                "success": true,
                "checked_at": check.checked_at.format("%H:%M").to_string(),
            })),
        ),
        Err(e) => check_error(e),
    }
}

#[delete("/tarea/<tarea_id>/check")]
pub async fn desmarcar(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _csrf: CsrfValidation,
    auth: AuthenticatedUser,
    tarea_id: i32,
) -> JsonResponse {
    let hoy = calendar::today(config.offset());
    match check_service::unmark(db.inner(), &auth.user, tarea_id, hoy).await {
        Ok(()) => (Status::Ok, Json(json!({ "success": true }))),
        Err(e) => check_error(e),
    }
}

#[get("/verificar_sop/<subarea_id>/<tipo>")]
pub async fn verificar_sop(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    subarea_id: &str,
    tipo: &str,
) -> Result<Json<Value>, AppError> {
    let tipo = TipoSop::parse(tipo).ok_or_else(|| AppError::BadRequest(format!("Tipo de SOP inválido: {}", tipo)))?;
    let sop_id = sop_service::sop_exists(db.inner(), subarea_id, tipo).await?;
    Ok(Json(json!({ "existe": sop_id.is_some(), "sop_id": sop_id })))
}

#[get("/subareas_con_sop/<area_id>")]
pub async fn subareas_con_sop(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    area_id: &str,
) -> Result<Json<Vec<SubareaSop>>, AppError> {
    Ok(Json(sop_service::subareas_con_sop(db.inner(), area_id).await?))
}

#[derive(Debug, Deserialize)]
struct OrdenItem {
    id: i32,
    orden: i32,
}

#[derive(Debug, Deserialize)]
struct OrdenPayload {
    orden: Vec<OrdenItem>,
}

/// `{"orden": [{"id": 1, "orden": 2}, ...]}` を読む。壊れていれば 400。
fn parse_orden(body: &str) -> Result<Vec<(i32, i32)>, JsonResponse> {
    match serde_json::from_str::<OrdenPayload>(body) {
        Ok(payload) => Ok(payload.orden.into_iter().map(|o| (o.id, o.orden)).collect()),
        Err(e) => {
            tracing::debug!(error = %e, "malformed reorder payload");
            Err((
                Status::BadRequest,
                Json(json!({ "success": false, "error": "Datos inválidos" })),
            ))
        }
    }
}

fn reorder_result(result: Result<u64, AppError>) -> JsonResponse {
    match result {
        Ok(actualizadas) => (Status::Ok, Json(json!({ "success": true, "actualizadas": actualizadas }))),
        Err(e) => {
            if !e.is_user_facing() {
                tracing::error!(error = %e, "reorder failed");
            }
            e.to_json()
        }
    }
}

#[post("/reordenar-tareas", data = "<body>")]
pub async fn reordenar_tareas(
    db: &State<DatabaseConnection>,
    _csrf: CsrfValidation,
    _admin: AdminUser,
    body: String,
) -> JsonResponse {
    match parse_orden(&body) {
        Ok(orden) => reorder_result(schedule_service::reorder_tasks(db.inner(), &orden).await),
        Err(resp) => resp,
    }
}

#[post("/reordenar-plantilla-items", data = "<body>")]
pub async fn reordenar_plantilla_items(
    db: &State<DatabaseConnection>,
    _csrf: CsrfValidation,
    _admin: AdminUser,
    body: String,
) -> JsonResponse {
    match parse_orden(&body) {
        Ok(orden) => reorder_result(template_service::reorder_items(db.inner(), &orden).await),
        Err(resp) => resp,
    }
}

/// 次のコード (`QU-LI-004` など)
#[get("/<catalogo>/next-id?<grupo>", rank = 2)]
pub async fn next_id(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    catalogo: &str,
    grupo: Option<&str>,
) -> Result<Json<NextId>, AppError> {
    let prefix =
        CodePrefix::parse(catalogo).ok_or_else(|| AppError::NotFound(format!("Catálogo desconocido: {}", catalogo)))?;
    Ok(Json(catalog_service::next_id(db.inner(), prefix, grupo.unwrap_or_default()).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        marcar,
        desmarcar,
        verificar_sop,
        subareas_con_sop,
        reordenar_tareas,
        reordenar_plantilla_items,
        next_id,
    ]
}
