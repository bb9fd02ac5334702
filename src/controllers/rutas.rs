//! 日次プラン (割り当て) とルート画面

use rocket::form::Form;
use rocket::http::Status;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::{serde_json, Json};
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::*;
use serde::Serialize;

use crate::config::AppConfig;
use crate::controllers::{csrf_expired, fecha_param, flash_err, form_flag, CsrfForm};
use crate::csrf::CsrfToken;
use crate::domain::calendar;
use crate::domain::nivel::Nivel;
use crate::domain::tipos::AssignmentKind;
use crate::entities::{area, personal, prelude::*, sop_evento};
use crate::errors::AppError;
use crate::guards::ajax::Ajax;
use crate::guards::auth::{AdminUser, OperativoUser};
use crate::services::report_service;
use crate::services::schedule_service::{self, AssignmentRequest, SubareaOpcion};
use crate::views::app_template::AppTemplate;

fn plan_url(fecha: &str) -> String {
    format!("/plan/{}", fecha)
}

/// 画面の選択肢 (レベル)
#[derive(Serialize)]
struct NivelOpcion {
    value: &'static str,
    label: &'static str,
}

fn niveles() -> Vec<NivelOpcion> {
    Nivel::ALL
        .iter()
        .map(|n| NivelOpcion { value: n.as_str(), label: n.label() })
        .collect()
}

#[get("/plan")]
pub fn plan_hoy(config: &State<AppConfig>, _admin: AdminUser) -> Redirect {
    Redirect::to(plan_url(&calendar::today(config.offset()).to_string()))
}

/// 日次プラン: 人ごとのタスクと割り当てフォーム
#[get("/plan/<fecha>")]
pub async fn plan_dia(db: &State<DatabaseConnection>, _admin: AdminUser, fecha: &str) -> Result<AppTemplate, AppError> {
    let fecha = fecha_param(fecha)?;
    let plan = schedule_service::day_plan(db.inner(), fecha).await?;
    let personal = Personal::find()
        .order_by_asc(personal::Column::Nombre)
        .all(db.inner())
        .await?;
    let areas = Area::find()
        .order_by_asc(area::Column::OrdenArea)
        .all(db.inner())
        .await?;
    let eventos = SopEvento::find()
        .order_by_asc(sop_evento::Column::Nombre)
        .all(db.inner())
        .await?;

    Ok(AppTemplate::new(
        "rutas/plan_dia",
        context! {
            plan,
            personal,
            areas,
            eventos,
            niveles: niveles(),
            fecha: fecha.to_string(),
            dia_anterior: (fecha - chrono::Duration::days(1)).to_string(),
            dia_siguiente: (fecha + chrono::Duration::days(1)).to_string(),
            lunes: calendar::monday_of(fecha).to_string(),
            active_nav: "plan",
        },
    ))
}

#[derive(FromForm)]
pub struct AsignarForm<'r> {
    pub personal_id: &'r str,
    pub subarea_id: &'r str,
    #[field(name = "nivel_limpieza_asignado", default = "")]
    pub nivel: &'r str,
    /// regular | extraordinario | consecuente
    #[field(name = "tipo_sop")]
    pub tipo: Option<&'r str>,
    /// `0` | `1`
    #[field(default = "0")]
    pub es_adicional: &'r str,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

impl AsignarForm<'_> {
    pub fn to_request(&self) -> AssignmentRequest {
        AssignmentRequest {
            personal_id: self.personal_id.trim().to_string(),
            subarea_id: self.subarea_id.trim().to_string(),
            nivel: Nivel::canon(self.nivel),
            kind: AssignmentKind::parse(self.tipo),
            es_adicional: form_flag(self.es_adicional),
        }
    }
}

#[post("/plan/<fecha>/asignar", data = "<form>")]
pub async fn asignar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    fecha: &str,
    form: Form<AsignarForm<'_>>,
) -> Flash<Redirect> {
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(plan_url(fecha));
    }
    let result = match fecha_param(fecha) {
        Ok(dia) => schedule_service::assign_task(db.inner(), dia, form.to_request()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Flash::success(Redirect::to(plan_url(fecha)), "Tarea asignada."),
        Err(e) => flash_err(plan_url(fecha), e),
    }
}

#[derive(FromForm)]
pub struct EventoForm<'r> {
    pub personal_id: &'r str,
    pub sop_evento_id: &'r str,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

#[post("/plan/<fecha>/evento", data = "<form>")]
pub async fn asignar_evento(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    fecha: &str,
    form: Form<EventoForm<'_>>,
) -> Flash<Redirect> {
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(plan_url(fecha));
    }
    let result = match fecha_param(fecha) {
        Ok(dia) => schedule_service::assign_event(db.inner(), dia, form.personal_id.trim(), form.sop_evento_id.trim()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Flash::success(Redirect::to(plan_url(fecha)), "Evento asignado."),
        Err(e) => flash_err(plan_url(fecha), e),
    }
}

/// HTML フォームからも fetch からも呼ばれる応答
#[derive(Responder)]
pub enum Respuesta {
    Json((Status, Json<serde_json::Value>)),
    Redirect(Flash<Redirect>),
}

/// タスク削除。`X-Requested-With: XMLHttpRequest` なら JSON で返す。
#[post("/plan/<fecha>/borrar/<tarea_id>", data = "<form>")]
pub async fn borrar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    ajax: Ajax,
    fecha: &str,
    tarea_id: i32,
    form: Form<CsrfForm>,
) -> Respuesta {
    if !csrf.verify(&form.csrf_token) {
        return if ajax.0 {
            Respuesta::Json(AppError::Forbidden.to_json())
        } else {
            Respuesta::Redirect(csrf_expired(plan_url(fecha)))
        };
    }

    match (schedule_service::delete_task(db.inner(), tarea_id).await, ajax.0) {
        (Ok(_), true) => Respuesta::Json((Status::Ok, Json(serde_json::json!({ "success": true })))),
        (Ok(_), false) => Respuesta::Redirect(Flash::success(Redirect::to(plan_url(fecha)), "Tarea eliminada.")),
        (Err(e), true) => {
            if !e.is_user_facing() {
                tracing::error!(error = %e, tarea_id, "task deletion failed");
            }
            Respuesta::Json(e.to_json())
        }
        (Err(e), false) => Respuesta::Redirect(flash_err(plan_url(fecha), e)),
    }
}

/// その日のルート (タスクがある人の一覧とレポートへのリンク)
#[get("/plan/<fecha>/ruta")]
pub async fn ruta_dia(db: &State<DatabaseConnection>, _admin: AdminUser, fecha: &str) -> Result<AppTemplate, AppError> {
    let fecha = fecha_param(fecha)?;
    let personas = schedule_service::day_route(db.inner(), fecha).await?;
    Ok(AppTemplate::new(
        "rutas/ruta_dia",
        context! {
            fecha: fecha.to_string(),
            dia_nombre: calendar::nombre_dia(fecha),
            personas,
            active_nav: "plan",
        },
    ))
}

/// operativo: 今日の自分のタスク
#[get("/mi_ruta")]
pub async fn mi_ruta(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    op: OperativoUser,
) -> Result<AppTemplate, AppError> {
    let hoy = calendar::today(config.offset());
    let ruta = report_service::my_route(db.inner(), &op.personal_id, hoy).await?;
    let persona = Personal::find_by_id(op.personal_id.clone()).one(db.inner()).await?;
    Ok(AppTemplate::new(
        "rutas/mi_ruta",
        context! {
            ruta,
            persona,
            personal_id: op.personal_id,
            fecha: hoy.to_string(),
            active_nav: "mi_ruta",
        },
    ))
}

/// エリアのサブエリアと、その日に埋まっているか
#[get("/subareas_por_area/<area_id>?<fecha>")]
pub async fn subareas_por_area(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    area_id: &str,
    fecha: &str,
) -> Result<Json<Vec<SubareaOpcion>>, AppError> {
    let fecha = fecha_param(fecha)?;
    Ok(Json(schedule_service::subareas_for_day(db.inner(), area_id, fecha).await?))
}

#[get("/subareas_por_area_simple/<area_id>")]
pub async fn subareas_por_area_simple(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    area_id: &str,
) -> Result<Json<Vec<SubareaOpcion>>, AppError> {
    Ok(Json(schedule_service::subareas_simple(db.inner(), area_id).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        plan_hoy,
        plan_dia,
        asignar,
        asignar_evento,
        borrar,
        ruta_dia,
        mi_ruta,
        subareas_por_area,
        subareas_por_area_simple,
    ]
}
