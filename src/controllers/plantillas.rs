//! 週テンプレート (plantillas) の画面

use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::*;

use crate::config::AppConfig;
use crate::controllers::{csrf_expired, fecha_param, flash_err, form_flag, CsrfForm};
use crate::csrf::CsrfToken;
use crate::domain::calendar;
use crate::domain::nivel::Nivel;
use crate::domain::tipos::AssignmentKind;
use crate::entities::{area, personal, prelude::*};
use crate::errors::AppError;
use crate::guards::auth::AdminUser;
use crate::services::template_service::{self, CaptureTarget, ItemRequest};
use crate::views::app_template::AppTemplate;

const PANEL_URL: &str = "/plantillas";

fn panel_url(plantilla_id: Option<i32>, lunes: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some(id) = plantilla_id {
        params.push(format!("plantilla_id={}", id));
    }
    if let Some(lunes) = lunes {
        params.push(format!("lunes={}", lunes));
    }
    if params.is_empty() {
        PANEL_URL.to_string()
    } else {
        format!("{}?{}", PANEL_URL, params.join("&"))
    }
}

fn dia_url(plantilla_id: i32, dia_index: i32) -> String {
    format!("/plantillas/{}/dia/{}", plantilla_id, dia_index)
}

/// 確認画面 or リダイレクト
#[derive(Responder)]
pub enum Paso {
    Confirmar(AppTemplate),
    Listo(Flash<Redirect>),
}

/// 破壊的な操作の確認画面。`campos` は hidden で送り直す値。
fn confirmacion(titulo: &str, mensaje: String, action: &str, campos: Vec<(&str, String)>, cancel_url: String) -> AppTemplate {
    AppTemplate::new(
        "confirmacion",
        context! { titulo, mensaje, action, campos, cancel_url, active_nav: "plantillas" },
    )
}

#[get("/plantillas?<plantilla_id>&<lunes>")]
pub async fn panel(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    plantilla_id: Option<i32>,
    lunes: Option<&str>,
) -> Result<AppTemplate, AppError> {
    let base = lunes
        .and_then(calendar::parse_fecha)
        .unwrap_or_else(|| calendar::today(config.offset()));
    let lunes = calendar::monday_of(base);

    let panel = template_service::panel(db.inner(), plantilla_id).await?;
    let plantilla_activa = template_service::active_for_week(db.inner(), lunes).await?;

    Ok(AppTemplate::new(
        "plantillas/panel",
        context! {
            panel,
            plantilla_activa,
            lunes: lunes.to_string(),
            semana_iso: calendar::iso_week(lunes),
            active_nav: "plantillas",
        },
    ))
}

#[derive(FromForm)]
pub struct NombreForm<'r> {
    #[field(default = "")]
    pub nombre: &'r str,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

#[post("/plantillas/crear", data = "<form>")]
pub async fn crear(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    csrf: CsrfToken,
    form: Form<NombreForm<'_>>,
) -> Flash<Redirect> {
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(PANEL_URL.to_string());
    }
    match template_service::create(db.inner(), form.nombre, calendar::now(config.offset())).await {
        Ok(p) => Flash::success(Redirect::to(panel_url(Some(p.plantilla_id), None)), "Plantilla creada."),
        Err(e) => flash_err(PANEL_URL.to_string(), e),
    }
}

#[post("/plantillas/<plantilla_id>/renombrar", data = "<form>")]
pub async fn renombrar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    plantilla_id: i32,
    form: Form<NombreForm<'_>>,
) -> Flash<Redirect> {
    let url = panel_url(Some(plantilla_id), None);
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(url);
    }
    match template_service::rename(db.inner(), plantilla_id, form.nombre).await {
        Ok(_) => Flash::success(Redirect::to(url), "Plantilla renombrada."),
        Err(e) => flash_err(url, e),
    }
}

#[post("/plantillas/<plantilla_id>/borrar", data = "<form>")]
pub async fn borrar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    plantilla_id: i32,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(PANEL_URL.to_string());
    }
    match template_service::delete(db.inner(), plantilla_id).await {
        Ok(p) => Flash::success(Redirect::to(PANEL_URL), format!("Plantilla \"{}\" eliminada.", p.nombre)),
        Err(e) => flash_err(PANEL_URL.to_string(), e),
    }
}

#[derive(FromForm)]
pub struct GuardarSemanaForm<'r> {
    pub lunes: &'r str,
    /// "nueva" | "sobrescribir"
    #[field(default = "nueva")]
    pub modo: &'r str,
    #[field(default = "")]
    pub nombre: &'r str,
    pub plantilla_id: Option<i32>,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

/// 週の割り当てをテンプレートとして保存する
#[post("/plantillas/guardar_semana", data = "<form>")]
pub async fn guardar_semana(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    csrf: CsrfToken,
    form: Form<GuardarSemanaForm<'_>>,
) -> Flash<Redirect> {
    let back = panel_url(None, Some(form.lunes));
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(back);
    }

    let target = match (form.modo, form.plantilla_id) {
        ("sobrescribir", Some(id)) => CaptureTarget::Sobrescribir(id),
        ("sobrescribir", None) => {
            return Flash::warning(Redirect::to(back), "Selecciona la plantilla a sobrescribir.");
        }
        _ => CaptureTarget::Nueva(form.nombre.to_string()),
    };

    let result = match fecha_param(form.lunes) {
        Ok(lunes) => template_service::capture_week(db.inner(), lunes, target, calendar::now(config.offset())).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(p) => Flash::success(
            Redirect::to(panel_url(Some(p.plantilla_id), Some(form.lunes))),
            format!("Semana guardada en la plantilla \"{}\".", p.nombre),
        ),
        Err(e) => flash_err(back, e),
    }
}

#[derive(FromForm)]
pub struct AplicarForm<'r> {
    pub plantilla_id: i32,
    pub lunes: &'r str,
    #[field(default = false)]
    pub confirmar: bool,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

/// テンプレート適用。1 回目は確認画面、`confirmar` 付きの 2 回目で実行。
#[post("/plantillas/aplicar", data = "<form>")]
pub async fn aplicar(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    csrf: CsrfToken,
    form: Form<AplicarForm<'_>>,
) -> Paso {
    let back = panel_url(Some(form.plantilla_id), Some(form.lunes));
    if !csrf.verify(form.csrf_token) {
        return Paso::Listo(csrf_expired(back));
    }
    let lunes = match fecha_param(form.lunes) {
        Ok(f) => calendar::monday_of(f),
        Err(e) => return Paso::Listo(flash_err(back, e)),
    };
    let plantilla = match template_service::find(db.inner(), form.plantilla_id).await {
        Ok(p) => p,
        Err(e) => return Paso::Listo(flash_err(PANEL_URL.to_string(), e)),
    };

    if !form.confirmar {
        return Paso::Confirmar(confirmacion(
            "Aplicar plantilla",
            format!(
                "Se borrarán TODAS las tareas de la semana del {} (semana {}) y se reemplazarán con la plantilla \"{}\".",
                lunes,
                calendar::iso_week(lunes),
                plantilla.nombre
            ),
            "/plantillas/aplicar",
            vec![
                ("plantilla_id", plantilla.plantilla_id.to_string()),
                ("lunes", lunes.to_string()),
            ],
            back,
        ));
    }

    match template_service::apply_template(db.inner(), plantilla.plantilla_id, lunes, calendar::now(config.offset())).await {
        Ok(outcome) => {
            let mut msg = format!("Plantilla aplicada: {} tareas creadas.", outcome.creadas);
            if outcome.omitidas > 0 {
                msg.push_str(&format!(" {} omitidas.", outcome.omitidas));
            }
            Paso::Listo(Flash::success(Redirect::to(format!("/admin?fecha={}", lunes)), msg))
        }
        Err(e) => Paso::Listo(flash_err(back, e)),
    }
}

#[derive(FromForm)]
pub struct VaciarForm<'r> {
    pub lunes: &'r str,
    #[field(default = false)]
    pub confirmar: bool,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

/// 週を空にする (確認あり)。アクティブテンプレートも外れる。
#[post("/plantillas/vaciar_semana", data = "<form>")]
pub async fn vaciar_semana(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    csrf: CsrfToken,
    form: Form<VaciarForm<'_>>,
) -> Paso {
    let back = format!("/admin?fecha={}", form.lunes);
    if !csrf.verify(form.csrf_token) {
        return Paso::Listo(csrf_expired(back));
    }
    let lunes = match fecha_param(form.lunes) {
        Ok(f) => calendar::monday_of(f),
        Err(e) => return Paso::Listo(flash_err(back, e)),
    };

    if !form.confirmar {
        return Paso::Confirmar(confirmacion(
            "Vaciar semana",
            format!(
                "Se borrarán TODAS las tareas de la semana del {} (semana {}).",
                lunes,
                calendar::iso_week(lunes)
            ),
            "/plantillas/vaciar_semana",
            vec![("lunes", lunes.to_string())],
            back,
        ));
    }

    match template_service::empty_week(db.inner(), lunes, calendar::now(config.offset())).await {
        Ok(borradas) => Paso::Listo(Flash::success(
            Redirect::to(back),
            format!("Semana vaciada: {} tareas eliminadas.", borradas),
        )),
        Err(e) => Paso::Listo(flash_err(back, e)),
    }
}

/// テンプレートの 1 日を編集する画面
#[get("/plantillas/<plantilla_id>/dia/<dia_index>")]
pub async fn dia(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    plantilla_id: i32,
    dia_index: i32,
) -> Result<AppTemplate, AppError> {
    let editor = template_service::day_editor(db.inner(), plantilla_id, dia_index).await?;
    let personal = Personal::find()
        .order_by_asc(personal::Column::Nombre)
        .all(db.inner())
        .await?;
    let areas = Area::find()
        .order_by_asc(area::Column::OrdenArea)
        .all(db.inner())
        .await?;
    let niveles: Vec<(&str, &str)> = Nivel::ALL.iter().map(|n| (n.as_str(), n.label())).collect();

    Ok(AppTemplate::new(
        "plantillas/dia",
        context! { editor, personal, areas, niveles, active_nav: "plantillas" },
    ))
}

#[derive(FromForm)]
pub struct ItemForm<'r> {
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

#[post("/plantillas/<plantilla_id>/dia/<dia_index>/agregar", data = "<form>")]
pub async fn agregar_item(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    plantilla_id: i32,
    dia_index: i32,
    form: Form<ItemForm<'_>>,
) -> Flash<Redirect> {
    let url = dia_url(plantilla_id, dia_index);
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(url);
    }
    let req = ItemRequest {
        dia_index,
        personal_id: form.personal_id.trim().to_string(),
        subarea_id: form.subarea_id.trim().to_string(),
        nivel: Nivel::canon(form.nivel),
        kind: AssignmentKind::parse(form.tipo),
        es_adicional: form_flag(form.es_adicional),
    };
    match template_service::add_item(db.inner(), plantilla_id, req).await {
        Ok(_) => Flash::success(Redirect::to(url), "Tarea agregada a la plantilla."),
        Err(e) => flash_err(url, e),
    }
}

#[post("/plantillas/item/<item_id>/borrar", data = "<form>")]
pub async fn borrar_item(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    item_id: i32,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(PANEL_URL.to_string());
    }
    match template_service::delete_item(db.inner(), item_id).await {
        Ok(item) => Flash::success(Redirect::to(dia_url(item.plantilla_id, item.dia_index)), "Tarea eliminada de la plantilla."),
        Err(e) => flash_err(PANEL_URL.to_string(), e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        panel,
        crear,
        renombrar,
        borrar,
        guardar_semana,
        aplicar,
        vaciar_semana,
        dia,
        agregar_item,
        borrar_item,
    ]
}
