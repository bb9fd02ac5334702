//! SOP の構成画面 (パネル、フラクション選択、明細編集)

use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

use crate::controllers::{csrf_expired, flash_err};
use crate::csrf::CsrfToken;
use crate::domain::nivel::Nivel;
use crate::domain::tipos::TipoSop;
use crate::errors::AppError;
use crate::guards::auth::AdminUser;
use crate::services::sop_service::{self, DetailInput, DetailMode, ElementoLinea, FraccionSeleccion};
use crate::views::app_template::AppTemplate;

fn tipo_o_regular(raw: Option<&str>) -> TipoSop {
    raw.and_then(TipoSop::parse).unwrap_or(TipoSop::Regular)
}

fn nivel_o_basica(raw: Option<&str>) -> Nivel {
    raw.and_then(Nivel::canon).unwrap_or(Nivel::Basica)
}

fn no_vacio(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn fracciones_url(subarea_id: &str, tipo: TipoSop, nivel: Nivel) -> String {
    format!("/sop/fracciones/{}?tipo_sop={}&nivel={}", subarea_id, tipo.as_str(), nivel.as_str())
}

fn detalles_url(sop_id: &str, nivel: Nivel, sop_fraccion_id: Option<&str>) -> String {
    match sop_fraccion_id {
        Some(sf) => format!("/sop/detalles/{}?nivel={}&sf={}", sop_id, nivel.as_str(), sf),
        None => format!("/sop/detalles/{}?nivel={}", sop_id, nivel.as_str()),
    }
}

#[get("/sop?<area_id>&<subarea_id>&<tipo_sop>&<nivel>")]
pub async fn panel(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    area_id: Option<&str>,
    subarea_id: Option<&str>,
    tipo_sop: Option<&str>,
    nivel: Option<&str>,
) -> Result<AppTemplate, AppError> {
    let area_id = area_id.filter(|a| !a.is_empty());
    let subarea_id = subarea_id.filter(|s| !s.is_empty());
    let panel = sop_service::panel(db.inner(), area_id, subarea_id, tipo_o_regular(tipo_sop), nivel_o_basica(nivel)).await?;
    let niveles: Vec<(&str, &str)> = Nivel::ALL.iter().map(|n| (n.as_str(), n.label())).collect();

    Ok(AppTemplate::new("sop/panel", context! { panel, niveles, active_nav: "sop" }))
}

#[get("/sop/fracciones/<subarea_id>?<tipo_sop>&<nivel>")]
pub async fn fracciones(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    subarea_id: &str,
    tipo_sop: Option<&str>,
    nivel: Option<&str>,
) -> Result<AppTemplate, AppError> {
    let editor =
        sop_service::fracciones_editor(db.inner(), subarea_id, tipo_o_regular(tipo_sop), nivel_o_basica(nivel)).await?;
    Ok(AppTemplate::new("sop/fracciones", context! { editor, active_nav: "sop" }))
}

#[derive(FromForm)]
pub struct FraccionesForm {
    #[field(default = "regular")]
    pub tipo_sop: String,
    #[field(default = "basica")]
    pub nivel: String,
    /// チェックされたフラクション
    #[field(default = Vec::new())]
    pub fracciones: Vec<String>,
    /// `orden[FR-..]=n`
    #[field(default = HashMap::new())]
    pub orden: HashMap<String, String>,
    #[field(default = "")]
    pub csrf_token: String,
}

#[post("/sop/fracciones/<subarea_id>", data = "<form>")]
pub async fn guardar_fracciones(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    subarea_id: &str,
    form: Form<FraccionesForm>,
) -> Flash<Redirect> {
    let tipo = tipo_o_regular(Some(&form.tipo_sop));
    let nivel = nivel_o_basica(Some(&form.nivel));
    let back = fracciones_url(subarea_id, tipo, nivel);
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(back);
    }

    let seleccion: Vec<FraccionSeleccion> = form
        .fracciones
        .iter()
        .map(|id| FraccionSeleccion {
            fraccion_id: id.clone(),
            orden: form.orden.get(id).and_then(|o| o.trim().parse().ok()),
        })
        .collect();

    match sop_service::save_fracciones(db.inner(), subarea_id, tipo, nivel, &seleccion).await {
        Ok(sop) => Flash::success(
            Redirect::to(detalles_url(&sop.sop_id, nivel, None)),
            format!("Fracciones guardadas en {} ({}).", sop.sop_id, nivel.label()),
        ),
        Err(e) => flash_err(back, e),
    }
}

#[get("/sop/detalles/<sop_id>?<nivel>&<sf>")]
pub async fn detalles(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    sop_id: &str,
    nivel: Option<&str>,
    sf: Option<&str>,
) -> Result<AppTemplate, AppError> {
    let editor = sop_service::detail_editor(db.inner(), sop_id, nivel_o_basica(nivel), sf).await?;
    Ok(AppTemplate::new("sop/detalles", context! { editor, active_nav: "sop" }))
}

#[derive(FromForm)]
pub struct DetalleForm {
    #[field(default = "basica")]
    pub nivel: String,
    pub tiempo_unitario_min: Option<f64>,
    /// "directo" | "elementos"
    #[field(default = "directo")]
    pub modo: String,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub consumo_id: Option<String>,
    /// 要素モードでチェックされた要素
    #[field(default = Vec::new())]
    pub elementos: Vec<String>,
    #[field(default = HashMap::new())]
    pub el_orden: HashMap<String, String>,
    #[field(default = HashMap::new())]
    pub el_kit: HashMap<String, String>,
    #[field(default = HashMap::new())]
    pub el_receta: HashMap<String, String>,
    #[field(default = HashMap::new())]
    pub el_consumo: HashMap<String, String>,
    #[field(default = "")]
    pub csrf_token: String,
}

impl DetalleForm {
    fn to_input(&self) -> DetailInput {
        let mode = if self.modo == "elementos" {
            let pick = |m: &HashMap<String, String>, id: &String| no_vacio(m.get(id).cloned());
            DetailMode::Elementos {
                lineas: self
                    .elementos
                    .iter()
                    .map(|id| ElementoLinea {
                        elemento_id: id.clone(),
                        orden: self.el_orden.get(id).and_then(|o| o.trim().parse().ok()),
                        kit_id: pick(&self.el_kit, id),
                        receta_id: pick(&self.el_receta, id),
                        consumo_id: pick(&self.el_consumo, id),
                    })
                    .collect(),
            }
        } else {
            DetailMode::Directo {
                kit_id: no_vacio(self.kit_id.clone()),
                receta_id: no_vacio(self.receta_id.clone()),
                consumo_id: no_vacio(self.consumo_id.clone()),
            }
        };
        DetailInput {
            tiempo_unitario_min: self.tiempo_unitario_min,
            mode,
        }
    }
}

#[post("/sop/detalles/<sop_id>/<sop_fraccion_id>", data = "<form>")]
pub async fn guardar_detalle(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    sop_id: &str,
    sop_fraccion_id: &str,
    form: Form<DetalleForm>,
) -> Flash<Redirect> {
    let nivel = nivel_o_basica(Some(&form.nivel));
    let back = detalles_url(sop_id, nivel, Some(sop_fraccion_id));
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(back);
    }
    match sop_service::save_detail(db.inner(), sop_id, sop_fraccion_id, nivel, form.to_input()).await {
        Ok(_) => Flash::success(Redirect::to(back), "Detalle guardado."),
        Err(e) => flash_err(back, e),
    }
}

#[derive(FromForm)]
pub struct ObservacionForm {
    pub observacion: Option<String>,
    #[field(default = "basica")]
    pub nivel: String,
    #[field(default = "")]
    pub csrf_token: String,
}

/// SOP の「observación crítica」
#[post("/sop/observacion/<sop_id>", data = "<form>")]
pub async fn guardar_observacion(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    sop_id: &str,
    form: Form<ObservacionForm>,
) -> Flash<Redirect> {
    let back = detalles_url(sop_id, nivel_o_basica(Some(&form.nivel)), None);
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(back);
    }
    let form = form.into_inner();
    match sop_service::set_observacion(db.inner(), sop_id, form.observacion).await {
        Ok(_) => Flash::success(Redirect::to(back), "Observación guardada."),
        Err(e) => flash_err(back, e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![panel, fracciones, guardar_fracciones, detalles, guardar_detalle, guardar_observacion]
}
