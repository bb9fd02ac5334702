//! カタログの子テーブル画面 (キットの道具、レシピの薬剤、メソドロジーの手順、イベント明細)。
//! Django admin の Inline に相当します。

use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::{Route, State};
use rocket_dyn_templates::context;
use sea_orm::*;

use crate::controllers::{csrf_expired, flash_err, CsrfForm};
use crate::csrf::CsrfToken;
use crate::domain::nivel::Nivel;
use crate::entities::{consumo, herramienta, kit, metodologia_base, prelude::*, quimico, receta};
use crate::errors::AppError;
use crate::guards::auth::AdminUser;
use crate::services::catalog_service::{self, EventoDetalleInput, RecetaLinea};
use crate::views::app_template::AppTemplate;

// ---------------------------------------------------------------------------
// キット ⇔ 道具
// ---------------------------------------------------------------------------

#[derive(FromForm)]
pub struct KitLineaForm {
    pub herramienta_id: String,
    pub nota: Option<String>,
    #[field(default = "")]
    pub csrf_token: String,
}

fn kit_url(kit_id: &str) -> String {
    format!("/admin/kits/lineas/{}", kit_id)
}

#[get("/kits/lineas/<kit_id>")]
pub async fn kit_lineas(db: &State<DatabaseConnection>, _admin: AdminUser, kit_id: &str) -> Result<AppTemplate, AppError> {
    let kit = Kit::find_by_id(kit_id.to_string())
        .one(db.inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Kit no encontrado".into()))?;
    let lineas = catalog_service::kit_lineas(db.inner(), kit_id).await?;
    let herramientas = Herramienta::find()
        .order_by_asc(herramienta::Column::HerramientaId)
        .all(db.inner())
        .await?;

    Ok(AppTemplate::new(
        "admin/kit_lineas",
        context! { kit, lineas, herramientas, active_nav: "kits" },
    ))
}

#[post("/kits/lineas/<kit_id>/agregar", data = "<form>")]
pub async fn kit_agregar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    kit_id: &str,
    form: Form<KitLineaForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(kit_url(kit_id));
    }
    let form = form.into_inner();
    match catalog_service::add_kit_herramienta(db.inner(), kit_id, form.herramienta_id.trim(), form.nota).await {
        Ok(_) => Flash::success(Redirect::to(kit_url(kit_id)), "Herramienta agregada al kit."),
        Err(e) => flash_err(kit_url(kit_id), e),
    }
}

#[post("/kits/lineas/<kit_id>/quitar/<herramienta_id>", data = "<form>")]
pub async fn kit_quitar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    kit_id: &str,
    herramienta_id: &str,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(kit_url(kit_id));
    }
    match catalog_service::remove_kit_herramienta(db.inner(), kit_id, herramienta_id).await {
        Ok(()) => Flash::success(Redirect::to(kit_url(kit_id)), "Herramienta quitada."),
        Err(e) => flash_err(kit_url(kit_id), e),
    }
}

// ---------------------------------------------------------------------------
// レシピ ⇔ 薬剤
// ---------------------------------------------------------------------------

#[derive(FromForm)]
pub struct RecetaLineaForm {
    pub quimico_id: String,
    pub dosis: Option<f64>,
    pub unidad_dosis: Option<String>,
    pub volumen_base: Option<f64>,
    pub unidad_volumen: Option<String>,
    pub nota: Option<String>,
    #[field(default = "")]
    pub csrf_token: String,
}

fn receta_url(receta_id: &str) -> String {
    format!("/admin/recetas/lineas/{}", receta_id)
}

#[get("/recetas/lineas/<receta_id>")]
pub async fn receta_lineas(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    receta_id: &str,
) -> Result<AppTemplate, AppError> {
    let receta = Receta::find_by_id(receta_id.to_string())
        .one(db.inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Receta no encontrada".into()))?;
    let lineas = catalog_service::receta_lineas(db.inner(), receta_id).await?;
    let quimicos = Quimico::find()
        .order_by_asc(quimico::Column::QuimicoId)
        .all(db.inner())
        .await?;

    Ok(AppTemplate::new(
        "admin/receta_lineas",
        context! { receta, lineas, quimicos, active_nav: "recetas" },
    ))
}

#[post("/recetas/lineas/<receta_id>/guardar", data = "<form>")]
pub async fn receta_guardar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    receta_id: &str,
    form: Form<RecetaLineaForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(receta_url(receta_id));
    }
    let form = form.into_inner();
    let linea = RecetaLinea {
        quimico_id: form.quimico_id.trim().to_string(),
        dosis: form.dosis,
        unidad_dosis: form.unidad_dosis,
        volumen_base: form.volumen_base,
        unidad_volumen: form.unidad_volumen,
        nota: form.nota,
    };
    match catalog_service::upsert_receta_quimico(db.inner(), receta_id, linea).await {
        Ok(_) => Flash::success(Redirect::to(receta_url(receta_id)), "Químico guardado en la receta."),
        Err(e) => flash_err(receta_url(receta_id), e),
    }
}

#[post("/recetas/lineas/<receta_id>/quitar/<quimico_id>", data = "<form>")]
pub async fn receta_quitar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    receta_id: &str,
    quimico_id: &str,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(receta_url(receta_id));
    }
    match catalog_service::remove_receta_quimico(db.inner(), receta_id, quimico_id).await {
        Ok(()) => Flash::success(Redirect::to(receta_url(receta_id)), "Químico quitado."),
        Err(e) => flash_err(receta_url(receta_id), e),
    }
}

// ---------------------------------------------------------------------------
// フラクション ⇔ メソドロジー (レベル別)
// ---------------------------------------------------------------------------

#[derive(FromForm)]
pub struct MetodologiaForm {
    pub nivel: String,
    /// 1 行 1 手順
    #[field(default = "")]
    pub pasos: String,
    #[field(default = "")]
    pub csrf_token: String,
}

#[derive(FromForm)]
pub struct AsignarMetodologiaForm {
    pub nivel: String,
    pub metodologia_base_id: String,
    #[field(default = "")]
    pub csrf_token: String,
}

fn fraccion_url(fraccion_id: &str) -> String {
    format!("/admin/fracciones/metodologias/{}", fraccion_id)
}

fn parse_nivel(raw: &str) -> Result<Nivel, AppError> {
    Nivel::canon(raw).ok_or_else(|| AppError::BadRequest("Nivel de limpieza inválido.".into()))
}

#[get("/fracciones/metodologias/<fraccion_id>")]
pub async fn fraccion_metodologias(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    fraccion_id: &str,
) -> Result<AppTemplate, AppError> {
    let fraccion = Fraccion::find_by_id(fraccion_id.to_string())
        .one(db.inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Fracción no encontrada".into()))?;
    let niveles = catalog_service::metodologias_de(db.inner(), fraccion_id).await?;
    let bases = MetodologiaBase::find()
        .order_by_asc(metodologia_base::Column::MetodologiaBaseId)
        .all(db.inner())
        .await?;

    Ok(AppTemplate::new(
        "admin/fraccion_metodologias",
        context! { fraccion, niveles, bases, active_nav: "fracciones" },
    ))
}

#[post("/fracciones/metodologias/<fraccion_id>/guardar", data = "<form>")]
pub async fn metodologia_guardar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    fraccion_id: &str,
    form: Form<MetodologiaForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(fraccion_url(fraccion_id));
    }
    let nivel = match parse_nivel(&form.nivel) {
        Ok(n) => n,
        Err(e) => return flash_err(fraccion_url(fraccion_id), e),
    };
    let pasos: Vec<String> = form
        .pasos
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    match catalog_service::save_metodologia(db.inner(), fraccion_id, nivel, &pasos).await {
        Ok(base_id) => Flash::success(
            Redirect::to(fraccion_url(fraccion_id)),
            format!("Metodología {} guardada ({} pasos).", base_id, pasos.len()),
        ),
        Err(e) => flash_err(fraccion_url(fraccion_id), e),
    }
}

#[post("/fracciones/metodologias/<fraccion_id>/asignar", data = "<form>")]
pub async fn metodologia_asignar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    fraccion_id: &str,
    form: Form<AsignarMetodologiaForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(fraccion_url(fraccion_id));
    }
    let result = match parse_nivel(&form.nivel) {
        Ok(nivel) => {
            catalog_service::assign_metodologia(db.inner(), fraccion_id, nivel, form.metodologia_base_id.trim())
                .await
                .map(|_| ())
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Flash::success(Redirect::to(fraccion_url(fraccion_id)), "Metodología asignada."),
        Err(e) => flash_err(fraccion_url(fraccion_id), e),
    }
}

#[post("/fracciones/metodologias/<fraccion_id>/quitar/<nivel>", data = "<form>")]
pub async fn metodologia_quitar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    fraccion_id: &str,
    nivel: &str,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(fraccion_url(fraccion_id));
    }
    let result = match parse_nivel(nivel) {
        Ok(nivel) => catalog_service::unassign_metodologia(db.inner(), fraccion_id, nivel).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Flash::success(Redirect::to(fraccion_url(fraccion_id)), "Metodología desvinculada."),
        Err(e) => flash_err(fraccion_url(fraccion_id), e),
    }
}

// ---------------------------------------------------------------------------
// メソドロジーの手順
// ---------------------------------------------------------------------------

#[derive(FromForm)]
pub struct PasoForm {
    pub instruccion: String,
    #[field(default = "")]
    pub csrf_token: String,
}

fn pasos_url(base_id: &str) -> String {
    format!("/admin/metodologias/pasos/{}", base_id)
}

#[get("/metodologias/pasos/<base_id>")]
pub async fn metodologia_pasos(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    base_id: &str,
) -> Result<AppTemplate, AppError> {
    let base = MetodologiaBase::find_by_id(base_id.to_string())
        .one(db.inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Metodología no encontrada".into()))?;
    let pasos = catalog_service::pasos_de(db.inner(), base_id).await?;

    Ok(AppTemplate::new(
        "admin/metodologia_pasos",
        context! { base, pasos, active_nav: "metodologias" },
    ))
}

#[post("/metodologias/pasos/<base_id>/agregar", data = "<form>")]
pub async fn paso_agregar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    base_id: &str,
    form: Form<PasoForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(pasos_url(base_id));
    }
    match catalog_service::add_paso(db.inner(), base_id, &form.instruccion).await {
        Ok(paso) => Flash::success(Redirect::to(pasos_url(base_id)), format!("Paso {} agregado.", paso.orden)),
        Err(e) => flash_err(pasos_url(base_id), e),
    }
}

#[post("/metodologias/pasos/<base_id>/borrar/<orden>", data = "<form>")]
pub async fn paso_borrar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    base_id: &str,
    orden: i32,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(pasos_url(base_id));
    }
    match catalog_service::delete_paso(db.inner(), base_id, orden).await {
        Ok(()) => Flash::success(Redirect::to(pasos_url(base_id)), "Paso eliminado."),
        Err(e) => flash_err(pasos_url(base_id), e),
    }
}

// ---------------------------------------------------------------------------
// イベント SOP の明細
// ---------------------------------------------------------------------------

#[derive(FromForm)]
pub struct EventoDetalleForm {
    pub descripcion: String,
    pub orden: Option<i32>,
    #[field(default = 0.0)]
    pub tiempo_estimado: f64,
    pub kit_id: Option<String>,
    pub receta_id: Option<String>,
    pub consumo_id: Option<String>,
    #[field(default = "")]
    pub csrf_token: String,
}

fn evento_url(sop_evento_id: &str) -> String {
    format!("/admin/eventos/detalles/{}", sop_evento_id)
}

#[get("/eventos/detalles/<sop_evento_id>")]
pub async fn evento_detalles(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    sop_evento_id: &str,
) -> Result<AppTemplate, AppError> {
    let vista = catalog_service::evento_vista(db.inner(), sop_evento_id).await?;
    let kits = Kit::find().order_by_asc(kit::Column::KitId).all(db.inner()).await?;
    let recetas = Receta::find().order_by_asc(receta::Column::RecetaId).all(db.inner()).await?;
    let consumos = Consumo::find().order_by_asc(consumo::Column::ConsumoId).all(db.inner()).await?;

    Ok(AppTemplate::new(
        "admin/evento_detalles",
        context! { vista, kits, recetas, consumos, active_nav: "eventos" },
    ))
}

#[post("/eventos/detalles/<sop_evento_id>/agregar", data = "<form>")]
pub async fn evento_agregar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    sop_evento_id: &str,
    form: Form<EventoDetalleForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(evento_url(sop_evento_id));
    }
    let form = form.into_inner();
    let input = EventoDetalleInput {
        descripcion: form.descripcion,
        orden: form.orden,
        tiempo_estimado: form.tiempo_estimado,
        kit_id: form.kit_id,
        receta_id: form.receta_id,
        consumo_id: form.consumo_id,
    };
    match catalog_service::add_evento_detalle(db.inner(), sop_evento_id, input).await {
        Ok(d) => Flash::success(Redirect::to(evento_url(sop_evento_id)), format!("Detalle {} agregado.", d.detalle_id)),
        Err(e) => flash_err(evento_url(sop_evento_id), e),
    }
}

#[post("/eventos/detalles/<sop_evento_id>/borrar/<detalle_id>", data = "<form>")]
pub async fn evento_borrar(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    sop_evento_id: &str,
    detalle_id: &str,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(evento_url(sop_evento_id));
    }
    match catalog_service::delete_evento_detalle(db.inner(), sop_evento_id, detalle_id).await {
        Ok(()) => Flash::success(Redirect::to(evento_url(sop_evento_id)), "Detalle eliminado."),
        Err(e) => flash_err(evento_url(sop_evento_id), e),
    }
}

pub fn routes() -> Vec<Route> {
    routes![
        kit_lineas,
        kit_agregar,
        kit_quitar,
        receta_lineas,
        receta_guardar,
        receta_quitar,
        fraccion_metodologias,
        metodologia_guardar,
        metodologia_asignar,
        metodologia_quitar,
        metodologia_pasos,
        paso_agregar,
        paso_borrar,
        evento_detalles,
        evento_agregar,
        evento_borrar,
    ]
}
