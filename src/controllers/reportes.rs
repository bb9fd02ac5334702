//! 1 人 1 日のレポート (HTML / PDF)

use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::{context, Metadata};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::controllers::fecha_param;
use crate::domain::calendar;
use crate::errors::AppError;
use crate::guards::auth::AuthenticatedUser;
use crate::pdf::{PdfDownload, PdfRenderer};
use crate::services::report_service::{self, DayReport};
use crate::views::app_template::AppTemplate;

fn reporte_url(fecha: &str, personal_id: &str) -> String {
    format!("/reporte/{}/{}", fecha, personal_id)
}

/// 権限確認してからレポートを組み立てる
async fn cargar(
    db: &DatabaseConnection,
    config: &AppConfig,
    auth: &AuthenticatedUser,
    fecha: &str,
    personal_id: &str,
) -> Result<DayReport, AppError> {
    let fecha = fecha_param(fecha)?;
    let hoy = calendar::today(config.offset());
    let puede_hacer_check = report_service::authorize_report(&auth.user, personal_id, fecha, hoy)?;
    report_service::build_day_report(db, fecha, personal_id, puede_hacer_check).await
}

#[get("/reporte/<fecha>/<personal_id>")]
pub async fn reporte(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    auth: AuthenticatedUser,
    fecha: &str,
    personal_id: &str,
) -> Result<AppTemplate, AppError> {
    let reporte = cargar(db.inner(), config.inner(), &auth, fecha, personal_id).await?;
    Ok(AppTemplate::new(
        "reportes/reporte",
        context! {
            reporte,
            fecha,
            pdf_url: format!("{}/pdf", reporte_url(fecha, personal_id)),
            active_nav: "plan",
        },
    ))
}

#[derive(Responder)]
pub enum PdfRespuesta {
    Pdf(PdfDownload),
    Fallback(Flash<Redirect>),
}

/// 同じレポートを wkhtmltopdf で PDF にする。失敗したら HTML 版へ戻す。
#[get("/reporte/<fecha>/<personal_id>/pdf")]
pub async fn reporte_pdf(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    metadata: Metadata<'_>,
    auth: AuthenticatedUser,
    fecha: &str,
    personal_id: &str,
) -> Result<PdfRespuesta, AppError> {
    let reporte = cargar(db.inner(), config.inner(), &auth, fecha, personal_id).await?;
    let back = reporte_url(fecha, personal_id);

    let Some((_, html)) = metadata.render("reportes/reporte_pdf", context! { reporte }) else {
        tracing::error!("template reportes/reporte_pdf is missing");
        return Ok(PdfRespuesta::Fallback(Flash::warning(
            Redirect::to(back),
            "No se pudo generar el PDF. Se muestra la versión HTML.",
        )));
    };

    let renderer = PdfRenderer::new(config.wkhtmltopdf_cmd.clone());
    match renderer.render(&html).await {
        Ok(bytes) => Ok(PdfRespuesta::Pdf(PdfDownload::for_report(personal_id, fecha, bytes))),
        Err(e) => {
            tracing::warn!(error = %e, %fecha, %personal_id, "pdf generation failed");
            Ok(PdfRespuesta::Fallback(Flash::warning(
                Redirect::to(back),
                "No se pudo generar el PDF. Se muestra la versión HTML.",
            )))
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![reporte, reporte_pdf]
}
