use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::controllers::auth::home_for;
use crate::domain::calendar;
use crate::errors::AppError;
use crate::guards::auth::{AdminUser, AuthenticatedUser};
use crate::services::{schedule_service, template_service};
use crate::views::app_template::AppTemplate;

/// `/` はロールに応じて振り分けるだけ
#[get("/")]
pub fn index(user: Option<AuthenticatedUser>) -> Redirect {
    match user {
        Some(auth) => Redirect::to(home_for(&auth.user)),
        None => Redirect::to("/login"),
    }
}

/// 管理者トップ: 週 (月〜土) のサマリとテンプレート
#[get("/admin?<fecha>")]
pub async fn admin_home(
    db: &State<DatabaseConnection>,
    config: &State<AppConfig>,
    _admin: AdminUser,
    fecha: Option<&str>,
) -> Result<AppTemplate, AppError> {
    let hoy = calendar::today(config.offset());
    let base = fecha.and_then(calendar::parse_fecha).unwrap_or(hoy);
    let lunes = calendar::monday_of(base);

    let dias = schedule_service::week_summary(db.inner(), lunes).await?;
    let plantillas = template_service::list(db.inner()).await?;
    let plantilla_activa = template_service::active_for_week(db.inner(), lunes).await?;

    Ok(AppTemplate::new(
        "home/admin",
        context! {
            hoy: hoy.to_string(),
            lunes: lunes.to_string(),
            semana_anterior: (lunes - chrono::Duration::days(7)).to_string(),
            semana_siguiente: (lunes + chrono::Duration::days(7)).to_string(),
            semana_iso: calendar::iso_week(lunes),
            dias,
            plantillas,
            plantilla_activa,
            active_nav: "home",
        },
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, admin_home]
}
