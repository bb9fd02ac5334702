use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::DatabaseConnection;

use crate::controllers::{csrf_expired, CsrfForm};
use crate::csrf::CsrfToken;
use crate::entities::user;
use crate::errors::AppError;
use crate::guards::auth::{AuthenticatedUser, SESSION_COOKIE};
use crate::services::user_service::UserService;
use crate::views::app_template::AppTemplate;

#[derive(FromForm)]
pub struct LoginForm<'r> {
    pub username: &'r str,
    pub password: &'r str,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

/// ロール別のトップページ
pub fn home_for(user: &user::Model) -> &'static str {
    if user.is_admin() {
        "/admin"
    } else {
        "/mi_ruta"
    }
}

/// ログイン画面 (GET)。ログイン済みならトップへ。
#[get("/login")]
pub fn login_form(user: Option<AuthenticatedUser>) -> Result<AppTemplate, Redirect> {
    if let Some(auth) = user {
        return Err(Redirect::to(home_for(&auth.user)));
    }
    Ok(AppTemplate::new("login", context! { title: "Iniciar sesión" }))
}

/// ログイン処理を行うビュー。
/// Djangoの `LoginView` に相当します。
#[post("/login", data = "<login_form>")]
pub async fn login(
    db: &State<DatabaseConnection>,
    csrf: CsrfToken,
    login_form: Form<LoginForm<'_>>,
    cookies: &CookieJar<'_>,
) -> Flash<Redirect> {
    if !csrf.verify(login_form.csrf_token) {
        return csrf_expired("/login".to_string());
    }

    // Djangoの authenticate() に相当
    let user = match UserService::authenticate(db.inner(), login_form.username, login_form.password).await {
        Ok(user) => user,
        Err(AppError::Forbidden) => {
            return Flash::error(Redirect::to("/login"), "La cuenta está desactivada.");
        }
        Err(AppError::Unauthorized) => {
            tracing::info!(username = %login_form.username, "login rejected");
            return Flash::error(Redirect::to("/login"), "Usuario o contraseña incorrectos.");
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            return Flash::error(Redirect::to("/login"), "Ocurrió un error inesperado.");
        }
    };

    // セッションクッキーをセット (Djangoの login(request, user) に相当)
    let cookie = Cookie::build((SESSION_COOKIE, user.id.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(true);
    cookies.add_private(cookie);

    tracing::info!(user_id = user.id, role = ?user.role, "login");
    Flash::success(Redirect::to(home_for(&user)), format!("Bienvenido, {}.", user.username))
}

/// ログアウト処理。
/// Djangoの `LogoutView` に相当します。
#[post("/logout", data = "<form>")]
pub fn logout(cookies: &CookieJar<'_>, csrf: CsrfToken, form: Form<CsrfForm>) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired("/".to_string());
    }
    cookies.remove_private(Cookie::build(SESSION_COOKIE).path("/"));
    Flash::success(Redirect::to("/login"), "Sesión cerrada.")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_form, login, logout]
}
