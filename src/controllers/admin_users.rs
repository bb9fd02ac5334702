use rocket::form::Form;
use rocket::response::{Flash, Redirect};
use rocket::serde::json::serde_json;
use rocket::State;
use rocket_dyn_templates::context;
use sea_orm::*;
use std::collections::HashMap;

use crate::controllers::{csrf_expired, flash_err, CsrfForm};
use crate::csrf::CsrfToken;
use crate::entities::user::Role;
use crate::entities::{personal, prelude::*, user};
use crate::errors::AppError;
use crate::guards::auth::AdminUser;
use crate::services::user_service::{UserInput, UserService};
use crate::validation::UserFormValidation;
use crate::views::app_template::AppTemplate;
use crate::views::list::{AdminFilter, ListColumn, ListView};

const BASE_URL: &str = "/admin/users";

#[derive(FromForm)]
pub struct UserForm<'r> {
    pub username: &'r str,
    #[field(default = "")]
    pub password: &'r str,
    pub role: &'r str,
    #[field(default = false)]
    pub is_active: bool,
    pub personal_id: Option<&'r str>,
    #[field(default = "")]
    pub csrf_token: &'r str,
}

impl UserForm<'_> {
    /// 検証して入力値に変換する。Django の `form.is_valid()` + `cleaned_data`。
    fn clean(&self) -> Result<UserInput, AppError> {
        UserFormValidation::new(self.username, Some(self.password))
            .validate_form()
            .map_err(|errors| AppError::BadRequest(errors.join(" ")))?;
        let role = Role::parse(self.role).ok_or_else(|| AppError::BadRequest("Rol inválido.".into()))?;

        Ok(UserInput {
            username: self.username.trim().to_string(),
            password: Some(self.password).filter(|p| !p.is_empty()).map(str::to_string),
            role,
            is_active: self.is_active,
            personal_id: self.personal_id.map(str::to_string),
        })
    }
}

pub struct UserListView;

#[rocket::async_trait]
impl ListView<User> for UserListView {
    fn template_name(&self) -> &'static str {
        "admin/users"
    }

    fn columns(&self) -> Vec<ListColumn> {
        vec![("username", "Usuario"), ("role", "Rol"), ("personal_id", "Personal"), ("is_active", "Activo")]
    }

    fn default_sort(&self) -> &'static str {
        "username"
    }

    fn filter_queryset(&self, query: Select<User>, q: &str) -> Select<User> {
        query.filter(user::Column::Username.contains(q))
    }

    fn get_filters(&self) -> Vec<AdminFilter> {
        vec![AdminFilter {
            label: "Rol".into(),
            parameter_name: "role".into(),
            choices: vec![
                ("admin".into(), "Administrador".into()),
                ("operativo".into(), "Operativo".into()),
            ],
        }]
    }

    fn apply_filters(&self, query: Select<User>, params: &HashMap<String, String>) -> Select<User> {
        match params.get("role").and_then(|r| Role::parse(r)) {
            Some(role) => query.filter(user::Column::Role.eq(role)),
            None => query,
        }
    }

    fn get_context_data(&self) -> serde_json::Value {
        serde_json::json!({ "base_url": BASE_URL, "title": "Usuarios", "active_nav": "users" })
    }
}

#[get("/?<page>&<q>&<sort>&<dir>&<role>")]
pub async fn list(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    page: Option<usize>,
    q: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
    role: Option<String>,
) -> Result<AppTemplate, AppError> {
    let mut filters = HashMap::new();
    if let Some(role) = role.filter(|r| !r.is_empty()) {
        filters.insert("role".to_string(), role);
    }
    Ok(UserListView
        .list(db, page.unwrap_or(1), q, sort, dir, &filters, serde_json::json!({}))
        .await?)
}

/// 選択肢: まだアカウントを持たない Personal (+ 編集中ユーザー自身のもの)
async fn personal_libre(db: &DatabaseConnection, actual: Option<&str>) -> Result<Vec<personal::Model>, DbErr> {
    let vinculados: Vec<String> = User::find()
        .filter(user::Column::PersonalId.is_not_null())
        .all(db)
        .await?
        .into_iter()
        .filter_map(|u| u.personal_id)
        .filter(|p| Some(p.as_str()) != actual)
        .collect();

    Personal::find()
        .filter(personal::Column::PersonalId.is_not_in(vinculados))
        .order_by_asc(personal::Column::Nombre)
        .all(db)
        .await
}

#[get("/create")]
pub async fn create_form(db: &State<DatabaseConnection>, _admin: AdminUser) -> Result<AppTemplate, AppError> {
    let personal = personal_libre(db.inner(), None).await?;
    Ok(AppTemplate::new(
        "admin/user_form",
        context! { is_edit: false, personal, base_url: BASE_URL, active_nav: "users" },
    ))
}

#[post("/create", data = "<form>")]
pub async fn create(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    form: Form<UserForm<'_>>,
) -> Flash<Redirect> {
    let retry = format!("{}/create", BASE_URL);
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(retry);
    }
    let result = match form.clean() {
        Ok(input) => UserService::create(db.inner(), input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(u) => Flash::success(Redirect::to(BASE_URL), format!("Usuario {} creado.", u.username)),
        Err(e) => flash_err(retry, e),
    }
}

#[get("/edit/<id>")]
pub async fn edit_form(db: &State<DatabaseConnection>, _admin: AdminUser, id: i32) -> Result<AppTemplate, AppError> {
    let usuario = UserService::find_by_id(db.inner(), id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;
    let personal = personal_libre(db.inner(), usuario.personal_id.as_deref()).await?;
    Ok(AppTemplate::new(
        "admin/user_form",
        context! { is_edit: true, id, form: usuario, personal, base_url: BASE_URL, active_nav: "users" },
    ))
}

#[post("/edit/<id>", data = "<form>")]
pub async fn edit(
    db: &State<DatabaseConnection>,
    _admin: AdminUser,
    csrf: CsrfToken,
    id: i32,
    form: Form<UserForm<'_>>,
) -> Flash<Redirect> {
    let retry = format!("{}/edit/{}", BASE_URL, id);
    if !csrf.verify(form.csrf_token) {
        return csrf_expired(retry);
    }
    let result = match form.clean() {
        Ok(input) => UserService::update(db.inner(), id, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(u) => Flash::success(Redirect::to(BASE_URL), format!("Usuario {} actualizado.", u.username)),
        Err(e) => flash_err(retry, e),
    }
}

#[post("/delete/<id>", data = "<form>")]
pub async fn delete(
    db: &State<DatabaseConnection>,
    admin: AdminUser,
    csrf: CsrfToken,
    id: i32,
    form: Form<CsrfForm>,
) -> Flash<Redirect> {
    if !csrf.verify(&form.csrf_token) {
        return csrf_expired(BASE_URL.to_string());
    }
    match UserService::delete(db.inner(), id, admin.0.user.id).await {
        Ok(()) => {
            tracing::info!(user_id = id, by = admin.0.user.id, "user deleted");
            Flash::success(Redirect::to(BASE_URL), "Usuario eliminado.")
        }
        Err(e) => flash_err(BASE_URL.to_string(), e),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list, create_form, create, edit_form, edit, delete]
}
