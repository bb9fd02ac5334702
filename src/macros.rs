/// カタログ (文字列コードが主キー) の管理画面一式を生成するマクロ。
/// Django の `admin.site.register(Model, ModelAdmin)` に相当します。
///
/// 呼び出し側のモジュールに必要なもの:
/// - `$form`: `FromForm + Serialize + Deserialize`、`csrf_token` と `$pk` フィールド、
///   `From<$form> for $active_model`
/// - `$fields`: `async fn(&DatabaseConnection) -> Result<Vec<FormField>, DbErr>`
///
/// 生成物: `list`, `create_form`, `create`, `edit_form`, `edit`, `delete` と `routes()`。
#[macro_export]
macro_rules! impl_admin_resource {
    (
        entity: $entity:ty,
        active_model: $active_model:ty,
        form: $form:ty,
        pk: $pk:ident,
        view_prefix: $view_prefix:ident,
        base_url: $base_url:expr,
        title: $title:expr,
        search_field: $search_field:expr,
        order_field: $order_field:expr,
        columns: [$(($col:expr, $label:expr)),* $(,)?],
        fields: $fields:path
    ) => {
        use rocket::form::Form;
        use rocket::response::{Flash, Redirect};
        use rocket::serde::json::serde_json;
        use rocket::State;
        use sea_orm::*;
        use $crate::csrf::CsrfToken;
        use $crate::guards::auth::AdminUser;
        use $crate::validation::CodeValidation;
        use $crate::views::app_template::AppTemplate;
        use $crate::views::edit::{friendly_db_error, CreateView, DeleteView, UpdateView};
        use $crate::views::list::{ListColumn, ListView};

        paste::paste! {
            pub struct [<$view_prefix ListView>];
            pub struct [<$view_prefix CreateView>];
            pub struct [<$view_prefix UpdateView>];
            pub struct [<$view_prefix DeleteView>];

            fn nav_context() -> serde_json::Value {
                serde_json::json!({
                    "base_url": $base_url,
                    "title": $title,
                    "pk_field": stringify!($pk),
                    "active_nav": $base_url.trim_start_matches("/admin/"),
                })
            }

            async fn form_context(db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
                let fields = $fields(db).await?;
                Ok(serde_json::json!({ "fields": fields }))
            }

            #[rocket::async_trait]
            impl ListView<$entity> for [<$view_prefix ListView>] {
                fn template_name(&self) -> &'static str {
                    "admin/catalogo_list"
                }

                fn columns(&self) -> Vec<ListColumn> {
                    vec![$(($col, $label)),*]
                }

                fn default_sort(&self) -> &'static str {
                    $order_field
                }

                fn filter_queryset(&self, query: Select<$entity>, q: &str) -> Select<$entity> {
                    query.filter($search_field.contains(q))
                }

                fn get_context_data(&self) -> serde_json::Value {
                    nav_context()
                }
            }

            #[get("/?<page>&<q>&<sort>&<dir>")]
            pub async fn list(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
                page: Option<usize>,
                q: Option<String>,
                sort: Option<String>,
                dir: Option<String>,
            ) -> Result<AppTemplate, $crate::errors::AppError> {
                let view = [<$view_prefix ListView>];
                Ok(view
                    .list(db, page.unwrap_or(1), q, sort, dir, &Default::default(), serde_json::json!({}))
                    .await?)
            }

            #[rocket::async_trait]
            impl CreateView<$active_model> for [<$view_prefix CreateView>] {
                fn success_url(&self) -> String {
                    $base_url.to_string()
                }

                async fn get_context_data(&self, db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
                    form_context(db).await
                }

                async fn save(
                    &self,
                    db: &DatabaseConnection,
                    data: &serde_json::Value,
                ) -> Result<<$entity as EntityTrait>::Model, DbErr> {
                    let form: $form = serde_json::from_value(data.clone()).map_err(|e| DbErr::Custom(e.to_string()))?;
                    let active_model: $active_model = form.into();
                    active_model.insert(db).await
                }
            }

            #[get("/create")]
            pub async fn create_form(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
            ) -> Result<AppTemplate, $crate::errors::AppError> {
                let view = [<$view_prefix CreateView>];
                Ok(view.get(db, nav_context()).await?)
            }

            #[post("/create", data = "<form>")]
            pub async fn create(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
                csrf: CsrfToken,
                form: Form<$form>,
            ) -> Flash<Redirect> {
                let retry = format!("{}/create", $base_url);
                if !csrf.verify(&form.csrf_token) {
                    return Flash::error(Redirect::to(retry), "La sesión del formulario expiró. Intenta de nuevo.");
                }

                let mut form = form.into_inner();
                form.$pk = form.$pk.trim().to_uppercase();
                if let Err(errors) = CodeValidation::new(&form.$pk).validate_form() {
                    return Flash::warning(Redirect::to(retry), errors.join(" "));
                }

                let view = [<$view_prefix CreateView>];
                match serde_json::to_value(&form) {
                    Ok(data) => {
                        tracing::info!(resource = $base_url, id = %form.$pk, "catalog create");
                        view.post(db, &data).await
                    }
                    Err(e) => Flash::error(Redirect::to(retry), e.to_string()),
                }
            }

            #[rocket::async_trait]
            impl UpdateView<$active_model> for [<$view_prefix UpdateView>] {
                type Id = String;

                fn success_url(&self) -> String {
                    $base_url.to_string()
                }

                async fn get_context_data(&self, db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
                    form_context(db).await
                }

                async fn get_object(
                    &self,
                    db: &DatabaseConnection,
                    id: &String,
                ) -> Result<Option<<$entity as EntityTrait>::Model>, DbErr> {
                    <$entity>::find_by_id(id.clone()).one(db).await
                }

                async fn save(
                    &self,
                    db: &DatabaseConnection,
                    id: &String,
                    data: &serde_json::Value,
                ) -> Result<<$entity as EntityTrait>::Model, DbErr> {
                    if <$entity>::find_by_id(id.clone()).one(db).await?.is_none() {
                        return Err(DbErr::RecordNotFound(id.clone()));
                    }
                    let form: $form = serde_json::from_value(data.clone()).map_err(|e| DbErr::Custom(e.to_string()))?;
                    let mut active_model: $active_model = form.into();
                    // 主キーは URL 側を正とする
                    active_model.$pk = Set(id.clone());
                    active_model.update(db).await
                }
            }

            #[get("/edit/<id>")]
            pub async fn edit_form(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
                id: String,
            ) -> Result<AppTemplate, Flash<Redirect>> {
                let view = [<$view_prefix UpdateView>];
                view.get(db, id, nav_context()).await
            }

            #[post("/edit/<id>", data = "<form>")]
            pub async fn edit(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
                csrf: CsrfToken,
                id: String,
                form: Form<$form>,
            ) -> Flash<Redirect> {
                if !csrf.verify(&form.csrf_token) {
                    return Flash::error(
                        Redirect::to(format!("{}/edit/{}", $base_url, id)),
                        "La sesión del formulario expiró. Intenta de nuevo.",
                    );
                }
                let view = [<$view_prefix UpdateView>];
                match serde_json::to_value(form.into_inner()) {
                    Ok(data) => view.post(db, id, &data).await,
                    Err(e) => Flash::error(Redirect::to($base_url), friendly_db_error(&DbErr::Custom(e.to_string()), "No se pudo actualizar")),
                }
            }

            #[rocket::async_trait]
            impl DeleteView<$entity> for [<$view_prefix DeleteView>] {
                fn success_url(&self) -> String {
                    $base_url.to_string()
                }
            }

            #[derive(FromForm)]
            pub struct DeleteForm {
                #[field(default = "")]
                pub csrf_token: String,
            }

            #[post("/delete/<id>", data = "<form>")]
            pub async fn delete(
                db: &State<DatabaseConnection>,
                _admin: AdminUser,
                csrf: CsrfToken,
                id: String,
                form: Form<DeleteForm>,
            ) -> Flash<Redirect> {
                if !csrf.verify(&form.csrf_token) {
                    return Flash::error(Redirect::to($base_url), "La sesión del formulario expiró. Intenta de nuevo.");
                }
                tracing::info!(resource = $base_url, %id, "catalog delete");
                let view = [<$view_prefix DeleteView>];
                view.post(db, id).await
            }

            pub fn routes() -> Vec<rocket::Route> {
                routes![list, create_form, create, edit_form, edit, delete]
            }
        }
    };
}
