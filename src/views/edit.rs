use rocket::response::{Flash, Redirect};
use rocket::serde::json::serde_json;
use sea_orm::*;
use serde::Serialize;
use std::fmt::Display;

use crate::views::app_template::AppTemplate;

/// フォーム入力欄の種類
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Textarea,
    Select,
}

/// 汎用フォームテンプレートに渡す入力欄の定義。
/// Djangoの `forms.Field` に相当。
#[derive(Serialize, Clone, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// (value, label)
    pub choices: Vec<(String, String)>,
}

impl FormField {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        FormField { name, label, kind: FieldKind::Text, required: true, choices: Vec::new() }
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        FormField { kind: FieldKind::Number, ..Self::text(name, label) }
    }

    pub fn textarea(name: &'static str, label: &'static str) -> Self {
        FormField { kind: FieldKind::Textarea, required: false, ..Self::text(name, label) }
    }

    pub fn select(name: &'static str, label: &'static str, choices: Vec<(String, String)>) -> Self {
        FormField { kind: FieldKind::Select, choices, ..Self::text(name, label) }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// コンテキストをマージする小道具
fn merge(base: &mut serde_json::Value, extra: serde_json::Value) {
    if let (serde_json::Value::Object(map), serde_json::Value::Object(extra)) = (base, extra) {
        map.extend(extra);
    }
}

/// 新規作成ビューのためのトレイト。
/// Djangoの `CreateView` に相当します。
#[rocket::async_trait]
pub trait CreateView<A>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Sync,
{
    /// 使用するテンプレート名
    fn template_name(&self) -> &'static str {
        "admin/catalogo_form"
    }

    /// 成功時のリダイレクト先URL
    fn success_url(&self) -> String;

    /// フォームの初期データを取得 (GET用)
    fn get_initial(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    /// 追加コンテキストデータ (選択肢など)
    async fn get_context_data(&self, _db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
        Ok(serde_json::json!({}))
    }

    /// 保存処理の実装。Djangoの `form_valid` に相当。
    async fn save(
        &self,
        db: &DatabaseConnection,
        data: &serde_json::Value,
    ) -> Result<<A::Entity as EntityTrait>::Model, DbErr>;

    /// GETリクエスト: フォーム表示
    async fn get(&self, db: &DatabaseConnection, extra_context: serde_json::Value) -> Result<AppTemplate, DbErr> {
        let mut context_value = serde_json::json!({ "form": self.get_initial(), "is_edit": false });
        merge(&mut context_value, self.get_context_data(db).await?);
        merge(&mut context_value, extra_context);
        Ok(AppTemplate::new(self.template_name(), context_value))
    }

    /// POSTリクエスト: 保存処理。失敗時はフォームへ戻して flash で理由を出す。
    async fn post(&self, db: &DatabaseConnection, form_data: &serde_json::Value) -> Flash<Redirect> {
        match self.save(db, form_data).await {
            Ok(_) => Flash::success(Redirect::to(self.success_url()), "Registro creado."),
            Err(e) => Flash::warning(
                Redirect::to(format!("{}/create", self.success_url())),
                friendly_db_error(&e, "No se pudo crear"),
            ),
        }
    }
}

/// 更新ビューのためのトレイト。
/// Djangoの `UpdateView` に相当します。
#[rocket::async_trait]
pub trait UpdateView<A>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Sync + Serialize,
{
    /// 主キーの型 (カタログは文字列コード、ユーザーは整数)
    type Id: Display + Serialize + Send + Sync + 'static;

    fn template_name(&self) -> &'static str {
        "admin/catalogo_form"
    }

    fn success_url(&self) -> String;

    async fn get_context_data(&self, _db: &DatabaseConnection) -> Result<serde_json::Value, DbErr> {
        Ok(serde_json::json!({}))
    }

    /// IDからモデルを取得する
    async fn get_object(
        &self,
        db: &DatabaseConnection,
        id: &Self::Id,
    ) -> Result<Option<<A::Entity as EntityTrait>::Model>, DbErr>;

    /// 保存処理
    async fn save(
        &self,
        db: &DatabaseConnection,
        id: &Self::Id,
        data: &serde_json::Value,
    ) -> Result<<A::Entity as EntityTrait>::Model, DbErr>;

    /// GET: 編集フォーム表示
    async fn get(
        &self,
        db: &DatabaseConnection,
        id: Self::Id,
        extra_context: serde_json::Value,
    ) -> Result<AppTemplate, Flash<Redirect>> {
        let model = match self.get_object(db, &id).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                return Err(Flash::warning(Redirect::to(self.success_url()), "El registro no existe."))
            }
            Err(e) => {
                return Err(Flash::error(
                    Redirect::to(self.success_url()),
                    friendly_db_error(&e, "No se pudo cargar"),
                ))
            }
        };

        let mut context_value = serde_json::json!({
            "form": serde_json::to_value(&model).unwrap_or(serde_json::json!({})),
            "is_edit": true,
            "id": id,
        });
        match self.get_context_data(db).await {
            Ok(extra) => merge(&mut context_value, extra),
            Err(e) => {
                return Err(Flash::error(
                    Redirect::to(self.success_url()),
                    friendly_db_error(&e, "No se pudo cargar"),
                ))
            }
        }
        merge(&mut context_value, extra_context);

        Ok(AppTemplate::new(self.template_name(), context_value))
    }

    /// POST: 更新実行
    async fn post(&self, db: &DatabaseConnection, id: Self::Id, form_data: &serde_json::Value) -> Flash<Redirect> {
        match self.save(db, &id, form_data).await {
            Ok(_) => Flash::success(Redirect::to(self.success_url()), "Registro actualizado."),
            Err(e) => Flash::warning(
                Redirect::to(format!("{}/edit/{}", self.success_url(), id)),
                friendly_db_error(&e, "No se pudo actualizar"),
            ),
        }
    }
}

/// 削除ビューのためのトレイト
/// Djangoの `DeleteView` に相当
#[rocket::async_trait]
pub trait DeleteView<E>
where
    E: EntityTrait + Send,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: Send,
{
    fn success_url(&self) -> String;

    /// 削除実行
    async fn delete(
        &self,
        db: &DatabaseConnection,
        id: <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<DeleteResult, DbErr> {
        E::delete_by_id(id).exec(db).await
    }

    /// POST: 削除処理。参照されている行は外部キー違反で失敗する。
    async fn post(
        &self,
        db: &DatabaseConnection,
        id: <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Flash<Redirect> {
        match self.delete(db, id).await {
            Ok(res) if res.rows_affected == 0 => {
                Flash::warning(Redirect::to(self.success_url()), "El registro no existe.")
            }
            Ok(_) => Flash::success(Redirect::to(self.success_url()), "Registro eliminado."),
            Err(e) => Flash::warning(
                Redirect::to(self.success_url()),
                friendly_db_error(&e, "No se pudo eliminar"),
            ),
        }
    }
}

/// DB エラーを利用者向けの文に直す
pub fn friendly_db_error(e: &DbErr, action: &str) -> String {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => format!("{}: el identificador ya existe.", action),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            format!("{}: el registro está en uso o hace referencia a datos inexistentes.", action)
        }
        _ => match e {
            DbErr::Custom(msg) => format!("{}: {}", action, msg),
            other => {
                tracing::error!(error = %other, "catalog mutation failed");
                format!("{}.", action)
            }
        },
    }
}
