use sea_orm::*;

use crate::auth_utils::{hash_password, verify_password};
use crate::entities::user::Role;
use crate::entities::{prelude::*, user};
use crate::errors::AppError;

/// ユーザー作成・更新の入力
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    /// 編集時は None で「変更なし」
    pub password: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub personal_id: Option<String>,
}

/// ユーザー関連のビジネスロジックを集約するサービス。
/// Djangoの Manager やカスタム QuerySet メソッドに相当します。
pub struct UserService;

impl UserService {
    /// IDでユーザーを検索 (Django: User.objects.get(pk=id))
    pub async fn find_by_id(db: &impl ConnectionTrait, id: i32) -> Result<Option<user::Model>, AppError> {
        Ok(User::find_by_id(id).one(db).await?)
    }

    /// ユーザー名で検索 (Django: User.objects.get(username=...))
    pub async fn find_by_username(
        db: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, AppError> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?)
    }

    /// 全ユーザー取得 (Django: User.objects.all())
    pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<user::Model>, AppError> {
        Ok(User::find().order_by_asc(user::Column::Username).all(db).await?)
    }

    /// operativo は Personal 必須、admin は Personal を持たない。
    /// 同じ Personal を 2 つのアカウントに紐づけることはできない。
    async fn check_personal_link(
        db: &impl ConnectionTrait,
        input: &UserInput,
        exclude_id: Option<i32>,
    ) -> Result<Option<String>, AppError> {
        let personal_id = match input.role {
            Role::Admin => return Ok(None),
            Role::Operativo => input
                .personal_id
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| AppError::BadRequest("Un usuario operativo requiere un Personal.".into()))?,
        };

        if Personal::find_by_id(personal_id.to_string()).one(db).await?.is_none() {
            return Err(AppError::BadRequest(format!("No existe el personal {}.", personal_id)));
        }

        let mut query = User::find().filter(user::Column::PersonalId.eq(personal_id));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(AppError::Conflict("Ese personal ya tiene una cuenta.".into()));
        }
        Ok(Some(personal_id.to_string()))
    }

    /// ユーザー作成 (Django: User.objects.create_user())
    pub async fn create(db: &impl ConnectionTrait, input: UserInput) -> Result<user::Model, AppError> {
        if Self::find_by_username(db, &input.username).await?.is_some() {
            return Err(AppError::Conflict("Ese nombre de usuario ya existe.".into()));
        }
        let personal_id = Self::check_personal_link(db, &input, None).await?;
        let password = input
            .password
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("La contraseña es obligatoria.".into()))?;
        let password_hash = hash_password(password)?;

        let new_user = user::ActiveModel {
            username: Set(input.username.clone()),
            password_hash: Set(password_hash),
            role: Set(input.role),
            is_active: Set(input.is_active),
            personal_id: Set(personal_id),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        let created = new_user.insert(db).await?;
        tracing::info!(user_id = created.id, username = %created.username, "user created");
        Ok(created)
    }

    /// ユーザー更新。パスワードは指定された場合だけ変更。
    pub async fn update(db: &impl ConnectionTrait, id: i32, input: UserInput) -> Result<user::Model, AppError> {
        let existing = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".into()))?;

        if let Some(other) = Self::find_by_username(db, &input.username).await? {
            if other.id != id {
                return Err(AppError::Conflict("Ese nombre de usuario ya existe.".into()));
            }
        }
        let personal_id = Self::check_personal_link(db, &input, Some(id)).await?;

        let mut active: user::ActiveModel = existing.into();
        active.username = Set(input.username);
        active.role = Set(input.role);
        active.is_active = Set(input.is_active);
        active.personal_id = Set(personal_id);
        if let Some(password) = input.password.as_deref() {
            active.password_hash = Set(hash_password(password)?);
        }
        Ok(active.update(db).await?)
    }

    /// ユーザー削除。自分自身は削除できない。
    pub async fn delete(db: &impl ConnectionTrait, id: i32, current_user_id: i32) -> Result<(), AppError> {
        if id == current_user_id {
            return Err(AppError::BadRequest("No puedes eliminar tu propia cuenta.".into()));
        }
        let res = User::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Usuario no encontrado".into()));
        }
        Ok(())
    }

    /// 認証処理 (Django: authenticate())
    pub async fn authenticate(
        db: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AppError> {
        let user = Self::find_by_username(db, username.trim())
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        Ok(user)
    }
}
