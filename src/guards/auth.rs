use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sea_orm::*;

use crate::entities::{prelude::*, user};

pub const SESSION_COOKIE: &str = "user_id";

/// 認証済みユーザーを表すリクエストガード。
/// Djangoの `request.user` に相当し、ビューの引数に含めるだけで自動的に認証チェックが行われます。
pub struct AuthenticatedUser {
    pub user: user::Model,
}

/// セッション Cookie からユーザーを引く。1 リクエストにつき 1 回だけ DB を見る。
async fn session_user<'r>(request: &'r Request<'_>) -> &'r Option<user::Model> {
    request
        .local_cache_async(async {
            let db = match request.guard::<&State<DatabaseConnection>>().await {
                Outcome::Success(db) => db,
                _ => return None,
            };

            let id = request
                .cookies()
                .get_private(SESSION_COOKIE)
                .and_then(|c| c.value().parse::<i32>().ok())?;

            match User::find_by_id(id).one(db.inner()).await {
                Ok(Some(u)) if u.is_active => Some(u),
                Ok(_) => None,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load session user");
                    None
                }
            }
        })
        .await
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match session_user(request).await {
            Some(user) => Outcome::Success(AuthenticatedUser { user: user.clone() }),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// 管理者ユーザーのみを許可するガード。
/// Djangoの `user.is_staff` や `PermissionRequiredMixin` に相当。
pub struct AdminUser(pub AuthenticatedUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(request).await {
            Outcome::Success(auth) if auth.is_admin() => Outcome::Success(AdminUser(auth)),
            Outcome::Success(_) => Outcome::Error((Status::Forbidden, ())),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Personal に紐づいた operativo のみを許可するガード。
pub struct OperativoUser {
    pub user: user::Model,
    pub personal_id: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OperativoUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(request).await {
            Outcome::Success(auth) if !auth.is_admin() => match auth.user.personal_id.clone() {
                Some(personal_id) => Outcome::Success(OperativoUser {
                    user: auth.user,
                    personal_id,
                }),
                None => Outcome::Error((Status::Forbidden, ())),
            },
            Outcome::Success(_) => Outcome::Error((Status::Forbidden, ())),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
