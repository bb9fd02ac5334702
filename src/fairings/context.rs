use rocket::outcome::Outcome;
use rocket::request::FlashMessage;
use rocket::serde::json::serde_json;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Data, Request,
};

use crate::csrf::CsrfToken;
use crate::guards::auth::AuthenticatedUser;

/// コンテキストプロセッサとしてのFairing。
/// リクエスト処理前に共通データ（ユーザー、CSRFトークン、flash）を取得・キャッシュします。
pub struct ContextFairing;

#[rocket::async_trait]
impl Fairing for ContextFairing {
    fn info(&self) -> Info {
        Info {
            name: "Global Context Processor",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _data: &mut Data<'_>) {
        // 静的ファイルには不要
        if request.uri().path().starts_with("/static") {
            return;
        }

        // 1. User Context (ガード側でも local_cache されるので DB は 1 回)
        if let Outcome::Success(auth) = request.guard::<AuthenticatedUser>().await {
            if let Ok(user_json) = serde_json::to_value(&auth.user) {
                request.local_cache(|| Some(CachedUser(user_json)));
                request.local_cache(|| Some(CachedIsAdmin(auth.is_admin())));
            }
        }

        // 2. CSRF Context
        if let Outcome::Success(csrf) = request.guard::<CsrfToken>().await {
            let token_str = csrf.token().to_string();
            request.local_cache(|| Some(CachedCsrf(token_str)));
        }

        // 3. Flash (前のリクエストの Flash<Redirect>)
        if let Outcome::Success(Some(flash)) = request.guard::<Option<FlashMessage<'_>>>().await {
            let cached = CachedFlash {
                kind: flash.kind().to_string(),
                message: flash.message().to_string(),
            };
            request.local_cache(|| Some(cached));
        }
    }
}

// キャッシュ用の型
#[derive(Clone)]
pub struct CachedUser(pub serde_json::Value);

#[derive(Clone)]
pub struct CachedIsAdmin(pub bool);

#[derive(Clone)]
pub struct CachedCsrf(pub String);

#[derive(Clone)]
pub struct CachedFlash {
    pub kind: String,
    pub message: String,
}
