use rocket::request::Request;
use rocket::response::{Responder, Result};
use rocket::serde::json::serde_json;
use rocket_dyn_templates::Template;
use std::borrow::Cow;

use crate::fairings::context::{CachedCsrf, CachedFlash, CachedIsAdmin, CachedUser};

/// アプリケーション標準のテンプレートレスポンダー。
/// Djangoの `context_processors` のように、共通のコンテキスト（ユーザー情報、CSRFトークン、flash）を自動注入します。
pub struct AppTemplate {
    pub name: Cow<'static, str>,
    pub context: serde_json::Value,
}

impl AppTemplate {
    pub fn new<N, C>(name: N, context: C) -> Self
    where
        N: Into<Cow<'static, str>>,
        C: serde::Serialize,
    {
        AppTemplate {
            name: name.into(),
            context: serde_json::to_value(context).unwrap_or(serde_json::json!({})),
        }
    }

    /// 共通コンテキストとローカルコンテキストを合成 (ローカル優先)
    pub fn merged_context(request: &Request<'_>, local: serde_json::Value) -> serde_json::Value {
        let mut ctx = serde_json::Map::new();

        if let Some(cached_user) = request.local_cache(|| None::<CachedUser>) {
            ctx.insert("user".into(), cached_user.0.clone());
        }
        let is_admin = request
            .local_cache(|| None::<CachedIsAdmin>)
            .as_ref()
            .map(|c| c.0)
            .unwrap_or(false);
        ctx.insert("is_admin".into(), serde_json::Value::Bool(is_admin));

        if let Some(cached_csrf) = request.local_cache(|| None::<CachedCsrf>) {
            ctx.insert("csrf_token".into(), serde_json::Value::String(cached_csrf.0.clone()));
        }
        if let Some(flash) = request.local_cache(|| None::<CachedFlash>) {
            ctx.insert(
                "flash".into(),
                serde_json::json!({ "kind": flash.kind, "message": flash.message }),
            );
        }

        if let serde_json::Value::Object(local_map) = local {
            for (k, v) in local_map {
                ctx.insert(k, v);
            }
        }
        serde_json::Value::Object(ctx)
    }
}

impl<'r> Responder<'r, 'static> for AppTemplate {
    fn respond_to(self, request: &'r Request<'_>) -> Result<'static> {
        let context = Self::merged_context(request, self.context);
        Template::render(self.name, context).respond_to(request)
    }
}
