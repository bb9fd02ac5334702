use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use rocket::http::{Cookie, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// CSRFトークンの有効期限（秒）
const CSRF_TOKEN_EXPIRY: u64 = 8 * 3600; // 1 勤務日

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// CSRFトークン (double submit cookie)。
/// Djangoの {% csrf_token %} に相当します。
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    /// 先頭 8 バイトに発行時刻を埋め込んだトークンを生成します。
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        let mut token_data = unix_now().to_be_bytes().to_vec();
        token_data.extend_from_slice(&random_bytes);
        CsrfToken(URL_SAFE_NO_PAD.encode(&token_data))
    }

    fn issued_at(&self) -> Option<u64> {
        let decoded = URL_SAFE_NO_PAD.decode(&self.0).ok()?;
        let bytes: [u8; 8] = decoded.get(..8)?.try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }

    pub fn is_expired(&self) -> bool {
        match self.issued_at() {
            Some(t) => unix_now().saturating_sub(t) >= CSRF_TOKEN_EXPIRY,
            None => true,
        }
    }

    /// 送信されたトークンが cookie のものと一致し、期限内か
    pub fn verify(&self, submitted: &str) -> bool {
        !submitted.is_empty() && self.0 == submitted && !self.is_expired()
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

/// リクエストからCSRFトークンを取得するガード。
/// Cookieに無いか期限切れなら新規生成して Cookie に保存します。
#[rocket::async_trait]
impl<'r> FromRequest<'r> for CsrfToken {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let cookies = request.cookies();

        let existing = cookies
            .get(CSRF_COOKIE)
            .map(|c| CsrfToken(c.value().to_string()))
            .filter(|t| !t.is_expired());

        let token = match existing {
            Some(t) => t,
            None => {
                let new_token = CsrfToken::generate();
                // JS (並べ替え・チェック API) から読めるよう HttpOnly にはしない
                let cookie = Cookie::build((CSRF_COOKIE, new_token.0.clone()))
                    .path("/")
                    .same_site(SameSite::Strict)
                    .http_only(false);
                cookies.add(cookie);
                new_token
            }
        };

        Outcome::Success(token)
    }
}

/// JSON API 用のCSRF検証ガード。`X-CSRF-Token` ヘッダー必須。
/// DjangoのCsrfViewMiddlewareに相当します。
pub struct CsrfValidation;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CsrfValidation {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(cookie_token) = request.cookies().get(CSRF_COOKIE).map(|c| c.value().to_string()) else {
            return Outcome::Error((Status::Forbidden, ()));
        };

        let submitted = request.headers().get_one(CSRF_HEADER).unwrap_or_default();

        if CsrfToken(cookie_token).verify(submitted) {
            Outcome::Success(CsrfValidation)
        } else {
            tracing::warn!(path = %request.uri().path(), "CSRF validation failed");
            Outcome::Error((Status::Forbidden, ()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_token_generation() {
        let token1 = CsrfToken::generate();
        let token2 = CsrfToken::generate();

        assert_ne!(token1.0, token2.0);
        assert!(!token1.is_expired());
    }

    #[test]
    fn test_csrf_token_verification() {
        let token = CsrfToken::generate();
        let token_string = token.0.clone();

        assert!(token.verify(&token_string));
        assert!(!token.verify("invalid_token"));
        assert!(!token.verify(""));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut data = 0u64.to_be_bytes().to_vec();
        data.extend_from_slice(&[7u8; 32]);
        let old = CsrfToken(URL_SAFE_NO_PAD.encode(&data));
        assert!(old.is_expired());
        assert!(!old.verify(&old.0.clone()));
    }
}
